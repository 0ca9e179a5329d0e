//! Environment-driven configuration, read once at cold start.

/// Settings shared by every Lambda function. Built in `main` and borrowed by
/// the handler for the lifetime of the process instead of living in a
/// module-level global.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// DynamoDB table holding pet records.
    pub table_name: String,
    /// Global secondary index keyed on `owner_id`.
    pub owner_index: String,
    /// S3 bucket receiving uploaded pet images.
    pub bucket: String,
    /// Single CORS origin attached to every response.
    pub allowed_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            table_name: std::env::var("PETS_TABLE_NAME").unwrap_or_else(|_| "Pets".to_string()),
            owner_index: std::env::var("OWNER_INDEX_NAME")
                .unwrap_or_else(|_| "owner_id-index".to_string()),
            bucket: std::env::var("UPLOAD_BUCKET_NAME")
                .unwrap_or_else(|_| "pet-profiles".to_string()),
            allowed_origin: std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        }
    }
}
