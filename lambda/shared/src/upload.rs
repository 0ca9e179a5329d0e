//! Pre-signed upload URL issuance for pet images.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::anyhow;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use serde::Serialize;
use tracing::info;

use crate::error::PetApiError;

/// Signed URLs stay valid for one hour.
const UPLOAD_URL_TTL: Duration = Duration::from_secs(3600);

const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// One uploadable object: a time-limited signed PUT URL plus the permanent
/// public read URL the record will reference afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTarget {
    pub upload_url: String,
    pub file_url: String,
}

/// Issues signed write URLs scoped to `{pet_id}/{filename}` object paths.
pub struct UploadUrlIssuer {
    client: Client,
    bucket: String,
}

impl UploadUrlIssuer {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// One target per gallery filename plus a `main_image` entry. Fails
    /// before any S3 call when the pet id is blank or no filenames were
    /// requested.
    pub async fn issue(
        &self,
        pet_id: &str,
        filenames: &[String],
        main_image: &str,
    ) -> Result<BTreeMap<String, UploadTarget>, PetApiError> {
        if pet_id.trim().is_empty() || filenames.is_empty() {
            return Err(PetApiError::Validation(
                "pet_id and filenames are required".to_string(),
            ));
        }

        info!(
            "Issuing {} upload URLs for pet {}",
            filenames.len() + 1,
            pet_id
        );

        let mut targets = BTreeMap::new();
        let main_key = object_key(pet_id, main_image);
        targets.insert("main_image".to_string(), self.target_for(&main_key).await?);

        for filename in filenames {
            let key = object_key(pet_id, filename);
            targets.insert(filename.clone(), self.target_for(&key).await?);
        }

        Ok(targets)
    }

    async fn target_for(&self, key: &str) -> Result<UploadTarget, PetApiError> {
        let presigning_config = PresigningConfig::expires_in(UPLOAD_URL_TTL)
            .map_err(|e| anyhow!("Failed to create presigning config: {}", e))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(IMAGE_CONTENT_TYPE)
            .presigned(presigning_config)
            .await
            .map_err(|e| anyhow!("Failed to presign upload for {}: {}", key, e))?;

        Ok(UploadTarget {
            upload_url: presigned.uri().to_string(),
            file_url: format!("https://{}.s3.amazonaws.com/{}", self.bucket, key),
        })
    }
}

fn object_key(pet_id: &str, filename: &str) -> String {
    format!("{pet_id}/{filename}")
}
