//! The record gateway: one trait, a DynamoDB implementation, and an
//! in-memory implementation with the same observable semantics for tests.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Value};

use crate::error::PetApiError;
use crate::filter::PetFilter;
use crate::model::Pet;
use crate::update::PetUpdate;

mod dynamo;
mod memory;

pub use dynamo::DynamoPetStore;
pub use memory::MemoryPetStore;

/// One page of scan results plus the opaque cursor for the next page.
#[derive(Debug, Clone)]
pub struct ScanPage {
    pub pets: Vec<Pet>,
    pub next_token: Option<String>,
}

/// The four primitive record operations plus the owner index query. Every
/// call is single-attempt; retry policy is left to the SDK defaults.
#[async_trait]
pub trait PetStore: Send + Sync {
    /// Write a full record once.
    async fn create(&self, pet: &Pet) -> Result<(), PetApiError>;

    /// Fetch by primary key.
    async fn get(&self, pet_id: &str) -> Result<Option<Pet>, PetApiError>;

    /// Scan up to `limit` records starting after `start_token`, returning
    /// the ones the filter admits. Like the store's native scan, the limit
    /// bounds records read, not records returned.
    async fn scan(
        &self,
        filter: &PetFilter,
        limit: i32,
        start_token: Option<&str>,
    ) -> Result<ScanPage, PetApiError>;

    /// All records belonging to one owner, via the owner index.
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Pet>, PetApiError>;

    /// Apply a validated partial update and return the updated-attribute
    /// snapshot. Last-writer-wins per field; upserts when the key is absent,
    /// matching the store's native update.
    async fn update(
        &self,
        pet_id: &str,
        update: &PetUpdate,
    ) -> Result<Map<String, Value>, PetApiError>;

    /// Remove a record, failing with `NotFound` when it does not exist. The
    /// existence check and the delete are atomic at the store.
    async fn delete(&self, pet_id: &str) -> Result<(), PetApiError>;
}

/// Wrap the last-seen primary key into an opaque page token.
pub fn encode_token(pet_id: &str) -> String {
    BASE64.encode(serde_json::json!({ "pet_id": pet_id }).to_string())
}

/// Unwrap a page token back into the primary key it carries.
pub fn decode_token(token: &str) -> Result<String, PetApiError> {
    let invalid = || PetApiError::Validation("invalid nextToken".to_string());
    let bytes = BASE64.decode(token).map_err(|_| invalid())?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|_| invalid())?;
    value
        .get("pet_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(invalid)
}
