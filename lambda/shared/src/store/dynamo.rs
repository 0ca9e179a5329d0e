//! DynamoDB-backed record store.

use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Value};
use tracing::info;

use crate::config::AppConfig;
use crate::error::PetApiError;
use crate::filter::PetFilter;
use crate::model::{attr_to_json, Pet};
use crate::update::PetUpdate;

use super::{decode_token, encode_token, PetStore, ScanPage};

pub struct DynamoPetStore {
    client: Client,
    table_name: String,
    owner_index: String,
}

impl DynamoPetStore {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
            owner_index: config.owner_index.clone(),
        }
    }
}

#[async_trait]
impl PetStore for DynamoPetStore {
    async fn create(&self, pet: &Pet) -> Result<(), PetApiError> {
        info!("Inserting pet {} into {}", pet.pet_id, self.table_name);
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(pet.to_item()))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to put pet item: {}", e))?;
        Ok(())
    }

    async fn get(&self, pet_id: &str) -> Result<Option<Pet>, PetApiError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pet_id", AttributeValue::S(pet_id.to_string()))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to get pet item: {}", e))?;
        Ok(output.item().map(Pet::from_item))
    }

    async fn scan(
        &self,
        filter: &PetFilter,
        limit: i32,
        start_token: Option<&str>,
    ) -> Result<ScanPage, PetApiError> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(limit.max(1));

        // The filter runs store-side after the scan reads its page, so it
        // narrows what comes back, not what gets read.
        if let Some(expr) = filter.to_expression() {
            request = request
                .filter_expression(expr.expression)
                .set_expression_attribute_names(Some(expr.names))
                .set_expression_attribute_values(Some(expr.values));
        }

        if let Some(token) = start_token {
            let pet_id = decode_token(token)?;
            request = request.exclusive_start_key("pet_id", AttributeValue::S(pet_id));
        }

        let output = request
            .send()
            .await
            .map_err(|e| anyhow!("Failed to scan pets table: {}", e))?;

        let pets = output.items().iter().map(Pet::from_item).collect();
        let next_token = output
            .last_evaluated_key()
            .and_then(|key| key.get("pet_id"))
            .and_then(|v| v.as_s().ok())
            .map(|id| encode_token(id));

        Ok(ScanPage { pets, next_token })
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Pet>, PetApiError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(&self.owner_index)
            .key_condition_expression("owner_id = :owner_id")
            .expression_attribute_values(":owner_id", AttributeValue::S(owner_id.to_string()))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to query owner index: {}", e))?;
        Ok(output.items().iter().map(Pet::from_item).collect())
    }

    async fn update(
        &self,
        pet_id: &str,
        update: &PetUpdate,
    ) -> Result<Map<String, Value>, PetApiError> {
        let expr = update.to_expression();
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("pet_id", AttributeValue::S(pet_id.to_string()))
            .update_expression(expr.expression)
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to update pet item: {}", e))?;

        let attrs = output
            .attributes()
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(name, value)| (name.clone(), attr_to_json(value)))
                    .collect()
            })
            .unwrap_or_default();
        Ok(attrs)
    }

    async fn delete(&self, pet_id: &str) -> Result<(), PetApiError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("pet_id", AttributeValue::S(pet_id.to_string()))
            .condition_expression("attribute_exists(pet_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Err(PetApiError::NotFound)
                } else {
                    Err(anyhow!("Failed to delete pet item: {}", service_err).into())
                }
            }
        }
    }
}
