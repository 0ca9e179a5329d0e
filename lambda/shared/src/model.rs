//! The pet record and its DynamoDB item representation.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::PetApiError;

/// A pet listing. Every record carries every attribute; anything the caller
/// omits at creation time gets the documented default, so readers never see
/// a partially-populated record.
///
/// The camelCase flag names and snake_case everything-else come from the
/// existing client contract; DynamoDB attribute names equal the wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    #[serde(default)]
    pub pet_id: String,
    #[serde(default = "default_unnamed")]
    pub pet_name: String,
    #[serde(default = "default_unknown")]
    pub pet_type: String,
    #[serde(default = "default_unknown")]
    pub age: String,
    #[serde(default = "default_unknown")]
    pub gender: String,
    #[serde(default = "default_unknown")]
    pub country: String,
    #[serde(default = "default_unknown")]
    pub province: String,
    #[serde(default = "default_unknown")]
    pub town: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_unknown")]
    pub owner_id: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub main_image_url: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, rename = "isSterilized")]
    pub is_sterilized: bool,
    #[serde(default, rename = "isVaccinated")]
    pub is_vaccinated: bool,
    #[serde(default, rename = "hasChip")]
    pub has_chip: bool,
    #[serde(default, rename = "hasPedigree")]
    pub has_pedigree: bool,
    #[serde(default, rename = "hasFCICertificate")]
    pub has_fci_certificate: bool,
    #[serde(default, rename = "hasParasiteTreatment")]
    pub has_parasite_treatment: bool,
    #[serde(default, rename = "hasVetPassport")]
    pub has_vet_passport: bool,
}

fn default_unnamed() -> String {
    "Unnamed".to_string()
}

fn default_unknown() -> String {
    "Unknown".to_string()
}

fn default_description() -> String {
    "No description".to_string()
}

impl Default for Pet {
    fn default() -> Self {
        Self {
            pet_id: String::new(),
            pet_name: default_unnamed(),
            pet_type: default_unknown(),
            age: default_unknown(),
            gender: default_unknown(),
            country: default_unknown(),
            province: default_unknown(),
            town: default_unknown(),
            description: default_description(),
            price: Decimal::ZERO,
            owner_id: default_unknown(),
            contact_name: String::new(),
            contact_phone: String::new(),
            main_image_url: String::new(),
            images: Vec::new(),
            is_sterilized: false,
            is_vaccinated: false,
            has_chip: false,
            has_pedigree: false,
            has_fci_certificate: false,
            has_parasite_treatment: false,
            has_vet_passport: false,
        }
    }
}

impl Pet {
    /// Parse a create-request body. All fields are optional; a fresh UUIDv4
    /// identifier is always assigned, never taken from the caller.
    pub fn from_create_body(body: &[u8]) -> Result<Self, PetApiError> {
        let mut pet: Pet = serde_json::from_slice(body)
            .map_err(|e| PetApiError::Validation(format!("Invalid JSON: {}", e)))?;
        pet.pet_id = Uuid::new_v4().to_string();
        Ok(pet)
    }

    /// Build the DynamoDB item for this record. Price is stored as a native
    /// number attribute so the store compares it numerically.
    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert("pet_id".to_string(), AttributeValue::S(self.pet_id.clone()));
        item.insert(
            "pet_name".to_string(),
            AttributeValue::S(self.pet_name.clone()),
        );
        item.insert(
            "pet_type".to_string(),
            AttributeValue::S(self.pet_type.clone()),
        );
        item.insert("age".to_string(), AttributeValue::S(self.age.clone()));
        item.insert("gender".to_string(), AttributeValue::S(self.gender.clone()));
        item.insert(
            "country".to_string(),
            AttributeValue::S(self.country.clone()),
        );
        item.insert(
            "province".to_string(),
            AttributeValue::S(self.province.clone()),
        );
        item.insert("town".to_string(), AttributeValue::S(self.town.clone()));
        item.insert(
            "description".to_string(),
            AttributeValue::S(self.description.clone()),
        );
        item.insert(
            "price".to_string(),
            AttributeValue::N(self.price.to_string()),
        );
        item.insert(
            "owner_id".to_string(),
            AttributeValue::S(self.owner_id.clone()),
        );
        item.insert(
            "contact_name".to_string(),
            AttributeValue::S(self.contact_name.clone()),
        );
        item.insert(
            "contact_phone".to_string(),
            AttributeValue::S(self.contact_phone.clone()),
        );
        item.insert(
            "main_image_url".to_string(),
            AttributeValue::S(self.main_image_url.clone()),
        );
        item.insert(
            "images".to_string(),
            AttributeValue::L(self.images.iter().cloned().map(AttributeValue::S).collect()),
        );
        item.insert(
            "isSterilized".to_string(),
            AttributeValue::Bool(self.is_sterilized),
        );
        item.insert(
            "isVaccinated".to_string(),
            AttributeValue::Bool(self.is_vaccinated),
        );
        item.insert("hasChip".to_string(), AttributeValue::Bool(self.has_chip));
        item.insert(
            "hasPedigree".to_string(),
            AttributeValue::Bool(self.has_pedigree),
        );
        item.insert(
            "hasFCICertificate".to_string(),
            AttributeValue::Bool(self.has_fci_certificate),
        );
        item.insert(
            "hasParasiteTreatment".to_string(),
            AttributeValue::Bool(self.has_parasite_treatment),
        );
        item.insert(
            "hasVetPassport".to_string(),
            AttributeValue::Bool(self.has_vet_passport),
        );
        item
    }

    /// Rehydrate a record from a DynamoDB item. Attributes missing from
    /// items written by older revisions resolve to the creation defaults.
    pub fn from_item(item: &HashMap<String, AttributeValue>) -> Self {
        Self {
            pet_id: string_attr(item, "pet_id", ""),
            pet_name: string_attr(item, "pet_name", "Unnamed"),
            pet_type: string_attr(item, "pet_type", "Unknown"),
            age: string_attr(item, "age", "Unknown"),
            gender: string_attr(item, "gender", "Unknown"),
            country: string_attr(item, "country", "Unknown"),
            province: string_attr(item, "province", "Unknown"),
            town: string_attr(item, "town", "Unknown"),
            description: string_attr(item, "description", "No description"),
            price: price_attr(item),
            owner_id: string_attr(item, "owner_id", "Unknown"),
            contact_name: string_attr(item, "contact_name", ""),
            contact_phone: string_attr(item, "contact_phone", ""),
            main_image_url: string_attr(item, "main_image_url", ""),
            images: list_attr(item, "images"),
            is_sterilized: bool_attr(item, "isSterilized"),
            is_vaccinated: bool_attr(item, "isVaccinated"),
            has_chip: bool_attr(item, "hasChip"),
            has_pedigree: bool_attr(item, "hasPedigree"),
            has_fci_certificate: bool_attr(item, "hasFCICertificate"),
            has_parasite_treatment: bool_attr(item, "hasParasiteTreatment"),
            has_vet_passport: bool_attr(item, "hasVetPassport"),
        }
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str, default: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn bool_attr(item: &HashMap<String, AttributeValue>, name: &str) -> bool {
    item.get(name)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false)
}

fn list_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Vec<String> {
    item.get(name)
        .and_then(|v| v.as_l().ok())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_s().ok().cloned())
                .collect()
        })
        .unwrap_or_default()
}

fn price_attr(item: &HashMap<String, AttributeValue>) -> Decimal {
    item.get("price")
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

/// Convert a single DynamoDB attribute into JSON for response echoing.
/// Numbers become JSON floats, the same lossy boundary the record itself
/// uses when serializing `price`.
pub fn attr_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => n
            .parse::<Decimal>()
            .ok()
            .and_then(|d| d.to_f64())
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::L(values) => Value::Array(values.iter().map(attr_to_json).collect()),
        _ => Value::Null,
    }
}
