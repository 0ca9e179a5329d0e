//! Update expression builder with a closed field schema.
//!
//! The previous revision of this API passed arbitrary caller-supplied
//! attribute names straight into the store. Updates are now validated
//! against the known field set before any store call: unknown names, type
//! mismatches, and empty bodies are all rejected at the boundary.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::PetApiError;
use crate::model::Pet;

/// Every mutable pet attribute. `pet_id` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetField {
    PetName,
    PetType,
    Age,
    Gender,
    Country,
    Province,
    Town,
    Description,
    Price,
    OwnerId,
    ContactName,
    ContactPhone,
    MainImageUrl,
    Images,
    IsSterilized,
    IsVaccinated,
    HasChip,
    HasPedigree,
    HasFciCertificate,
    HasParasiteTreatment,
    HasVetPassport,
}

impl PetField {
    pub const ALL: [PetField; 21] = [
        PetField::PetName,
        PetField::PetType,
        PetField::Age,
        PetField::Gender,
        PetField::Country,
        PetField::Province,
        PetField::Town,
        PetField::Description,
        PetField::Price,
        PetField::OwnerId,
        PetField::ContactName,
        PetField::ContactPhone,
        PetField::MainImageUrl,
        PetField::Images,
        PetField::IsSterilized,
        PetField::IsVaccinated,
        PetField::HasChip,
        PetField::HasPedigree,
        PetField::HasFciCertificate,
        PetField::HasParasiteTreatment,
        PetField::HasVetPassport,
    ];

    /// Wire name, also used verbatim as the DynamoDB attribute name.
    pub fn name(self) -> &'static str {
        match self {
            PetField::PetName => "pet_name",
            PetField::PetType => "pet_type",
            PetField::Age => "age",
            PetField::Gender => "gender",
            PetField::Country => "country",
            PetField::Province => "province",
            PetField::Town => "town",
            PetField::Description => "description",
            PetField::Price => "price",
            PetField::OwnerId => "owner_id",
            PetField::ContactName => "contact_name",
            PetField::ContactPhone => "contact_phone",
            PetField::MainImageUrl => "main_image_url",
            PetField::Images => "images",
            PetField::IsSterilized => "isSterilized",
            PetField::IsVaccinated => "isVaccinated",
            PetField::HasChip => "hasChip",
            PetField::HasPedigree => "hasPedigree",
            PetField::HasFciCertificate => "hasFCICertificate",
            PetField::HasParasiteTreatment => "hasParasiteTreatment",
            PetField::HasVetPassport => "hasVetPassport",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PetField::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Coerce a JSON value into this field's permitted type.
    fn coerce(self, value: &Value) -> Result<FieldValue, PetApiError> {
        let mismatch = |expected: &str| {
            PetApiError::Validation(format!("{} must be a {}", self.name(), expected))
        };
        match self {
            PetField::Price => {
                let number = value.as_f64().ok_or_else(|| mismatch("number"))?;
                let price =
                    Decimal::from_f64(number).ok_or_else(|| mismatch("finite number"))?;
                Ok(FieldValue::Price(price))
            }
            PetField::Images => {
                let items = value.as_array().ok_or_else(|| mismatch("list of strings"))?;
                let images = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| mismatch("list of strings"))?;
                Ok(FieldValue::List(images))
            }
            PetField::IsSterilized
            | PetField::IsVaccinated
            | PetField::HasChip
            | PetField::HasPedigree
            | PetField::HasFciCertificate
            | PetField::HasParasiteTreatment
            | PetField::HasVetPassport => {
                let flag = value.as_bool().ok_or_else(|| mismatch("boolean"))?;
                Ok(FieldValue::Flag(flag))
            }
            _ => {
                let text = value.as_str().ok_or_else(|| mismatch("string"))?;
                Ok(FieldValue::Text(text.to_string()))
            }
        }
    }
}

/// A validated new value for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Price(Decimal),
    Flag(bool),
    List(Vec<String>),
}

impl FieldValue {
    pub fn to_attribute_value(&self) -> AttributeValue {
        match self {
            FieldValue::Text(s) => AttributeValue::S(s.clone()),
            FieldValue::Price(d) => AttributeValue::N(d.to_string()),
            FieldValue::Flag(b) => AttributeValue::Bool(*b),
            FieldValue::List(items) => {
                AttributeValue::L(items.iter().cloned().map(AttributeValue::S).collect())
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Price(d) => crate::model::attr_to_json(&AttributeValue::N(d.to_string())),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// A rendered `SET` update expression with its placeholder maps.
#[derive(Debug, Clone)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// A validated partial update: at least one known field, each with a value
/// of the permitted type.
#[derive(Debug, Clone, PartialEq)]
pub struct PetUpdate {
    fields: Vec<(PetField, FieldValue)>,
}

impl PetUpdate {
    /// Validate a request-body field map. Rejected before any store call:
    /// an empty map, `pet_id`, unknown field names, mistyped values.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, PetApiError> {
        if body.is_empty() {
            return Err(PetApiError::Validation(
                "update body must set at least one field".to_string(),
            ));
        }

        let mut fields = Vec::with_capacity(body.len());
        for (name, value) in body {
            if name == "pet_id" {
                return Err(PetApiError::Validation("pet_id is immutable".to_string()));
            }
            let field = PetField::from_name(name).ok_or_else(|| {
                PetApiError::Validation(format!("unknown field: {name}"))
            })?;
            fields.push((field, field.coerce(value)?));
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[(PetField, FieldValue)] {
        &self.fields
    }

    /// Render `SET #f0 = :v0, ...` with one placeholder pair per field.
    pub fn to_expression(&self) -> UpdateExpression {
        let mut assignments = Vec::with_capacity(self.fields.len());
        let mut names = HashMap::new();
        let mut values = HashMap::new();

        for (i, (field, value)) in self.fields.iter().enumerate() {
            assignments.push(format!("#f{i} = :v{i}"));
            names.insert(format!("#f{i}"), field.name().to_string());
            values.insert(format!(":v{i}"), value.to_attribute_value());
        }

        UpdateExpression {
            expression: format!("SET {}", assignments.join(", ")),
            names,
            values,
        }
    }

    /// Apply the update in process, setting exactly the named fields.
    pub fn apply(&self, pet: &mut Pet) {
        for (field, value) in &self.fields {
            match (field, value) {
                (PetField::PetName, FieldValue::Text(s)) => pet.pet_name = s.clone(),
                (PetField::PetType, FieldValue::Text(s)) => pet.pet_type = s.clone(),
                (PetField::Age, FieldValue::Text(s)) => pet.age = s.clone(),
                (PetField::Gender, FieldValue::Text(s)) => pet.gender = s.clone(),
                (PetField::Country, FieldValue::Text(s)) => pet.country = s.clone(),
                (PetField::Province, FieldValue::Text(s)) => pet.province = s.clone(),
                (PetField::Town, FieldValue::Text(s)) => pet.town = s.clone(),
                (PetField::Description, FieldValue::Text(s)) => pet.description = s.clone(),
                (PetField::Price, FieldValue::Price(d)) => pet.price = *d,
                (PetField::OwnerId, FieldValue::Text(s)) => pet.owner_id = s.clone(),
                (PetField::ContactName, FieldValue::Text(s)) => pet.contact_name = s.clone(),
                (PetField::ContactPhone, FieldValue::Text(s)) => pet.contact_phone = s.clone(),
                (PetField::MainImageUrl, FieldValue::Text(s)) => pet.main_image_url = s.clone(),
                (PetField::Images, FieldValue::List(items)) => pet.images = items.clone(),
                (PetField::IsSterilized, FieldValue::Flag(b)) => pet.is_sterilized = *b,
                (PetField::IsVaccinated, FieldValue::Flag(b)) => pet.is_vaccinated = *b,
                (PetField::HasChip, FieldValue::Flag(b)) => pet.has_chip = *b,
                (PetField::HasPedigree, FieldValue::Flag(b)) => pet.has_pedigree = *b,
                (PetField::HasFciCertificate, FieldValue::Flag(b)) => {
                    pet.has_fci_certificate = *b
                }
                (PetField::HasParasiteTreatment, FieldValue::Flag(b)) => {
                    pet.has_parasite_treatment = *b
                }
                (PetField::HasVetPassport, FieldValue::Flag(b)) => pet.has_vet_passport = *b,
                // from_json pairs each field with its own permitted type
                _ => unreachable!("field/value type pairing enforced at construction"),
            }
        }
    }

    /// The updated-attribute snapshot, mirroring DynamoDB `UPDATED_NEW`.
    pub fn updated_attributes(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(field, value)| (field.name().to_string(), value.to_json()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: Value) -> Map<String, Value> {
        json.as_object().unwrap().clone()
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = PetUpdate::from_json(&Map::new()).unwrap_err();
        assert!(matches!(err, PetApiError::Validation(_)));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err =
            PetUpdate::from_json(&body(serde_json::json!({"favourite_snack": "ham"})))
                .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn pet_id_is_immutable() {
        let err = PetUpdate::from_json(&body(serde_json::json!({"pet_id": "x"}))).unwrap_err();
        assert!(err.to_string().contains("immutable"));
    }

    #[test]
    fn mistyped_value_is_rejected() {
        let err =
            PetUpdate::from_json(&body(serde_json::json!({"price": "expensive"}))).unwrap_err();
        assert!(err.to_string().contains("price"));

        let err =
            PetUpdate::from_json(&body(serde_json::json!({"isVaccinated": "yes"}))).unwrap_err();
        assert!(err.to_string().contains("isVaccinated"));
    }

    #[test]
    fn apply_changes_exactly_the_named_fields() {
        let update = PetUpdate::from_json(&body(
            serde_json::json!({"price": 150, "isVaccinated": true}),
        ))
        .unwrap();

        let mut pet = Pet::default();
        pet.pet_id = "p-1".to_string();
        pet.pet_name = "Rex".to_string();
        let before = pet.clone();

        update.apply(&mut pet);

        assert_eq!(pet.price, Decimal::from(150));
        assert!(pet.is_vaccinated);

        // Everything else is untouched.
        let mut reverted = pet.clone();
        reverted.price = before.price;
        reverted.is_vaccinated = before.is_vaccinated;
        assert_eq!(reverted, before);
    }

    #[test]
    fn expression_sets_each_field_once() {
        let update = PetUpdate::from_json(&body(
            serde_json::json!({"pet_name": "Mika", "price": 300, "images": ["a.jpg"]}),
        ))
        .unwrap();
        let expr = update.to_expression();

        assert!(expr.expression.starts_with("SET "));
        assert_eq!(expr.names.len(), 3);
        assert_eq!(expr.values.len(), 3);
        assert!(expr.names.values().any(|n| n == "pet_name"));
        assert!(expr.names.values().any(|n| n == "price"));
        assert!(expr.names.values().any(|n| n == "images"));
    }

    #[test]
    fn updated_attributes_echo_the_new_values() {
        let update = PetUpdate::from_json(&body(
            serde_json::json!({"price": 300, "isVaccinated": true}),
        ))
        .unwrap();
        let attrs = update.updated_attributes();
        assert_eq!(attrs["price"], serde_json::json!(300.0));
        assert_eq!(attrs["isVaccinated"], serde_json::json!(true));
    }

    #[test]
    fn every_field_name_round_trips() {
        for field in PetField::ALL {
            assert_eq!(PetField::from_name(field.name()), Some(field));
        }
        assert_eq!(PetField::from_name("pet_id"), None);
    }
}
