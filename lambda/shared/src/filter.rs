//! Filter expression builder for the listing endpoint.
//!
//! A `PetFilter` is one predicate with two evaluations: a DynamoDB filter
//! expression for the real table scan, and an in-process `matches` used by
//! the memory store and the tests. Both must agree.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use lambda_http::aws_lambda_events::query_map::QueryMap;
use rust_decimal::Decimal;

use crate::error::PetApiError;
use crate::model::Pet;

/// Conjunction of optional equality and price-range predicates. An
/// all-absent filter matches every record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PetFilter {
    pub pet_type: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub town: Option<String>,
    pub age: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// A rendered DynamoDB filter expression with its attribute name and value
/// placeholders.
#[derive(Debug, Clone)]
pub struct FilterExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl PetFilter {
    /// Build a filter from listing query parameters. Blank or
    /// whitespace-only values count as absent. Malformed price bounds are a
    /// validation error rather than a silently-dropped bound.
    pub fn from_query(params: &QueryMap) -> Result<Self, PetApiError> {
        Ok(Self {
            pet_type: scalar_param(params, "type"),
            country: scalar_param(params, "country"),
            province: scalar_param(params, "province"),
            town: scalar_param(params, "town"),
            age: scalar_param(params, "age"),
            min_price: price_param(params, "min_price")?,
            max_price: price_param(params, "max_price")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pet_type.is_none()
            && self.country.is_none()
            && self.province.is_none()
            && self.town.is_none()
            && self.age.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Render the DynamoDB side of the predicate, or `None` when every
    /// input is absent and the scan should run unfiltered.
    pub fn to_expression(&self) -> Option<FilterExpression> {
        if self.is_empty() {
            return None;
        }

        let mut clauses = Vec::new();
        let mut names = HashMap::new();
        let mut values = HashMap::new();

        let scalars = [
            ("pet_type", &self.pet_type),
            ("country", &self.country),
            ("province", &self.province),
            ("town", &self.town),
            ("age", &self.age),
        ];
        for (attr, value) in scalars {
            if let Some(value) = value {
                clauses.push(format!("#{attr} = :{attr}"));
                names.insert(format!("#{attr}"), attr.to_string());
                values.insert(format!(":{attr}"), AttributeValue::S(value.clone()));
            }
        }

        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => {
                clauses.push("#price BETWEEN :min_price AND :max_price".to_string());
                names.insert("#price".to_string(), "price".to_string());
                values.insert(":min_price".to_string(), AttributeValue::N(min.to_string()));
                values.insert(":max_price".to_string(), AttributeValue::N(max.to_string()));
            }
            (Some(min), None) => {
                clauses.push("#price >= :min_price".to_string());
                names.insert("#price".to_string(), "price".to_string());
                values.insert(":min_price".to_string(), AttributeValue::N(min.to_string()));
            }
            (None, Some(max)) => {
                clauses.push("#price <= :max_price".to_string());
                names.insert("#price".to_string(), "price".to_string());
                values.insert(":max_price".to_string(), AttributeValue::N(max.to_string()));
            }
            (None, None) => {}
        }

        Some(FilterExpression {
            expression: clauses.join(" AND "),
            names,
            values,
        })
    }

    /// The same predicate evaluated against a full record.
    pub fn matches(&self, pet: &Pet) -> bool {
        scalar_matches(&self.pet_type, &pet.pet_type)
            && scalar_matches(&self.country, &pet.country)
            && scalar_matches(&self.province, &pet.province)
            && scalar_matches(&self.town, &pet.town)
            && scalar_matches(&self.age, &pet.age)
            && self.min_price.is_none_or(|min| pet.price >= min)
            && self.max_price.is_none_or(|max| pet.price <= max)
    }
}

fn scalar_matches(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().is_none_or(|f| f == value)
}

fn scalar_param(params: &QueryMap, name: &str) -> Option<String> {
    params
        .first(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn price_param(params: &QueryMap, name: &str) -> Result<Option<Decimal>, PetApiError> {
    match params.first(name).map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<Decimal>().map(Some).map_err(|_| {
            PetApiError::Validation(format!("{name} must be a decimal number"))
        }),
    }
}
