//! Small request-extraction helpers shared by the handlers.

use lambda_http::{Request, RequestExt};
use serde_json::{Map, Value};

use crate::error::PetApiError;

/// Read a path parameter, falling back to the URI segment following
/// `parent` when the invocation carries no API Gateway path parameters
/// (direct function URLs, tests).
pub fn path_param(event: &Request, name: &str, parent: &str) -> Option<String> {
    if let Some(value) = event.path_parameters().first(name) {
        return Some(value.to_string());
    }

    let mut segments = event.uri().path().split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment == parent {
            return segments.next().map(str::to_string);
        }
    }
    None
}

/// Parse the request body as a JSON object. Empty and malformed bodies, and
/// bodies that are not objects, are validation errors.
pub fn json_object_body(event: &Request) -> Result<Map<String, Value>, PetApiError> {
    let body = event.body();
    if body.as_ref().is_empty() {
        return Err(PetApiError::Validation(
            "Bad Request: Missing body".to_string(),
        ));
    }
    let value: Value = serde_json::from_slice(body.as_ref())
        .map_err(|e| PetApiError::Validation(format!("Invalid JSON: {}", e)))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PetApiError::Validation(
            "request body must be a JSON object".to_string(),
        )),
    }
}
