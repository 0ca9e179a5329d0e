//! JSON response formatting with one consistent set of CORS headers.

use lambda_http::{Body, Error, Response};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::error::PetApiError;

/// Serialize `body` into a JSON response carrying the CORS headers every
/// handler attaches, success and failure alike.
pub fn json_response<T: Serialize>(
    status: u16,
    origin: &str,
    body: &T,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", origin)
        .header("Access-Control-Allow-Headers", "Content-Type,Authorization")
        .header("Access-Control-Allow-Methods", "OPTIONS,GET,POST,PUT,DELETE")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

pub fn error_response(status: u16, origin: &str, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, origin, &json!({ "error": message }))
}

/// Map a handler error onto the wire: validation -> 400 with the message,
/// not-found -> 404, store failure -> 500 with the cause logged and a
/// generic body.
pub fn from_error(err: &PetApiError, origin: &str) -> Result<Response<Body>, Error> {
    match err {
        PetApiError::Validation(message) => error_response(400, origin, message),
        PetApiError::NotFound => error_response(404, origin, "Pet not found"),
        PetApiError::Store(cause) => {
            error!("store operation failed: {:#}", cause);
            error_response(500, origin, "Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    fn body_text(response: &Response<Body>) -> &str {
        match response.body() {
            Body::Text(text) => text,
            other => panic!("expected text body, got {:?}", other),
        }
    }

    #[test]
    fn responses_carry_cors_headers() {
        let response = json_response(200, "*", &json!({"ok": true})).unwrap();
        assert_eq!(
            response.headers()["Access-Control-Allow-Origin"],
            "*"
        );
        assert_eq!(
            response.headers()["Access-Control-Allow-Methods"],
            "OPTIONS,GET,POST,PUT,DELETE"
        );
    }

    #[test]
    fn store_errors_hide_the_cause() {
        let err = PetApiError::Store(anyhow!("connection refused"));
        let response = from_error(&err, "*").unwrap();
        assert_eq!(response.status(), 500);
        assert!(body_text(&response).contains("Internal Server Error"));
        assert!(!body_text(&response).contains("connection refused"));
    }

    #[test]
    fn validation_errors_reach_the_caller() {
        let err = PetApiError::Validation("min_price must be a decimal number".to_string());
        let response = from_error(&err, "*").unwrap();
        assert_eq!(response.status(), 400);
        assert!(body_text(&response).contains("min_price"));
    }
}
