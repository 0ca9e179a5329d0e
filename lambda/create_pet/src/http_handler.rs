use lambda_http::{tracing, Body, Error, Request, Response};
use pets_shared::config::AppConfig;
use pets_shared::model::Pet;
use pets_shared::response;
use pets_shared::store::PetStore;
use serde_json::json;

/// POST /pets — every field optional, defaults substituted, identifier
/// always freshly generated.
pub(crate) async fn function_handler(
    store: &impl PetStore,
    config: &AppConfig,
    event: Request,
) -> Result<Response<Body>, Error> {
    let origin = &config.allowed_origin;

    let body = event.body();
    if body.as_ref().is_empty() {
        return response::error_response(400, origin, "Bad Request: Missing body");
    }

    let pet = match Pet::from_create_body(body.as_ref()) {
        Ok(pet) => pet,
        Err(err) => return response::from_error(&err, origin),
    };

    tracing::info!("Creating pet {}", pet.pet_id);
    match store.create(&pet).await {
        Ok(()) => response::json_response(
            200,
            origin,
            &json!({ "message": "Pet created successfully", "pet_id": pet.pet_id }),
        ),
        Err(err) => response::from_error(&err, origin),
    }
}

#[cfg(test)]
mod tests {
    use lambda_http::http;
    use pets_shared::store::MemoryPetStore;
    use rust_decimal::Decimal;
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            table_name: "Pets".to_string(),
            owner_index: "owner_id-index".to_string(),
            bucket: "pet-profiles".to_string(),
            allowed_origin: "*".to_string(),
        }
    }

    fn post(body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri("/pets")
            .body(Body::Text(body.to_string()))
            .unwrap()
    }

    fn body_json(response: &Response<Body>) -> Value {
        match response.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap(),
            other => panic!("expected text body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_body_is_a_400() {
        let store = MemoryPetStore::new();
        let event = http::Request::builder()
            .method("POST")
            .uri("/pets")
            .body(Body::Empty)
            .unwrap();
        let response = function_handler(&store, &config(), event).await.unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn malformed_json_is_a_400() {
        let store = MemoryPetStore::new();
        let response = function_handler(&store, &config(), post("{oops"))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn create_fills_defaults_and_issues_an_id() {
        let store = MemoryPetStore::new();
        let response = function_handler(
            &store,
            &config(),
            post(r#"{"pet_name": "Rex", "price": 250.5}"#),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["message"], "Pet created successfully");

        let pet_id = body["pet_id"].as_str().unwrap();
        assert!(Uuid::parse_str(pet_id).is_ok());

        let pet = store.get(pet_id).await.unwrap().unwrap();
        assert_eq!(pet.pet_name, "Rex");
        assert_eq!(pet.price, Decimal::new(2505, 1));
        assert_eq!(pet.pet_type, "Unknown");
        assert_eq!(pet.description, "No description");
        assert!(!pet.is_vaccinated);
    }

    #[tokio::test]
    async fn issued_ids_never_collide() {
        let store = MemoryPetStore::new();
        for _ in 0..10_000 {
            let response = function_handler(&store, &config(), post("{}")).await.unwrap();
            assert_eq!(response.status(), 200);
        }
        // The store is keyed by id, so a collision would collapse entries.
        assert_eq!(store.len(), 10_000);
    }
}
