use lambda_http::{Body, Error, Request, Response};
use pets_shared::config::AppConfig;
use pets_shared::store::PetStore;
use pets_shared::{request, response};

/// GET /pets/{id}
pub(crate) async fn function_handler(
    store: &impl PetStore,
    config: &AppConfig,
    event: Request,
) -> Result<Response<Body>, Error> {
    let origin = &config.allowed_origin;

    let Some(pet_id) = request::path_param(&event, "id", "pets") else {
        return response::error_response(400, origin, "Missing pet id");
    };

    match store.get(&pet_id).await {
        Ok(Some(pet)) => response::json_response(200, origin, &pet),
        Ok(None) => response::error_response(404, origin, "Pet not found"),
        Err(err) => response::from_error(&err, origin),
    }
}

#[cfg(test)]
mod tests {
    use lambda_http::http;
    use pets_shared::model::Pet;
    use pets_shared::store::MemoryPetStore;
    use serde_json::Value;

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            table_name: "Pets".to_string(),
            owner_index: "owner_id-index".to_string(),
            bucket: "pet-profiles".to_string(),
            allowed_origin: "*".to_string(),
        }
    }

    fn get(uri: &str) -> Request {
        http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::Empty)
            .unwrap()
    }

    fn body_json(response: &Response<Body>) -> Value {
        match response.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap(),
            other => panic!("expected text body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn returns_the_full_record() {
        let store = MemoryPetStore::new();
        let mut pet = Pet::default();
        pet.pet_id = "p-1".to_string();
        pet.pet_name = "Rex".to_string();
        store.create(&pet).await.unwrap();

        let response = function_handler(&store, &config(), get("/pets/p-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body = body_json(&response);
        assert_eq!(body["pet_id"], "p-1");
        assert_eq!(body["pet_name"], "Rex");
        assert_eq!(body["pet_type"], "Unknown");
        assert_eq!(body["isVaccinated"], false);
    }

    #[tokio::test]
    async fn unknown_id_is_a_404() {
        let store = MemoryPetStore::new();
        let response = function_handler(&store, &config(), get("/pets/missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(body_json(&response)["error"], "Pet not found");
    }

    #[tokio::test]
    async fn missing_id_is_a_400() {
        let store = MemoryPetStore::new();
        let response = function_handler(&store, &config(), get("/pets/"))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }
}
