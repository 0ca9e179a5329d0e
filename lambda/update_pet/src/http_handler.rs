use lambda_http::{tracing, Body, Error, Request, Response};
use pets_shared::config::AppConfig;
use pets_shared::store::PetStore;
use pets_shared::update::PetUpdate;
use pets_shared::{request, response};
use serde_json::json;

/// PUT /pets/{id} — body is a partial field map, validated against the
/// known field set before the store sees it.
pub(crate) async fn function_handler(
    store: &impl PetStore,
    config: &AppConfig,
    event: Request,
) -> Result<Response<Body>, Error> {
    let origin = &config.allowed_origin;

    let Some(pet_id) = request::path_param(&event, "id", "pets") else {
        return response::error_response(400, origin, "Missing pet id");
    };

    let body = match request::json_object_body(&event) {
        Ok(body) => body,
        Err(err) => return response::from_error(&err, origin),
    };

    let update = match PetUpdate::from_json(&body) {
        Ok(update) => update,
        Err(err) => return response::from_error(&err, origin),
    };

    tracing::info!("Updating pet {} ({} fields)", pet_id, update.fields().len());
    match store.update(&pet_id, &update).await {
        Ok(attrs) => response::json_response(
            200,
            origin,
            &json!({ "message": "Pet updated successfully", "updated_attributes": attrs }),
        ),
        Err(err) => response::from_error(&err, origin),
    }
}
