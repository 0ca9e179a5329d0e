use lambda_http::{tracing, Body, Error, Request, Response};
use pets_shared::config::AppConfig;
use pets_shared::store::PetStore;
use pets_shared::{request, response};
use serde_json::json;

/// DELETE /pets/{id} — conditioned on existence, so deleting a missing
/// record is a 404 rather than a silent no-op.
pub(crate) async fn function_handler(
    store: &impl PetStore,
    config: &AppConfig,
    event: Request,
) -> Result<Response<Body>, Error> {
    let origin = &config.allowed_origin;

    let Some(pet_id) = request::path_param(&event, "id", "pets") else {
        return response::error_response(400, origin, "Missing pet id");
    };

    tracing::info!("Deleting pet {}", pet_id);
    match store.delete(&pet_id).await {
        Ok(()) => response::json_response(
            200,
            origin,
            &json!({ "message": "Pet deleted successfully" }),
        ),
        Err(err) => response::from_error(&err, origin),
    }
}
