use lambda_http::{tracing, Body, Error, Request, Response};
use pets_shared::config::AppConfig;
use pets_shared::store::PetStore;
use pets_shared::{request, response};

/// GET /owners/{id}/pets — all listings for one owner, via the owner index.
pub(crate) async fn function_handler(
    store: &impl PetStore,
    config: &AppConfig,
    event: Request,
) -> Result<Response<Body>, Error> {
    let origin = &config.allowed_origin;

    let Some(owner_id) = request::path_param(&event, "id", "owners") else {
        return response::error_response(400, origin, "Missing owner id");
    };

    tracing::info!("Querying pets for owner {}", owner_id);
    match store.query_by_owner(&owner_id).await {
        Ok(pets) => response::json_response(200, origin, &pets),
        Err(err) => response::from_error(&err, origin),
    }
}
