use lambda_http::{tracing, Body, Error, Request, RequestExt, Response};
use pets_shared::config::AppConfig;
use pets_shared::filter::PetFilter;
use pets_shared::response;
use pets_shared::store::PetStore;
use serde_json::json;

const DEFAULT_PAGE_SIZE: i32 = 10;

/// GET /pets?type=&age=&sort=&country=&province=&town=&min_price=&max_price=&limit=&nextToken=
pub(crate) async fn function_handler(
    store: &impl PetStore,
    config: &AppConfig,
    event: Request,
) -> Result<Response<Body>, Error> {
    let origin = &config.allowed_origin;
    let params = event.query_string_parameters();

    let filter = match PetFilter::from_query(&params) {
        Ok(filter) => filter,
        Err(err) => return response::from_error(&err, origin),
    };

    let limit = match params.first("limit").map(str::trim).filter(|s| !s.is_empty()) {
        None => DEFAULT_PAGE_SIZE,
        Some(raw) => match raw.parse::<i32>() {
            Ok(n) if n > 0 => n,
            _ => return response::error_response(400, origin, "limit must be a positive integer"),
        },
    };

    let next_token = params
        .first("nextToken")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    tracing::info!("Listing pets, filter: {:?}, limit: {}", filter, limit);

    let page = match store.scan(&filter, limit, next_token.as_deref()).await {
        Ok(page) => page,
        Err(err) => return response::from_error(&err, origin),
    };

    let mut pets = page.pets;
    match params.first("sort") {
        Some("price_asc") => pets.sort_by(|a, b| a.price.cmp(&b.price)),
        Some("price_desc") => pets.sort_by(|a, b| b.price.cmp(&a.price)),
        // any other value leaves the store-defined scan order untouched
        _ => {}
    }

    response::json_response(
        200,
        origin,
        &json!({ "pets": pets, "nextToken": page.next_token }),
    )
}
