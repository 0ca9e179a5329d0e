use lambda_http::{Body, Error, Request, Response};
use pets_shared::config::AppConfig;
use pets_shared::upload::UploadUrlIssuer;
use pets_shared::{request, response};
use serde_json::Value;

const DEFAULT_MAIN_IMAGE: &str = "main.jpg";

/// POST /pets/{id}/upload-urls — one signed PUT URL per requested
/// filename, plus the main image, each paired with its permanent read URL.
pub(crate) async fn function_handler(
    issuer: &UploadUrlIssuer,
    config: &AppConfig,
    event: Request,
) -> Result<Response<Body>, Error> {
    let origin = &config.allowed_origin;

    let body = match request::json_object_body(&event) {
        Ok(body) => body,
        Err(err) => return response::from_error(&err, origin),
    };

    let pet_id = body.get("pet_id").and_then(Value::as_str).unwrap_or("");
    let filenames: Vec<String> = body
        .get("filenames")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let main_image = body
        .get("main_image")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_MAIN_IMAGE);

    match issuer.issue(pet_id, &filenames, main_image).await {
        Ok(targets) => response::json_response(200, origin, &targets),
        Err(err) => response::from_error(&err, origin),
    }
}
