use lambda_http::{run, service_fn, tracing, Error};
use pets_shared::config::AppConfig;
use pets_shared::upload::UploadUrlIssuer;

mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = AppConfig::from_env();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let issuer = UploadUrlIssuer::new(aws_sdk_s3::Client::new(&aws_config), config.bucket.clone());

    run(service_fn(|event| function_handler(&issuer, &config, event))).await
}
