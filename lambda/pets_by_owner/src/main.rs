use lambda_http::{run, service_fn, tracing, Error};
use pets_shared::config::AppConfig;
use pets_shared::store::DynamoPetStore;

mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = AppConfig::from_env();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoPetStore::new(aws_sdk_dynamodb::Client::new(&aws_config), &config);

    run(service_fn(|event| function_handler(&store, &config, event))).await
}
