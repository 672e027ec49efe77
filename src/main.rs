use std::sync::Arc;

use brandfetch_proxy::{
    brandfetch_client::ReqwestBrandfetchClient, build_app, config::Config, logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let client = Arc::new(ReqwestBrandfetchClient::new(&config.api_base)?);
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config.fallback_api_key.clone(), client);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        api_base = %config.api_base,
        fallback_key_configured = config.fallback_api_key.is_some(),
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
