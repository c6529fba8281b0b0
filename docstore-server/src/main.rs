use docstore_server::config::Config;
use docstore_server::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.clone())
        .init();

    let app = router(AppState::new());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!(addr = %config.bind_address, "starting docstore server");
    axum::serve(listener, app).await?;

    Ok(())
}
