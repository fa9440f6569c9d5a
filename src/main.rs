use anyhow::Result;
use gemini_relay::ai::OpenAiChatClient;
use gemini_relay::models::Config;
use gemini_relay::server::{create_router, AppState};
use gemini_relay::service::ChatService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gemini-relay");

    let config = Config::from_env()?;

    // One shared client for the process; it holds no per-call state.
    let client = Arc::new(OpenAiChatClient::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.completions_path.clone(),
    ));
    let chat = Arc::new(ChatService::new(
        client,
        config.model.clone(),
        config.temperature,
    ));

    let app = create_router(AppState { chat });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
