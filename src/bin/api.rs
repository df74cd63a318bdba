use finance_agent_api::{
    agent::build_agent,
    api::{start_server, AppState},
    Config,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("finance_agent_api=info,tower_http=info")),
        )
        .init();

    // Refuse to start without a key
    let config = Config::from_env()?;

    info!("🚀 AI Finance Agent - API Server");
    info!("📍 Address: {}", config.bind_addr());
    info!("🧠 Model: {} ({} profile)", config.model, config.profile);

    let setup = build_agent(&config)?;

    info!("✅ Agent initialized");
    info!("📡 Starting API server...");

    start_server(AppState::from(setup), &config.bind_addr()).await?;

    Ok(())
}
