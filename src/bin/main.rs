use finance_agent_api::{agent::build_agent, Config};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ask <question...>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so the answer can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("finance_agent_api=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config = Config::from_env()?;
    let setup = build_agent(&config)?;

    info!(agent = %setup.agent.name(), "Running one-shot question");

    match setup.agent.run(&question).await {
        Ok(output) => {
            println!("{}", output.into_text());
            Ok(())
        }
        Err(e) => {
            error!("Agent processing failed: {}", e);
            Err(e.into())
        }
    }
}
