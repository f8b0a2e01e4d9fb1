use calendar_scheduler::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calendar scheduler");

    // Load configuration
    let config = startup::load_config()?;

    // Start the HTTP server
    startup::start_server(config).await
}
