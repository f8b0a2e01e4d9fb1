use crate::components::extractor::Extractor;
use crate::components::google_calendar::{CalendarService, GoogleCalendarClient};
use crate::components::scheduler::{DirectScheduler, Scheduler};
use crate::config::{Config, SchedulerMode};
use crate::error::{Error, ServiceResult};
use crate::handlers::{router, AppState};
use crate::shutdown;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the calendar client and scheduler for the configured mode
pub fn build_state(config: &Config) -> ServiceResult<AppState> {
    let extractor = Extractor::new(config.tz()?);
    let calendar: Arc<dyn CalendarService> = Arc::new(GoogleCalendarClient::from_config(config));
    let direct = Arc::new(DirectScheduler::new(extractor, Arc::clone(&calendar)));

    let scheduler: Arc<dyn Scheduler> = match config.scheduler_mode {
        SchedulerMode::Direct => direct,
        SchedulerMode::Agent => agent_scheduler(config, direct)?,
    };

    info!(
        "Scheduler mode: {}, calendar: {}, timezone: {}",
        config.scheduler_mode, config.google_calendar_id, config.timezone
    );

    Ok(AppState::new(scheduler, calendar))
}

#[cfg(feature = "agent")]
fn agent_scheduler(config: &Config, direct: Arc<DirectScheduler>) -> ServiceResult<Arc<dyn Scheduler>> {
    use crate::components::agent::AgentScheduler;
    use crate::error::env_error;

    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| env_error("OPENAI_API_KEY"))?;

    Ok(Arc::new(AgentScheduler::new(
        api_key,
        &config.openai_model,
        direct,
    )))
}

#[cfg(not(feature = "agent"))]
fn agent_scheduler(_config: &Config, _direct: Arc<DirectScheduler>) -> ServiceResult<Arc<dyn Scheduler>> {
    Err(crate::error::config_error(
        "SCHEDULER_MODE=agent requires building with the 'agent' feature",
    ))
}

/// Bind the listener and serve until a shutdown signal arrives
pub async fn start_server(config: Arc<Config>) -> miette::Result<()> {
    let state = build_state(&config)?;
    let app = router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(Error::from)?;

    info!("Calendar API is running at: http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
