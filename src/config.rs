use crate::error::{config_error, env_error, ServiceResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::str::FromStr;

/// Optional TOML file whose values override the environment
pub const CONFIG_FILE: &str = "config/server.toml";

/// Default OpenAI model used by the agent
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// How create requests are turned into calendar events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerMode {
    /// Extractor followed by the calendar client
    Direct,
    /// LLM agent with the calendar tool registered
    Agent,
}

impl FromStr for SchedulerMode {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(SchedulerMode::Direct),
            "agent" => Ok(SchedulerMode::Agent),
            other => Err(config_error(&format!(
                "Invalid SCHEDULER_MODE '{}', expected 'direct' or 'agent'",
                other
            ))),
        }
    }
}

impl fmt::Display for SchedulerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerMode::Direct => write!(f, "direct"),
            SchedulerMode::Agent => write!(f, "agent"),
        }
    }
}

/// Main configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Google Calendar ID events are written to and read from
    pub google_calendar_id: String,
    /// Path of the authorized-user token file
    pub google_token_file: String,
    /// OAuth client ID, only needed to bootstrap the token file
    pub google_client_id: Option<String>,
    /// OAuth client secret, only needed to bootstrap the token file
    pub google_client_secret: Option<String>,
    /// Reference timezone for resolving time phrases
    pub timezone: String,
    /// Which create path the server uses
    pub scheduler_mode: SchedulerMode,
    /// OpenAI API key for the agent
    pub openai_api_key: Option<String>,
    /// OpenAI model for the agent
    pub openai_model: String,
}

/// Values accepted in the override file
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    host: Option<String>,
    port: Option<u16>,
    google_calendar_id: Option<String>,
    google_token_file: Option<String>,
    timezone: Option<String>,
    scheduler_mode: Option<SchedulerMode>,
    openai_model: Option<String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> ServiceResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let overrides = fs::read_to_string(CONFIG_FILE).ok();
        Self::from_sources(|key| env::var(key).ok(), overrides.as_deref())
    }

    /// Build and validate configuration from a variable lookup
    pub fn from_vars<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_sources(lookup, None)
    }

    /// Build configuration from a variable lookup and an optional TOML
    /// override document, validating only the merged result
    pub fn from_sources<F>(lookup: F, overrides: Option<&str>) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::read_vars(lookup)?;

        if let Some(content) = overrides {
            config.apply_overrides(content)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn read_vars<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = lookup("HOST").unwrap_or_else(|| String::from("0.0.0.0"));

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| config_error(&format!("Invalid PORT format: {}", value)))?,
            None => 8000,
        };

        let google_calendar_id =
            lookup("GOOGLE_CALENDAR_ID").unwrap_or_else(|| String::from("primary"));
        let google_token_file =
            lookup("GOOGLE_TOKEN_FILE").unwrap_or_else(|| String::from("token.json"));
        let google_client_id = lookup("GOOGLE_CLIENT_ID");
        let google_client_secret = lookup("GOOGLE_CLIENT_SECRET");

        // Default timezone
        let timezone = lookup("TIMEZONE").unwrap_or_else(|| String::from("UTC"));

        let openai_api_key = lookup("OPENAI_API_KEY");
        let openai_model =
            lookup("OPENAI_MODEL").unwrap_or_else(|| String::from(DEFAULT_OPENAI_MODEL));

        // Agent mode only makes sense when a key is present
        let scheduler_mode = match lookup("SCHEDULER_MODE") {
            Some(value) => value.parse::<SchedulerMode>()?,
            None if openai_api_key.is_some() => SchedulerMode::Agent,
            None => SchedulerMode::Direct,
        };

        Ok(Config {
            host,
            port,
            google_calendar_id,
            google_token_file,
            google_client_id,
            google_client_secret,
            timezone,
            scheduler_mode,
            openai_api_key,
            openai_model,
        })
    }

    /// Merge values from a TOML document over the current configuration
    pub fn apply_overrides(&mut self, content: &str) -> ServiceResult<()> {
        let overrides: FileOverrides = toml::from_str(content)?;

        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(calendar_id) = overrides.google_calendar_id {
            self.google_calendar_id = calendar_id;
        }
        if let Some(token_file) = overrides.google_token_file {
            self.google_token_file = token_file;
        }
        if let Some(timezone) = overrides.timezone {
            self.timezone = timezone;
        }
        if let Some(mode) = overrides.scheduler_mode {
            self.scheduler_mode = mode;
        }
        if let Some(model) = overrides.openai_model {
            self.openai_model = model;
        }

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> ServiceResult<()> {
        self.tz()?;

        if self.scheduler_mode == SchedulerMode::Agent && self.openai_api_key.is_none() {
            return Err(env_error("OPENAI_API_KEY"));
        }

        Ok(())
    }

    /// Parsed reference timezone
    pub fn tz(&self) -> ServiceResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }

    /// Address string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
