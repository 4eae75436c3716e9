use shared::DemoVariant;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("DEMO_VARIANT must be `ai-vision` or `space-station`, got {0:?}")]
    UnknownVariant(String),
    #[error("MODEL_SERVICE_URL {value:?} is not a valid URL: {source}")]
    InvalidModelUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("MODEL_SERVICE_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub variant: DemoVariant,
    pub model_service_url: Option<Url>,
    pub model_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };

        let variant = match get("DEMO_VARIANT") {
            Some(raw) => DemoVariant::from_str(&raw).map_err(|_| ConfigError::UnknownVariant(raw))?,
            None => DemoVariant::default(),
        };

        let model_service_url = get("MODEL_SERVICE_URL")
            .map(|raw| Url::parse(&raw).map_err(|source| ConfigError::InvalidModelUrl { value: raw, source }))
            .transpose()?;

        let model_timeout = match get("MODEL_SERVICE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
        };

        let upload_dir = get("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()).into();

        let frontend_dir = get("FRONTEND_DIR")
            .or_else(|| get("CARGO_MANIFEST_DIR").map(|dir| format!("{}/../frontend/dist", dir)))
            .unwrap_or_else(|| "/usr/src/app/frontend/dist".to_string())
            .into();

        Ok(Self {
            port,
            upload_dir,
            frontend_dir,
            variant,
            model_service_url,
            model_timeout,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
