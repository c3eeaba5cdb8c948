use std::env;
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;

const HOST_VAR: &str = "SCHOLAR_RSS_HOST";
const PORT_VAR: &str = "SCHOLAR_RSS_PORT";
const FETCH_TIMEOUT_VAR: &str = "SCHOLAR_RSS_FETCH_TIMEOUT_SECS";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{variable} must be a number: {source}")]
    InvalidNumber {
        variable: &'static str,
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub fetch_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(HOST_VAR).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = optional_number(PORT_VAR, DEFAULT_PORT)?;
        let timeout_secs = optional_number(FETCH_TIMEOUT_VAR, DEFAULT_FETCH_TIMEOUT_SECS)?;

        Ok(Self {
            host,
            port,
            fetch_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_number<T>(variable: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    match env::var(variable) {
        Ok(value) => value
            .parse()
            .map_err(|source| ConfigError::InvalidNumber { variable, source }),
        Err(_) => Ok(default),
    }
}
