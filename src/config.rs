use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the generation service, `/generate` is appended per call
    pub base_url: String,
    pub upstream_timeout: Duration,
    pub connect_timeout: Duration,
    pub bind_addr: SocketAddr,
    /// Request log file, nothing is written when unset
    pub log_path: Option<String>
}

impl Config {

    pub fn new(base_url: impl Into<String>) -> Self {

        Config {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            bind_addr: DEFAULT_BIND_ADDR,
            log_path: None
        }

    }

    pub fn from_env() -> Result<Self, ConfigError> {

        Self::from_lookup(|key| std::env::var(key).ok())

    }

    // split out from from_env so tests don't have to touch the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>
    {

        let base_url = lookup("GENERATE_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("GENERATE_BASE_URL"))?;

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid { key: "GENERATE_BASE_URL", value: base_url });
        }

        let upstream_timeout = parse_secs(&lookup, "UPSTREAM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let connect_timeout = parse_secs(&lookup, "UPSTREAM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;

        let bind_addr = match lookup("BIND_ADDR") {
            None => DEFAULT_BIND_ADDR,
            Some(raw) => raw.parse()
                .map_err(|_| ConfigError::Invalid { key: "BIND_ADDR", value: raw })?
        };

        let log_path = lookup("LOG_PATH")
            .filter(|path| !path.is_empty());

        Ok(Config {
            upstream_timeout,
            connect_timeout,
            bind_addr,
            log_path,
            ..Config::new(base_url)
        })

    }

    pub fn generate_url(&self) -> String {

        format!("{}/generate", self.base_url)

    }

}

fn parse_secs<F>(lookup: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>
{

    match lookup(key) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::Invalid { key, value: raw })
        }
    }

}
