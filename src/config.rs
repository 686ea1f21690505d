//! Server configuration loaded from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Server-side answer window per question (None = no server timer)
    pub question_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            question_timeout: None,
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    /// HOST, PORT and QUESTION_TIMEOUT_SECS (0 disables the timer)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = parse_env("HOST").unwrap_or(defaults.host);
        let port = parse_env("PORT").unwrap_or(defaults.port);
        let question_timeout = parse_env::<u64>("QUESTION_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        tracing::info!(
            %host,
            port,
            question_timeout_secs = question_timeout.map(|d| d.as_secs()),
            "Server config loaded"
        );

        Self {
            host,
            port,
            question_timeout,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("QUESTION_TIMEOUT_SECS");
    }

    #[test]
    fn test_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert!(config.question_timeout.is_none());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        std::env::set_var("HOST", "127.0.0.1");
        std::env::set_var("PORT", "8080");
        std::env::set_var("QUESTION_TIMEOUT_SECS", "20");

        let config = ServerConfig::from_env();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.question_timeout, Some(Duration::from_secs(20)));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("QUESTION_TIMEOUT_SECS", "0");

        let config = ServerConfig::from_env();
        assert_eq!(config, ServerConfig::default());

        clear_env();
    }
}
