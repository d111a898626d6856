//! Environment-sourced settings for the agent binary

use outpost::TransportConfig;
use std::env;
use std::time::Duration;
use tracing::warn;

/// Default interval between poll cycles
pub const DEFAULT_PULL_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime settings for the agent binary
#[derive(Debug, Clone)]
pub struct Settings {
    /// Shared secret used to authenticate against the coordinator
    pub secret: String,
    /// Coordinator address
    pub server: String,
    /// Coordinator port
    pub port: u16,
    /// Per-request transport timeout
    pub request_timeout: Duration,
    /// Interval between poll cycles
    pub pull_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            secret: transport.secret,
            server: transport.server,
            port: transport.port,
            request_timeout: transport.request_timeout,
            pull_interval: DEFAULT_PULL_INTERVAL,
        }
    }
}

impl Settings {
    /// Load settings from `OUTPOST_*` environment variables
    ///
    /// Unset variables fall back to the stock defaults; an unparseable port
    /// falls back with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = env::var("OUTPOST_SECRET").unwrap_or(defaults.secret);
        let server = env::var("OUTPOST_SERVER").unwrap_or(defaults.server);
        let port = match env::var("OUTPOST_PORT") {
            Ok(raw) => parse_port(&raw, defaults.port),
            Err(_) => defaults.port,
        };

        Self {
            secret,
            server,
            port,
            request_timeout: defaults.request_timeout,
            pull_interval: defaults.pull_interval,
        }
    }

    /// Transport construction parameters for these settings
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            secret: self.secret.clone(),
            server: self.server.clone(),
            port: self.port,
            request_timeout: self.request_timeout,
        }
    }
}

fn parse_port(raw: &str, default: u16) -> u16 {
    raw.parse().unwrap_or_else(|_| {
        warn!("invalid OUTPOST_PORT value \"{}\", using default {}", raw, default);
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.secret, "unsecure");
        assert_eq!(settings.server, "127.0.0.1");
        assert_eq!(settings.port, 41234);
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.pull_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_transport_config_mapping() {
        let settings = Settings {
            secret: "hunter2".to_string(),
            server: "coordinator.example.com".to_string(),
            port: 9000,
            ..Default::default()
        };

        let config = settings.transport_config();
        assert_eq!(config.secret, "hunter2");
        assert_eq!(config.server, "coordinator.example.com");
        assert_eq!(config.port, 9000);
        assert_eq!(config.request_timeout, settings.request_timeout);
    }

    #[test]
    fn test_port_parse_fallback() {
        assert_eq!(parse_port("9000", 41234), 9000);
        assert_eq!(parse_port("not-a-port", 41234), 41234);
        assert_eq!(parse_port("70000", 41234), 41234);
    }
}
