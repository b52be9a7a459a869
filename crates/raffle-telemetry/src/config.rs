//! Telemetry configuration from environment variables.

use crate::TelemetryError;
use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Network the node runs against (hardhat, localhost, goerli)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "raffle-node".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            network: "hardhat".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RAFFLE_SERVICE_NAME`: Service name (default: raffle-node)
    /// - `RAFFLE_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `RAFFLE_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `RAFFLE_NETWORK`: Network name (default: hardhat)
    pub fn from_env() -> Result<Self, TelemetryError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TelemetryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        let json_logs = match lookup("RAFFLE_JSON_LOGS") {
            Some(value) => parse_flag(&value).ok_or_else(|| {
                TelemetryError::Config(format!("RAFFLE_JSON_LOGS must be true/false/1/0, got {value:?}"))
            })?,
            None => is_container,
        };

        Ok(Self {
            service_name: lookup("RAFFLE_SERVICE_NAME").unwrap_or_else(|| "raffle-node".to_string()),
            log_level: lookup("RAFFLE_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            json_logs,
            network: lookup("RAFFLE_NETWORK").unwrap_or_else(|| "hardhat".to_string()),
        })
    }

    /// Service name qualified by network, e.g. `raffle-node-goerli`.
    pub fn full_service_name(&self) -> String {
        format!("{}-{}", self.service_name, self.network)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "raffle-node");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_full_service_name() {
        let mut config = TelemetryConfig::default();
        assert_eq!(config.full_service_name(), "raffle-node-hardhat");

        config.network = "goerli".to_string();
        assert_eq!(config.full_service_name(), "raffle-node-goerli");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = TelemetryConfig::from_lookup(|var| match var {
            "RUST_LOG" => Some("debug".to_string()),
            "RAFFLE_JSON_LOGS" => Some("1".to_string()),
            "RAFFLE_NETWORK" => Some("goerli".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert_eq!(config.full_service_name(), "raffle-node-goerli");
    }

    #[test]
    fn test_json_logs_default_to_container_detection() {
        let config = TelemetryConfig::from_lookup(|var| {
            (var == "DOCKER_CONTAINER").then(|| "1".to_string())
        })
        .unwrap();
        assert!(config.json_logs);
    }

    #[test]
    fn test_malformed_json_flag_is_rejected() {
        let result = TelemetryConfig::from_lookup(|var| {
            (var == "RAFFLE_JSON_LOGS").then(|| "yes".to_string())
        });
        assert!(matches!(result, Err(TelemetryError::Config(msg)) if msg.contains("yes")));
    }
}
