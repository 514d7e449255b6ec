//! Gateway configuration with validation.
//!
//! Loaded from environment variables. Missing optional values fall back to
//! defaults; missing required values are reported by [`GatewayConfig::validate`]
//! and make every request fail closed instead of stopping the process.

use crate::domain::dispatch::DispatchMode;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Default trigger command.
pub const DEFAULT_TRIGGER_COMMAND: &str = "start";

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PUBLIC_KEY is not set")]
    MissingPublicKey,

    #[error("PUBLIC_KEY must be 64 hex characters: {0}")]
    InvalidPublicKey(String),

    #[error("WORKER_TARGET is required in forward mode")]
    MissingWorkerTarget,

    #[error("TRIGGER_COMMAND cannot be empty")]
    EmptyTriggerCommand,

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

/// Pipeline variant selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayMode {
    /// Verify, classify and forward the trigger command.
    #[default]
    Forward,
    /// Verify and acknowledge only. Nothing is forwarded.
    VerifyOnly,
}

impl GatewayMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward" => Some(Self::Forward),
            "verify-only" | "verify_only" | "verify" => Some(Self::VerifyOnly),
            _ => None,
        }
    }
}

/// Main gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Hex-encoded Ed25519 verifying key
    pub public_key: Option<String>,
    /// Worker endpoint URL
    pub worker_target: Option<String>,
    /// The single command that is forwarded
    pub trigger_command: String,
    /// Pipeline variant
    pub mode: GatewayMode,
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Worker submission configuration
    pub worker: WorkerConfig,
    /// Emit per-request diagnostic logs
    pub verbose: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            public_key: None,
            worker_target: None,
            trigger_command: DEFAULT_TRIGGER_COMMAND.to_string(),
            mode: GatewayMode::default(),
            http: HttpConfig::default(),
            worker: WorkerConfig::default(),
            verbose: false,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Listen address (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,
    /// Maximum accepted request body
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8080),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Worker submission configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Transport timeout for one submission attempt
    pub timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PUBLIC_KEY` (or `DISCORD_PUBLIC_KEY`): verifying key
    /// - `WORKER_TARGET` (or `WORKER_LAMBDA_ARN`): worker endpoint
    /// - `TRIGGER_COMMAND`: forwarded command (default: start)
    /// - `GATEWAY_MODE`: forward | verify-only (default: forward)
    /// - `GATEWAY_BIND_ADDR`: listen address (default: 0.0.0.0:8080)
    /// - `GATEWAY_MAX_BODY_BYTES`: body limit (default: 65536)
    /// - `WORKER_TIMEOUT_MS`: submission timeout (default: 2000)
    /// - `GATEWAY_VERBOSE`: diagnostic logging (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            public_key: non_empty("PUBLIC_KEY").or_else(|| non_empty("DISCORD_PUBLIC_KEY")),
            worker_target: non_empty("WORKER_TARGET").or_else(|| non_empty("WORKER_LAMBDA_ARN")),
            trigger_command: non_empty("TRIGGER_COMMAND").unwrap_or(defaults.trigger_command),
            mode: non_empty("GATEWAY_MODE")
                .and_then(|v| GatewayMode::parse(&v))
                .unwrap_or(defaults.mode),
            http: HttpConfig {
                bind_addr: non_empty("GATEWAY_BIND_ADDR")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.http.bind_addr),
                max_body_bytes: non_empty("GATEWAY_MAX_BODY_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.http.max_body_bytes),
            },
            worker: WorkerConfig {
                timeout: non_empty("WORKER_TIMEOUT_MS")
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.worker.timeout),
            },
            verbose: non_empty("GATEWAY_VERBOSE")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.verbose),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self
            .public_key
            .as_deref()
            .ok_or(ConfigError::MissingPublicKey)?;
        if key.len() != 64 || !key.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidPublicKey(format!(
                "got {} characters",
                key.len()
            )));
        }

        if self.mode == GatewayMode::Forward {
            if self.worker_target.is_none() {
                return Err(ConfigError::MissingWorkerTarget);
            }
            if self.trigger_command.trim().is_empty() {
                return Err(ConfigError::EmptyTriggerCommand);
            }
        }

        if self.http.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_bytes cannot be 0".into(),
            ));
        }

        if self.worker.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "worker timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Dispatch mode derived from the configured pipeline variant
    pub fn dispatch_mode(&self) -> DispatchMode {
        match self.mode {
            GatewayMode::Forward => DispatchMode::Forward {
                trigger: self.trigger_command.clone(),
            },
            GatewayMode::VerifyOnly => DispatchMode::VerifyOnly,
        }
    }
}
