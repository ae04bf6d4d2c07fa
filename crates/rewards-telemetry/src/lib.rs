//! # Rewards Telemetry
//!
//! Logging and metrics shared by every rewards subsystem.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rewards_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RW_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `RW_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `RW_SERVICE_NAME` | `merkle-rewards` | Service name attached to the startup log |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to encode metrics: {0}")]
    MetricsEncode(String),
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
