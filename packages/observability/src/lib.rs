//! # Observability
//!
//! Structured logging shared by relsync binaries.
//!
//! Binaries call `observability::init_with_config()` once at startup and use
//! the standard `tracing` macros everywhere else. Library crates never
//! install a subscriber.
//!
//! ## Dev Mode
//!
//! With the `dev` feature (on by default) every process appends JSONL to a
//! single file, `~/.relsync/logs/dev.jsonl` unless overridden:
//!
//! - `tail -f ~/.relsync/logs/dev.jsonl | jq` for pretty JSON
//! - `lnav ~/.relsync/logs/dev.jsonl` for interactive exploration
//!
//! Each line is flushed on write, so several processes can share the file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() -> std::io::Result<()> {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "relsync".into(),
//!         default_level: "debug".into(),
//!         also_stderr: true,
//!         ..Default::default()
//!     })?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

#[cfg(feature = "dev")]
mod dev;

mod json_layer;

use std::io;
use std::path::PathBuf;

pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, included in every log line.
    pub service_name: String,

    /// Default level filter (e.g. "debug", "info", "warn").
    /// `RUST_LOG` takes precedence when set.
    pub default_level: String,

    /// Log file path. Defaults to `~/.relsync/logs/dev.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit compact logs to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize logging with custom configuration.
///
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init_with_config(config: LogConfig) -> io::Result<()> {
    #[cfg(feature = "dev")]
    {
        dev::init_dev_subscriber(&config)
    }

    #[cfg(not(feature = "dev"))]
    {
        use tracing_subscriber::util::SubscriberInitExt;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.default_level)),
            )
            .with_target(true)
            .with_writer(io::stderr)
            .compact()
            .finish()
            .try_init()
            .map_err(io::Error::other)
    }
}
