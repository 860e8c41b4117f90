//! Logging initialization.
//!
//! Every relsync process writes structured JSONL to the central log file
//! (`~/.relsync/logs/dev.jsonl`) through the observability crate.

use crate::{CoreResult, Paths};

/// Initialize logging for the `relsync` service.
///
/// `level` is the default filter; `RUST_LOG` overrides it. With
/// `also_stderr`, a compact copy goes to stderr as well.
///
/// ```ignore
/// init_logging(&Paths::new()?, "info", false)?;
/// tracing::info!("relsync started");
/// ```
pub fn init_logging(paths: &Paths, level: &str, also_stderr: bool) -> CoreResult<()> {
    observability::init_with_config(observability::LogConfig {
        service_name: "relsync".into(),
        default_level: parse_level(level).as_str().to_ascii_lowercase(),
        log_path: Some(paths.log_file()),
        also_stderr,
    })?;
    Ok(())
}

/// Parse a log level string into a tracing Level. Unknown values fall back
/// to INFO.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_all_variants() {
        assert_eq!(parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(parse_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_level("info"), tracing::Level::INFO);
        assert_eq!(parse_level("warning"), tracing::Level::WARN);
        assert_eq!(parse_level("error"), tracing::Level::ERROR);
    }

    #[test]
    fn parse_level_ignores_case_and_whitespace() {
        assert_eq!(parse_level(" DEBUG "), tracing::Level::DEBUG);
        assert_eq!(parse_level("Warn"), tracing::Level::WARN);
    }

    #[test]
    fn parse_level_unknown_defaults_to_info() {
        assert_eq!(parse_level(""), tracing::Level::INFO);
        assert_eq!(parse_level("verbose"), tracing::Level::INFO);
    }
}
