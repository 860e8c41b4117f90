//! Configuration inspection commands.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use relsync_config_and_utils::{Config, Paths};
use serde::Serialize;
use std::fmt;

/// Effective configuration with the CSRF token and cookie masked.
#[derive(Debug, Serialize)]
struct ConfigView<'a> {
    log_level: &'a str,
    origin: &'a str,
    likes_path: &'a str,
    follows_path: &'a str,
    edit_post_path: &'a str,
    csrf_token: Option<&'static str>,
    session_cookie: Option<&'static str>,
    request_timeout_secs: u64,
    rollback_on_failure: bool,
    max_retries: u32,
}

impl<'a> From<&'a Config> for ConfigView<'a> {
    fn from(config: &'a Config) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "********");
        Self {
            log_level: &config.log_level,
            origin: &config.origin,
            likes_path: &config.likes_path,
            follows_path: &config.follows_path,
            edit_post_path: &config.edit_post_path,
            csrf_token: mask(&config.csrf_token),
            session_cookie: mask(&config.session_cookie),
            request_timeout_secs: config.request_timeout_secs,
            rollback_on_failure: config.rollback_on_failure,
            max_retries: config.max_retries,
        }
    }
}

impl fmt::Display for ConfigView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", output::row("Origin", self.origin))?;
        writeln!(f, "{}", output::row("Likes path", self.likes_path))?;
        writeln!(f, "{}", output::row("Follows path", self.follows_path))?;
        writeln!(f, "{}", output::row("Edit path", self.edit_post_path))?;
        writeln!(
            f,
            "{}",
            output::row("CSRF token", self.csrf_token.unwrap_or("(not set)"))
        )?;
        writeln!(
            f,
            "{}",
            output::row("Session cookie", self.session_cookie.unwrap_or("(not set)"))
        )?;
        writeln!(
            f,
            "{}",
            output::row("Timeout", format!("{}s", self.request_timeout_secs))
        )?;
        writeln!(f, "{}", output::row("Rollback", self.rollback_on_failure))?;
        writeln!(f, "{}", output::row("Retries", self.max_retries))?;
        write!(f, "{}", output::row("Log level", self.log_level))
    }
}

/// Show the effective configuration.
pub fn config_show(config: &Config, format: OutputFormat) -> Result<()> {
    output::print(&ConfigView::from(config), &format);
    Ok(())
}

/// Print the config file location.
pub fn config_path(paths: &Paths, format: OutputFormat) -> Result<()> {
    let path = paths.config_file();
    match format {
        OutputFormat::Text => println!("{}", path.display()),
        OutputFormat::Json => println!("{}", serde_json::json!({ "path": path })),
    }
    Ok(())
}
