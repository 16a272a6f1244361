//! Logging setup.
//!
//! The binary installs one `tracing` fmt subscriber at startup. The level comes
//! from `--log-level`; `RUST_LOG`, when set, takes precedence.

use tracing_subscriber::EnvFilter;

use crate::{Error, ErrorContext, Result};

/// Translate a `--log-level` value into an `EnvFilter` directive.
///
/// Plain level names are accepted in the spelling operators already use
/// (`warning`, `fatal`, `panic`); anything else is passed through as a filter
/// directive such as `webtts=debug,tower_http=info`.
pub fn log_directive(level: &str) -> Result<String> {
    let level = level.trim();
    let directive = match level.to_lowercase().as_str() {
        "trace" => "trace".to_string(),
        "debug" => "debug".to_string(),
        "info" => "info".to_string(),
        "warn" | "warning" => "warn".to_string(),
        "error" | "fatal" | "panic" => "error".to_string(),
        "off" => "off".to_string(),
        _ => level.to_string(),
    };
    EnvFilter::try_new(&directive).map_err(|e| {
        Error::setup_with_context(
            format!("invalid log level: {}", e),
            ErrorContext::new()
                .with_field("LOG_LEVEL")
                .with_details(level),
        )
    })?;
    Ok(directive)
}

/// Install the global subscriber.
pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_directive(level)?)
            .map_err(|e| Error::setup(format!("invalid log filter: {}", e)))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::setup(format!("installing log subscriber failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_aliases() {
        assert_eq!(log_directive("INFO").unwrap(), "info");
        assert_eq!(log_directive("warning").unwrap(), "warn");
        assert_eq!(log_directive("fatal").unwrap(), "error");
    }

    #[test]
    fn test_directives_pass_through() {
        assert_eq!(
            log_directive("webtts=debug,tower_http=info").unwrap(),
            "webtts=debug,tower_http=info"
        );
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(log_directive("webtts=loudest"), Err(Error::Setup { .. })));
    }
}
