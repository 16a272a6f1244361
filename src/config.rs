//! Process-wide configuration.
//!
//! Every option is available as a command-line flag and as an environment
//! variable. Settings are parsed once at startup and never change afterwards.

use std::time::Duration;

use clap::{Args, Parser};

use crate::{Error, ErrorContext, Result};

/// Server settings.
#[derive(Parser, Clone)]
#[command(name = "webtts", version, about = "Signed-URL text-to-speech server")]
pub struct Settings {
    /// Port/IP to listen on (`:3000` listens on all interfaces)
    #[arg(long, env = "LISTEN", default_value = ":3000")]
    pub listen: String,

    /// Log level (trace, debug, info, warn, error, fatal) or a tracing filter directive
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Key to sign requests with
    #[arg(long, env = "SIGNATURE_KEY", hide_env_values = true)]
    pub signature_key: String,

    /// Provider used when a request does not name one
    #[arg(long, env = "DEFAULT_PROVIDER", default_value = "google")]
    pub default_provider: String,

    /// Upper bound for handling a single request, upstream call included
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[command(flatten)]
    pub providers: ProviderSettings,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("listen", &self.listen)
            .field("log_level", &self.log_level)
            .field("signature_key", &"<redacted>")
            .field("default_provider", &self.default_provider)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("providers", &self.providers)
            .finish()
    }
}

impl Settings {
    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.signature_key.is_empty() {
            return Err(Error::setup_with_context(
                "signature key must not be empty",
                ErrorContext::new().with_field("SIGNATURE_KEY"),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::setup_with_context(
                "request timeout must be positive",
                ErrorContext::new().with_field("REQUEST_TIMEOUT_SECS"),
            ));
        }
        Ok(())
    }

    /// Address to bind, with a bare `:port` expanded to all interfaces.
    pub fn bind_address(&self) -> String {
        normalize_listen(&self.listen)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn normalize_listen(listen: &str) -> String {
    let listen = listen.trim();
    if listen.starts_with(':') {
        format!("0.0.0.0{}", listen)
    } else {
        listen.to_string()
    }
}

/// Credentials and endpoint overrides for the network providers.
#[derive(Args, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// API key for Google Cloud Text-to-Speech
    #[arg(long, env = "GOOGLE_TTS_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Base URL override for Google Cloud Text-to-Speech
    #[arg(long, env = "GOOGLE_TTS_ENDPOINT", hide = true)]
    pub google_endpoint: Option<String>,

    /// Azure speech resource key
    #[arg(long, env = "AZURE_SPEECH_RESOURCE_KEY", hide_env_values = true)]
    pub azure_resource_key: Option<String>,

    /// Azure speech region (e.g. westeurope)
    #[arg(long, env = "AZURE_SPEECH_REGION")]
    pub azure_region: Option<String>,

    /// Full URL override for the Azure synthesis endpoint
    #[arg(long, env = "AZURE_SPEECH_ENDPOINT", hide = true)]
    pub azure_endpoint: Option<String>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn present(v: &Option<String>) -> &'static str {
            if v.as_deref().is_some_and(|s| !s.is_empty()) {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("ProviderSettings")
            .field("google_api_key", &present(&self.google_api_key))
            .field("google_endpoint", &self.google_endpoint)
            .field("azure_resource_key", &present(&self.azure_resource_key))
            .field("azure_region", &self.azure_region)
            .field("azure_endpoint", &self.azure_endpoint)
            .finish()
    }
}
