use std::fmt;

use thiserror::Error;

/// Where a rejected request or a failed startup check went wrong.
///
/// Rendered after the message as `(field: .., details: .., source: ..)`,
/// leaving out whatever is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Query parameter or setting name, e.g. `text` or `AZURE_SPEECH_REGION`
    pub field: Option<String>,
    /// The offending value or the accepted alternatives
    pub details: Option<String>,
    /// Raising component: `handler`, `registry`, a provider name
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("field", &self.field),
            ("details", &self.details),
            ("source", &self.source),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect();
        if parts.is_empty() {
            Ok(())
        } else {
            write!(f, " ({})", parts.join(", "))
        }
    }
}

/// Unified error type for webtts.
///
/// Variants fall into two classes: caller mistakes (bad input, expired or
/// forged URLs, unknown providers) and server-side failures (upstream errors,
/// misconfiguration). See [`ErrorKind`] for the HTTP mapping.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Bad input: {message}{context}")]
    BadInput {
        message: String,
        context: ErrorContext,
    },

    #[error("Validity expired or not parseable")]
    Expired,

    #[error("Signature mismatch")]
    SignatureMismatch,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider error ({provider}){}: {message}", format_status(.status))]
    Provider {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Setup error: {message}{context}")]
    Setup {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" HTTP {}", code),
        None => String::new(),
    }
}

/// Coarse classification of an [`Error`], used to pick the HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadInput,
    Expired,
    SignatureMismatch,
    UnknownProvider,
    Provider,
    Setup,
}

impl ErrorKind {
    /// HTTP status the handler answers with.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadInput | Self::Expired | Self::SignatureMismatch | Self::UnknownProvider
        )
    }

    /// Body text sent to the caller. Never includes upstream detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::BadInput => "no text given",
            Self::Expired => "invalid or expired validity",
            Self::SignatureMismatch => "validation failed",
            Self::UnknownProvider => "invalid provider",
            Self::Provider | Self::Setup => "unable to synthesize speech",
        }
    }
}

impl Error {
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self::bad_input_with_context(msg, ErrorContext::new())
    }

    pub fn bad_input_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::BadInput {
            message: msg.into(),
            context,
        }
    }

    pub fn setup(msg: impl Into<String>) -> Self {
        Self::setup_with_context(msg, ErrorContext::new())
    }

    pub fn setup_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Setup {
            message: msg.into(),
            context,
        }
    }

    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            status: None,
            message: msg.into(),
        }
    }

    pub fn provider_status(provider: impl Into<String>, status: u16, msg: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            status: Some(status),
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadInput { .. } => ErrorKind::BadInput,
            Error::Expired => ErrorKind::Expired,
            Error::SignatureMismatch => ErrorKind::SignatureMismatch,
            Error::UnknownProvider(_) => ErrorKind::UnknownProvider,
            Error::Provider { .. } => ErrorKind::Provider,
            Error::Setup { .. } | Error::Io(_) => ErrorKind::Setup,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::BadInput { context, .. } | Error::Setup { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        for err in [
            Error::bad_input("no text"),
            Error::Expired,
            Error::SignatureMismatch,
            Error::UnknownProvider("bogus".into()),
        ] {
            assert_eq!(err.kind().status_code(), 400, "{}", err);
        }
    }

    #[test]
    fn test_server_errors_hide_upstream_detail() {
        let err = Error::provider_status("azure", 401, "Access denied due to invalid subscription key");
        assert_eq!(err.kind().status_code(), 500);
        assert_eq!(err.kind().public_message(), "unable to synthesize speech");
        assert!(err.to_string().contains("HTTP 401"));
        assert!(err.to_string().contains("invalid subscription key"));
    }

    #[test]
    fn test_context_formatting() {
        let err = Error::setup_with_context(
            "missing credentials",
            ErrorContext::new()
                .with_field("AZURE_SPEECH_REGION")
                .with_source("azure"),
        );
        assert_eq!(
            err.to_string(),
            "Setup error: missing credentials (field: AZURE_SPEECH_REGION, source: azure)"
        );
        assert_eq!(err.context().and_then(|c| c.source.as_deref()), Some("azure"));
    }

    #[test]
    fn test_empty_context_renders_nothing() {
        assert_eq!(ErrorContext::new().to_string(), "");
        assert_eq!(Error::setup("no listener").to_string(), "Setup error: no listener");
    }

    #[test]
    fn test_io_errors_are_server_side() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"));
        assert_eq!(err.kind(), ErrorKind::Setup);
        assert_eq!(err.kind().status_code(), 500);
    }
}
