//! # webtts
//!
//! A small HTTP front-end that turns signed URLs into speech.
//!
//! ## Overview
//!
//! Clients receive URLs of the form
//! `/tts.ogg?text=…&lang=…&voice=…&provider=…&valid-to=…&signature=…` from a
//! party holding the shared signing key. The server checks the expiry and the
//! HMAC signature, forwards the text to the selected cloud TTS backend and
//! returns Ogg/Opus audio with long-lived caching headers, so a CDN or the
//! browser cache can absorb repeated requests.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`signing`] | Canonical message, HMAC-SHA256 signatures, expiry check |
//! | [`tts`] | `SynthesisProvider` capability, provider registry, Google/Azure/stub adapters |
//! | [`server`] | Axum router, `/tts.ogg` handler, server bootstrap |
//! | [`config`] | Command-line / environment settings |
//! | [`telemetry`] | Logging setup |
//!
//! ## Signing a URL
//!
//! ```rust
//! use webtts::signing::{QueryParams, SignatureVerifier};
//!
//! let verifier = SignatureVerifier::new("s3cr3t")?;
//! let params = QueryParams::from_pairs([
//!     ("text", "hello"),
//!     ("lang", "en-US"),
//!     ("valid-to", "2030-01-01T00:00:00Z"),
//! ]);
//! let url = format!("https://tts.example.com/tts.ogg?{}", verifier.signed_query(&params));
//! assert!(url.contains("&signature="));
//! # Ok::<(), webtts::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod signing;
pub mod telemetry;
pub mod tts;

pub use config::{ProviderSettings, Settings};
pub use error::{Error, ErrorContext, ErrorKind};
pub use server::AppState;
pub use signing::{QueryParams, SignatureVerifier};
pub use tts::{AudioOutput, ProviderRegistry, SynthesisProvider};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
