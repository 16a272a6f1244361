//! TTS providers: the [`SynthesisProvider`] capability, the registry that
//! resolves provider names, and one adapter per backend.

pub mod azure;
pub mod google;
mod provider;
mod registry;
mod stub;
mod types;

pub use azure::AzureProvider;
pub use google::GoogleProvider;
pub use provider::SynthesisProvider;
pub use registry::{ProviderContext, ProviderRegistry};
pub use stub::StubProvider;
pub use types::{AudioFormat, AudioOutput, SynthesisRequest, DEFAULT_LANGUAGE, DEFAULT_VOICE};
