use async_trait::async_trait;

use super::types::AudioOutput;
use crate::Result;

/// A text-to-speech backend.
///
/// Implementations own whatever credentials and endpoints they need; they are
/// built once per resolution by the [`ProviderRegistry`](super::ProviderRegistry)
/// and shared behind an `Arc`.
///
/// Failures of the upstream service are reported as
/// [`Error::Provider`](crate::Error::Provider) and are never retried here.
#[async_trait]
pub trait SynthesisProvider: Send + Sync + std::fmt::Debug {
    /// Canonical provider name (e.g. `"google"`).
    fn name(&self) -> &str;

    /// Synthesize `text` spoken by `voice` in `language` as Ogg/Opus audio.
    async fn generate_audio(&self, voice: &str, language: &str, text: &str) -> Result<AudioOutput>;
}
