//! Deterministic offline provider for tests and local development.

use async_trait::async_trait;

use super::provider::SynthesisProvider;
use super::types::AudioOutput;
use crate::{Error, Result};

/// Capture pattern that opens every Ogg page.
const OGG_CAPTURE: &[u8] = b"OggS";

/// Returns `OggS` followed by `voice|language|text`. No network access.
#[derive(Debug, Clone)]
pub struct StubProvider {
    name: String,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::named("stub")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The exact bytes [`generate_audio`](SynthesisProvider::generate_audio) returns.
    pub fn render(voice: &str, language: &str, text: &str) -> Vec<u8> {
        let mut data = OGG_CAPTURE.to_vec();
        data.extend_from_slice(format!("{}|{}|{}", voice, language, text).as_bytes());
        data
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SynthesisProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_audio(&self, voice: &str, language: &str, text: &str) -> Result<AudioOutput> {
        if text.is_empty() {
            return Err(Error::provider(&self.name, "empty text"));
        }
        Ok(AudioOutput::ogg_opus(Self::render(voice, language, text)))
    }
}
