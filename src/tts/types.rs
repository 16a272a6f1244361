//! TTS request and audio types.

use bytes::Bytes;

/// Language used when the request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Voice used when the request does not name one.
pub const DEFAULT_VOICE: &str = "en-US-Wavenet-D";

/// Audio output from a provider.
#[derive(Debug, Clone)]
pub struct AudioOutput {
    pub data: Bytes,
    pub format: AudioFormat,
}

impl AudioOutput {
    pub fn ogg_opus(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            format: AudioFormat::OggOpus,
        }
    }
}

/// Supported audio formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    OggOpus,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::OggOpus => "audio/ogg",
        }
    }
}

/// One synthesis call: what to say, in which language and voice, via which backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub language: String,
    pub voice: String,
    pub provider: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            provider: provider.into(),
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }
}
