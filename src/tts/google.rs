//! Google Cloud Text-to-Speech adapter (REST `text:synthesize`).

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::SynthesisProvider;
use super::types::AudioOutput;
use crate::config::ProviderSettings;
use crate::{Error, ErrorContext, Result};

pub const GOOGLE_BASE_URL: &str = "https://texttospeech.googleapis.com";

const NAME: &str = "google";
const SYNTHESIZE_PATH: &str = "/v1/text:synthesize";

/// Google Cloud Text-to-Speech, authenticated with an API key.
pub struct GoogleProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    audio_content: String,
}

impl GoogleProvider {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: GOOGLE_BASE_URL.to_string(),
        }
    }

    /// Build from startup settings; the API key is required.
    pub fn from_settings(http: reqwest::Client, settings: &ProviderSettings) -> Result<Self> {
        let api_key = settings
            .google_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::setup_with_context(
                    "missing Google API key",
                    ErrorContext::new()
                        .with_field("GOOGLE_TTS_API_KEY")
                        .with_source(NAME),
                )
            })?;
        let mut provider = Self::new(http, api_key);
        if let Some(endpoint) = settings.google_endpoint.as_deref().filter(|e| !e.is_empty()) {
            provider = provider.with_base_url(endpoint);
        }
        Ok(provider)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SYNTHESIZE_PATH)
    }

    fn request_body<'a>(voice: &'a str, language: &'a str, text: &'a str) -> SynthesizeSpeechRequest<'a> {
        SynthesizeSpeechRequest {
            input: SynthesisInput { text },
            voice: VoiceSelectionParams {
                language_code: language,
                name: voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "OGG_OPUS",
            },
        }
    }
}

#[async_trait]
impl SynthesisProvider for GoogleProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate_audio(&self, voice: &str, language: &str, text: &str) -> Result<AudioOutput> {
        let endpoint = self.endpoint();
        debug!(provider = NAME, voice, language, chars = text.len(), "requesting synthesis");

        let response = self
            .http
            .post(&endpoint)
            .header("X-Goog-Api-Key", &self.api_key)
            .json(&Self::request_body(voice, language, text))
            .send()
            .await
            .map_err(|e| Error::provider(NAME, format!("request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::provider(NAME, format!("reading response failed: {}", e)))?;
        if !status.is_success() {
            return Err(Error::provider_status(
                NAME,
                status.as_u16(),
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        let body: SynthesizeSpeechResponse = serde_json::from_slice(&bytes)
            .map_err(|e| Error::provider(NAME, format!("malformed response: {}", e)))?;
        let audio = base64::engine::general_purpose::STANDARD
            .decode(body.audio_content.as_bytes())
            .map_err(|e| Error::provider(NAME, format!("malformed audio content: {}", e)))?;

        Ok(AudioOutput::ogg_opus(audio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GoogleProvider::request_body(
            "en-US-Wavenet-D",
            "en-US",
            "hello",
        ))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "input": { "text": "hello" },
                "voice": { "languageCode": "en-US", "name": "en-US-Wavenet-D" },
                "audioConfig": { "audioEncoding": "OGG_OPUS" }
            })
        );
    }

    #[test]
    fn test_endpoint_override() {
        let settings = ProviderSettings {
            google_api_key: Some("k".into()),
            google_endpoint: Some("http://127.0.0.1:9999/".into()),
            ..Default::default()
        };
        let provider = GoogleProvider::from_settings(reqwest::Client::new(), &settings).unwrap();
        assert_eq!(provider.endpoint(), "http://127.0.0.1:9999/v1/text:synthesize");
    }

    #[test]
    fn test_empty_key_is_missing() {
        let settings = ProviderSettings {
            google_api_key: Some(String::new()),
            ..Default::default()
        };
        let err = GoogleProvider::from_settings(reqwest::Client::new(), &settings).unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field.as_deref()),
            Some("GOOGLE_TTS_API_KEY")
        );
    }
}
