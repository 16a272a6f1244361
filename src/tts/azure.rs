//! Azure Cognitive Services Speech adapter (SSML over HTTPS).

use async_trait::async_trait;
use quick_xml::escape::escape;
use tracing::debug;

use super::provider::SynthesisProvider;
use super::types::AudioOutput;
use crate::config::ProviderSettings;
use crate::{Error, ErrorContext, Result};

const NAME: &str = "azure";
const OUTPUT_FORMAT: &str = "ogg-48khz-16bit-mono-opus";
const USER_AGENT: &str = concat!("webtts/", env!("CARGO_PKG_VERSION"));

/// Azure text-to-speech, authenticated with a speech resource key.
pub struct AzureProvider {
    http: reqwest::Client,
    resource_key: String,
    region: String,
    endpoint: Option<String>,
}

impl std::fmt::Debug for AzureProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureProvider")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl AzureProvider {
    pub fn new(http: reqwest::Client, resource_key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            http,
            resource_key: resource_key.into(),
            region: region.into(),
            endpoint: None,
        }
    }

    /// Build from startup settings; resource key and region are both required.
    pub fn from_settings(http: reqwest::Client, settings: &ProviderSettings) -> Result<Self> {
        let key = settings.azure_resource_key.as_deref().filter(|v| !v.is_empty());
        let region = settings.azure_region.as_deref().filter(|v| !v.is_empty());
        let (Some(key), Some(region)) = (key, region) else {
            return Err(Error::setup_with_context(
                "missing Azure speech credentials",
                ErrorContext::new()
                    .with_field("AZURE_SPEECH_RESOURCE_KEY, AZURE_SPEECH_REGION")
                    .with_source(NAME),
            ));
        };
        let mut provider = Self::new(http, key, region);
        if let Some(endpoint) = settings.azure_endpoint.as_deref().filter(|e| !e.is_empty()) {
            provider = provider.with_endpoint(endpoint);
        }
        Ok(provider)
    }

    /// Send requests to `url` instead of the regional endpoint.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    pub fn api_url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.clone(),
            None => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            ),
        }
    }

    /// SSML document for a single voice.
    pub fn ssml(voice: &str, language: &str, text: &str) -> String {
        format!(
            r#"<speak version="1.0" xml:lang="{}"><voice name="{}">{}</voice></speak>"#,
            escape(language),
            escape(voice),
            escape(text),
        )
    }
}

#[async_trait]
impl SynthesisProvider for AzureProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate_audio(&self, voice: &str, language: &str, text: &str) -> Result<AudioOutput> {
        let url = self.api_url();
        debug!(provider = NAME, voice, language, chars = text.len(), "requesting synthesis");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/ssml+xml")
            .header("Ocp-Apim-Subscription-Key", &self.resource_key)
            .header("User-Agent", USER_AGENT)
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(Self::ssml(voice, language, text))
            .send()
            .await
            .map_err(|e| Error::provider(NAME, format!("request failed: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider_status(
                NAME,
                status.as_u16(),
                format!("unexpected status code: {}", body),
            ));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::provider(NAME, format!("reading audio data failed: {}", e)))?;
        Ok(AudioOutput::ogg_opus(audio))
    }
}
