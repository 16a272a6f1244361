//! `/tts.ogg` request handling.
//!
//! Steps run cheapest first and stop at the first failure:
//! text present → validity not expired → signature matches → provider known →
//! synthesis succeeds.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::AppState;
use crate::error::ErrorKind;
use crate::signing::{check_expiry, QueryParams, SIGNATURE_PARAM, VALID_TO_PARAM};
use crate::tts::{AudioOutput, SynthesisRequest, DEFAULT_LANGUAGE, DEFAULT_VOICE};
use crate::{Error, ErrorContext, Result};

const CACHE_CONTROL: &str = "public, max-age=86400, immutable";

/// Axum handler for `GET /tts.ogg`.
pub async fn tts(State(state): State<Arc<AppState>>, RawQuery(query): RawQuery) -> Response {
    let params = QueryParams::parse(query.as_deref().unwrap_or_default());
    match handle(&state, &params, Utc::now()).await {
        Ok(audio) => audio_response(audio),
        Err(err) => error_response(err),
    }
}

/// Run the full request pipeline against `params` as of `now`.
pub async fn handle(state: &AppState, params: &QueryParams, now: DateTime<Utc>) -> Result<AudioOutput> {
    let request = parse_request(params, &state.default_provider)?;

    check_expiry(params.get(VALID_TO_PARAM), now)?;

    state
        .verifier
        .verify(params, params.get(SIGNATURE_PARAM).unwrap_or_default())?;

    let provider = state.registry.resolve(&request.provider)?;

    debug!(
        provider = provider.name(),
        voice = %request.voice,
        language = %request.language,
        "synthesizing speech"
    );
    let audio = tokio::time::timeout(
        state.upstream_timeout,
        provider.generate_audio(&request.voice, &request.language, &request.text),
    )
    .await
    .map_err(|_| {
        Error::provider(
            provider.name(),
            format!("no response within {:?}", state.upstream_timeout),
        )
    })??;
    info!(provider = provider.name(), bytes = audio.data.len(), "speech synthesized");
    Ok(audio)
}

/// Extract the synthesis parameters, applying defaults for absent or empty values.
pub fn parse_request(params: &QueryParams, default_provider: &str) -> Result<SynthesisRequest> {
    let text = params.get_non_empty("text").ok_or_else(|| {
        Error::bad_input_with_context(
            "no text given",
            ErrorContext::new().with_field("text").with_source("handler"),
        )
    })?;

    Ok(SynthesisRequest::new(text, params.get_or("provider", default_provider))
        .language(params.get_or("lang", DEFAULT_LANGUAGE))
        .voice(params.get_or("voice", DEFAULT_VOICE)))
}

fn audio_response(audio: AudioOutput) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(audio.format.mime_type())),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        ],
        audio.data,
    )
        .into_response()
}

fn error_response(err: Error) -> Response {
    let kind = err.kind();
    match kind {
        ErrorKind::BadInput | ErrorKind::Expired | ErrorKind::UnknownProvider => {
            debug!(error = %err, "rejecting request")
        }
        ErrorKind::SignatureMismatch => error!(error = %err, "signature not validated"),
        ErrorKind::Provider => error!(error = %err, "unable to synthesize speech"),
        ErrorKind::Setup => error!(error = %err, "unable to create provider"),
    }

    let status =
        StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        format!("{}\n", kind.public_message()),
    )
        .into_response()
}
