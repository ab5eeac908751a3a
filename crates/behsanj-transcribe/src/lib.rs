//! behsanj-transcribe
//!
//! Speech-to-text client for the backend's `/api/stt` endpoint, plus the
//! transcript merge rule the dictation inputs share. Browser-side recognition
//! never reaches this crate; it runs entirely in the embedding UI.

pub mod audio;
pub mod error;

use serde::Deserialize;
use tracing::info;

use behsanj_core::models::TranscriptionMode;

pub use crate::audio::{decode_data_uri, encode_data_uri};
pub use crate::error::TranscribeError;

#[derive(Deserialize)]
struct SttResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn provider_name(mode: TranscriptionMode) -> &'static str {
    match mode {
        TranscriptionMode::Iotype => "iotype",
        TranscriptionMode::Browser => "browser",
        TranscriptionMode::Gemini => "gemini",
    }
}

/// Send a recorded take to the backend for transcription.
///
/// The audio arrives as the data URI the recorder produced; it is decoded and
/// uploaded as a multipart file together with the provider name and the
/// provider's key list. A provider failure keeps the provider name in the
/// error so the UI can report it while leaving the recording in place.
pub async fn transcribe(
    base_url: &str,
    audio_data_uri: &str,
    mode: TranscriptionMode,
    api_keys: &[String],
) -> Result<String, TranscribeError> {
    let provider = provider_name(mode);
    if mode == TranscriptionMode::Browser {
        return Err(TranscribeError::Provider {
            provider: provider.to_string(),
            message: "browser recognition has no server side".to_string(),
        });
    }

    let (mime, bytes) = decode_data_uri(audio_data_uri)?;
    info!(provider, bytes = bytes.len(), "submitting audio for transcription");

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name("audio.webm")
        .mime_str(&mime)?;
    let form = reqwest::multipart::Form::new()
        .part("audioFile", part)
        .text("provider", provider)
        .text("apiKeys", serde_json::to_string(api_keys)?);

    let response = reqwest::Client::new()
        .post(format!("{}/api/stt", base_url.trim_end_matches('/')))
        .multipart(form)
        .send()
        .await?;

    // Failures come back as `{error}` (with a 500), successes as `{text}`.
    let body: SttResponse = response.json().await?;
    if let Some(message) = body.error {
        return Err(TranscribeError::Provider { provider: provider.to_string(), message });
    }
    match body.text {
        Some(text) => Ok(text),
        None => Err(TranscribeError::Provider {
            provider: provider.to_string(),
            message: "empty response".to_string(),
        }),
    }
}

/// Merge a recognized chunk into already-entered text: append, inserting a
/// single space only when the existing text is non-empty and does not already
/// end in one.
pub fn append_transcript(existing: &str, recognized: &str) -> String {
    if existing.is_empty() || existing.ends_with(' ') {
        format!("{existing}{recognized}")
    } else {
        format!("{existing} {recognized}")
    }
}
