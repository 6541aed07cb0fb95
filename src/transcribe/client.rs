//! Core `Transcriber` trait and `GeminiTranscriber` implementation.
//!
//! `GeminiTranscriber` posts a lossless WAV clip to the Gemini
//! `generateContent` endpoint as an inline base64 part alongside the
//! segment-scoped instruction prompt.  All connection details come from
//! [`TranscriberConfig`]; nothing is hardcoded.
//!
//! Failed attempts are never retried here — each failure is surfaced to the
//! caller, who may re-trigger the request manually.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

use crate::config::TranscriberConfig;
use crate::transcribe::outcome::{outcome_from_envelope, TranscriptOutcome};
use crate::transcribe::prompt::build_segment_prompt;

// ---------------------------------------------------------------------------
// TranscribeError
// ---------------------------------------------------------------------------

/// Errors that can occur when requesting a transcription.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// No API key in settings or the environment.  Raised before any network
    /// call is attempted.
    #[error("no API key configured — set transcriber.api_key or the GEMINI_API_KEY environment variable")]
    MissingApiKey,

    /// HTTP transport or connection error.
    #[error("transcription request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("transcription request timed out")]
    Timeout,

    /// The endpoint answered with a non-2xx status.  Both the status code
    /// and the response body are preserved for display.
    #[error("transcription API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The 2xx response body could not be parsed as JSON.
    #[error("failed to parse transcription response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TranscribeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscribeError::Timeout
        } else {
            TranscribeError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async trait for segment transcription backends.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn Transcriber>`.
///
/// # Arguments
/// * `wav_bytes`     – Lossless-profile WAV clip, already sliced to the
///                     segment range.
/// * `duration_secs` – Nominal clip duration used to scope the prompt.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe_clip(
        &self,
        wav_bytes: &[u8],
        duration_secs: f64,
    ) -> Result<TranscriptOutcome, TranscribeError>;
}

// ---------------------------------------------------------------------------
// GeminiTranscriber
// ---------------------------------------------------------------------------

/// Calls the Gemini `generateContent` endpoint with an inline audio part.
///
/// # Construction
/// [`GeminiTranscriber::from_config`] fails fast with
/// [`TranscribeError::MissingApiKey`] when no key is configured — the
/// network is never touched without a credential.
pub struct GeminiTranscriber {
    client: reqwest::Client,
    config: TranscriberConfig,
    api_key: String,
}

impl GeminiTranscriber {
    /// Build a transcriber from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &TranscriberConfig) -> Result<Self, TranscribeError> {
        let api_key = config
            .resolve_api_key()
            .ok_or(TranscribeError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.api_key
        )
    }

    /// Assemble the request body: the instruction prompt, the inline base64
    /// audio (`audio/wav`), and bounded low-randomness decoding settings so
    /// repeated requests on identical audio tend toward the same transcript.
    fn request_body(&self, prompt: &str, audio_base64: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt },
                        {
                            "inline_data": {
                                "mime_type": "audio/wav",
                                "data": audio_base64
                            }
                        }
                    ]
                }
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_output_tokens,
                "topP": self.config.top_p,
                "topK": self.config.top_k
            }
        })
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe_clip(
        &self,
        wav_bytes: &[u8],
        duration_secs: f64,
    ) -> Result<TranscriptOutcome, TranscribeError> {
        let prompt = build_segment_prompt(duration_secs);
        let audio_base64 = BASE64.encode(wav_bytes);
        let body = self.request_body(&prompt, &audio_base64);

        log::info!(
            "requesting transcription for a {duration_secs:.3}s clip ({} bytes)",
            wav_bytes.len()
        );

        let response = self.client.post(self.request_url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;

        Ok(outcome_from_envelope(&envelope))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
