//! Mapping from API responses to transcript content.
//!
//! A *successful* call can still carry no usable text.  The four cases are
//! kept distinct so the session layer can message each one differently, and
//! only then flattened into the string stored in the segment's
//! `transcriptionData.content` field.

use serde_json::Value;

use crate::transcribe::prompt::{NOISE_SENTINEL, SILENCE_SENTINEL};

// ---------------------------------------------------------------------------
// TranscriptOutcome
// ---------------------------------------------------------------------------

/// Result of a successful (2xx) transcription call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// The model returned the exact "no speech" sentinel.
    Silence,
    /// The model returned the exact "non-speech sound only" sentinel.
    NoiseOnly,
    /// The response envelope was well-formed JSON but contained no candidate
    /// text.  Distinct from an error: the call itself succeeded.
    NoContent,
    /// Free-text transcript.
    Text(String),
}

impl TranscriptOutcome {
    /// Classify the text of a candidate part.
    ///
    /// Sentinels must match exactly after trimming surrounding whitespace;
    /// an all-whitespace reply counts as no content.
    pub fn from_response_text(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed {
            "" => TranscriptOutcome::NoContent,
            t if t == SILENCE_SENTINEL => TranscriptOutcome::Silence,
            t if t == NOISE_SENTINEL => TranscriptOutcome::NoiseOnly,
            t => TranscriptOutcome::Text(t.to_string()),
        }
    }

    /// The string stored as the segment's transcript content.
    ///
    /// | Outcome     | Stored content       |
    /// |-------------|----------------------|
    /// | `Silence`   | `""` (empty string)  |
    /// | `NoiseOnly` | the literal `[NOISE]`|
    /// | `NoContent` | `""` (empty string)  |
    /// | `Text(t)`   | `t`                  |
    pub fn content(&self) -> &str {
        match self {
            TranscriptOutcome::Silence | TranscriptOutcome::NoContent => "",
            TranscriptOutcome::NoiseOnly => NOISE_SENTINEL,
            TranscriptOutcome::Text(t) => t,
        }
    }

    /// Short status line for the interactive surface.
    pub fn describe(&self) -> &'static str {
        match self {
            TranscriptOutcome::Silence => "no speech detected in the segment",
            TranscriptOutcome::NoiseOnly => "only background noise/music detected",
            TranscriptOutcome::NoContent => "no content returned for the segment",
            TranscriptOutcome::Text(_) => "transcribed",
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope extraction
// ---------------------------------------------------------------------------

/// Extract the outcome from a parsed `generateContent` response envelope:
/// `candidates[0].content.parts[0].text`.
///
/// Any missing layer of the envelope — no candidates, no content, no parts,
/// no text — is [`TranscriptOutcome::NoContent`], never an error.
pub fn outcome_from_envelope(envelope: &Value) -> TranscriptOutcome {
    let text = envelope
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str());

    match text {
        Some(t) => TranscriptOutcome::from_response_text(t),
        None => TranscriptOutcome::NoContent,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- from_response_text ------------------------------------------------

    #[test]
    fn silence_sentinel_maps_to_empty_content() {
        let outcome = TranscriptOutcome::from_response_text("[SILENCE]");
        assert_eq!(outcome, TranscriptOutcome::Silence);
        assert_eq!(outcome.content(), "");
    }

    #[test]
    fn noise_sentinel_is_stored_literally() {
        let outcome = TranscriptOutcome::from_response_text("[NOISE]");
        assert_eq!(outcome, TranscriptOutcome::NoiseOnly);
        assert_eq!(outcome.content(), "[NOISE]");
    }

    #[test]
    fn free_text_passes_through_trimmed() {
        let outcome = TranscriptOutcome::from_response_text("  hello there \n");
        assert_eq!(outcome, TranscriptOutcome::Text("hello there".into()));
        assert_eq!(outcome.content(), "hello there");
    }

    #[test]
    fn sentinel_with_surrounding_whitespace_still_matches() {
        let outcome = TranscriptOutcome::from_response_text("\n[SILENCE]  ");
        assert_eq!(outcome, TranscriptOutcome::Silence);
    }

    #[test]
    fn sentinel_embedded_in_text_is_not_a_sentinel() {
        let outcome = TranscriptOutcome::from_response_text("he said [SILENCE] loudly");
        assert!(matches!(outcome, TranscriptOutcome::Text(_)));
    }

    #[test]
    fn blank_reply_is_no_content() {
        let outcome = TranscriptOutcome::from_response_text("   ");
        assert_eq!(outcome, TranscriptOutcome::NoContent);
        assert_eq!(outcome.content(), "");
    }

    // ---- outcome_from_envelope ---------------------------------------------

    #[test]
    fn well_formed_envelope_yields_text() {
        let envelope = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "kia ora" }] }
            }]
        });
        assert_eq!(
            outcome_from_envelope(&envelope),
            TranscriptOutcome::Text("kia ora".into())
        );
    }

    #[test]
    fn empty_candidates_is_no_content() {
        let envelope = json!({ "candidates": [] });
        assert_eq!(outcome_from_envelope(&envelope), TranscriptOutcome::NoContent);
    }

    #[test]
    fn missing_candidates_is_no_content() {
        let envelope = json!({ "promptFeedback": {} });
        assert_eq!(outcome_from_envelope(&envelope), TranscriptOutcome::NoContent);
    }

    #[test]
    fn empty_parts_is_no_content() {
        let envelope = json!({
            "candidates": [{ "content": { "parts": [] } }]
        });
        assert_eq!(outcome_from_envelope(&envelope), TranscriptOutcome::NoContent);
    }

    #[test]
    fn sentinel_in_envelope_is_classified() {
        let envelope = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[NOISE]" }] }
            }]
        });
        assert_eq!(outcome_from_envelope(&envelope), TranscriptOutcome::NoiseOnly);
    }
}
