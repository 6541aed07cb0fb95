//! Segment transcription via the Gemini `generateContent` API.
//!
//! This module provides:
//! * [`Transcriber`] — async trait implemented by transcription backends.
//! * [`GeminiTranscriber`] — the production HTTP implementation.
//! * [`build_segment_prompt`] — clip-scoped instruction with sentinel rules.
//! * [`TranscriptOutcome`] — sentinel/no-content/free-text classification.
//! * [`TranscribeError`] — error variants for transcription operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use audio_annotator::config::TranscriberConfig;
//! use audio_annotator::transcribe::{GeminiTranscriber, Transcriber};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TranscriberConfig::default();
//!
//!     // Fails fast when no API key is configured.
//!     let transcriber = GeminiTranscriber::from_config(&config).unwrap();
//!
//!     let clip: Vec<u8> = std::fs::read("segment.wav").unwrap();
//!     let outcome = transcriber.transcribe_clip(&clip, 5.0).await.unwrap();
//!     println!("content: {:?}", outcome.content());
//! }
//! ```

pub mod client;
pub mod outcome;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{GeminiTranscriber, TranscribeError, Transcriber};
pub use outcome::{outcome_from_envelope, TranscriptOutcome};
pub use prompt::{build_segment_prompt, NOISE_SENTINEL, SILENCE_SENTINEL};
