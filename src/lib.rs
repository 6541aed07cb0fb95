//! Audio annotation tool — segment, label, transcribe, export.
//!
//! A session-driven workflow for annotating a single audio recording:
//!
//! 1. Collect recording [`annotation::Metadata`] and the speaker list.
//! 2. Load an audio file ([`audio::decode`] auto-detects the container).
//! 3. Mark time segments, optionally transcribing each via the Gemini
//!    `generateContent` API ([`transcribe`]).
//! 4. Export the assembled annotation document as indented JSON
//!    ([`annotation::AnnotationDocument`]), or hand-edit it and apply the
//!    edited JSON back onto the session.
//!
//! All mutable state lives in one owned [`session::Session`] driven by an
//! explicit two-phase state machine — there is no ambient global state.

pub mod annotation;
pub mod audio;
pub mod config;
pub mod session;
pub mod transcribe;
