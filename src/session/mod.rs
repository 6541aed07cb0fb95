//! Session orchestration — the explicit state machine behind the workflow.
//!
//! # Architecture
//!
//! ```text
//! MetadataEntry ──begin_annotation──▶ Annotating
//!                                        │
//!                                        ├─ load_audio      → AudioProperties
//!                                        ├─ playback_audio  → original | preview profile
//!                                        ├─ transcribe_range (async, blocking UX)
//!                                        ├─ add_segment / delete_segment
//!                                        ├─ apply_json_edit (round trip)
//!                                        └─ export          → annotated_data.json
//! ```
//!
//! One [`Session`] value owns all mutable state for a run; operations take
//! `&mut self` and validate before mutating, so a failed operation never
//! loses on-screen state.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use audio_annotator::annotation::{LoudnessLevel, Metadata, PrimaryType, Speaker};
//! use audio_annotator::session::Session;
//!
//! let mut session = Session::new();
//!
//! let speaker = Speaker {
//!     speaker_id: "S1".into(),
//!     ..Speaker::default()
//! };
//! session.begin_annotation(Metadata::default(), vec![speaker]).unwrap();
//!
//! let bytes = std::fs::read("recording.mp3").unwrap();
//! session.load_audio("recording.mp3", bytes).unwrap();
//!
//! session
//!     .add_segment(0.0, 5.0, PrimaryType::Speech, LoudnessLevel::Normal, "S1", "")
//!     .unwrap();
//! println!("{}", session.document_json().unwrap());
//! ```

pub mod context;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use context::{LoadedAudio, Session, SessionError};
pub use state::SessionPhase;
