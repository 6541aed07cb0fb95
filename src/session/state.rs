//! Session state machine.
//!
//! The annotation workflow has exactly two phases with one explicit
//! transition (plus an explicit way back):
//!
//! ```text
//! MetadataEntry ──begin_annotation(metadata, speakers)──▶ Annotating
//!               ◀──────────return_to_metadata────────────
//! ```
//!
//! Every other operation (load audio, add/delete segment, transcribe,
//! JSON edit, export) is only legal in `Annotating` and is rejected with a
//! typed error otherwise — there is no implicit rerun model to fall back on.

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Phases of an annotation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Collecting recording metadata and the speaker list.
    MetadataEntry,

    /// Metadata saved; audio loading, segment marking, transcription and
    /// export are available.
    Annotating,
}

impl SessionPhase {
    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::MetadataEntry => "Metadata entry",
            SessionPhase::Annotating => "Annotating",
        }
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::MetadataEntry
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
