//! Annotation data model and document builder.
//!
//! This module provides:
//! * [`Metadata`] / [`Speaker`] / [`Segment`] — the session's core entities,
//!   serialised with the exact camelCase field names of the export schema.
//! * [`PrimaryType`] / [`LoudnessLevel`] — creation-time label validation.
//! * [`AnnotationDocument`] — build, 4-space-indent serialisation, export,
//!   and the permissive JSON round trip.
//! * [`DocumentError`] — parse/export error variants.

pub mod document;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use document::{AnnotationDocument, DocumentError, DocumentValue};
pub use types::{
    AnnotatorInfo, ConventionInfo, DomainEntry, DomainInfo, DominantVariety, LanguageInfo,
    LoudnessLevel, Metadata, PrimaryType, Segment, Speaker, TaskStatus, TranscriptionData,
    TypeInfo, WorkflowState,
};
