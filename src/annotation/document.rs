//! Annotation document assembly, serialisation and round-trip parsing.
//!
//! [`AnnotationDocument::build`] is a pure, deterministic transform from
//! `(Metadata, speakers, segments)` to the export shape; building never
//! mutates session state.  The inverse, [`AnnotationDocument::from_json`],
//! accepts a hand-edited document: JSON syntax errors are reported with
//! their line/column and leave the caller's state untouched, while missing
//! or structurally odd fields are accepted as-is (no schema validation —
//! deliberate permissiveness, not an oversight).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::types::{
    AnnotatorInfo, ConventionInfo, DomainInfo, LanguageInfo, Metadata, Segment, Speaker,
    TaskStatus, TypeInfo,
};

// ---------------------------------------------------------------------------
// DocumentError
// ---------------------------------------------------------------------------

/// Errors from document parsing and export.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The edited text is not valid JSON.  Carries the error location so the
    /// user can find the mistake.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Writing the exported file failed.
    #[error("failed to write annotation document: {0}")]
    Io(String),
}

// ---------------------------------------------------------------------------
// Document shape
// ---------------------------------------------------------------------------

/// The `value` object of the annotation document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentValue {
    /// The recording's language codes (the session's internal code).
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub language_info: LanguageInfo,
    #[serde(default)]
    pub domain_info: DomainInfo,
    #[serde(default)]
    pub convention_info: ConventionInfo,
    #[serde(default)]
    pub annotator_info: AnnotatorInfo,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub task_status: TaskStatus,
}

/// The complete exported annotation record:
/// a type/version envelope wrapping [`DocumentValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(rename = "type", default)]
    pub type_info: TypeInfo,
    #[serde(default)]
    pub value: DocumentValue,
}

impl AnnotationDocument {
    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// Assemble a document from session state.
    ///
    /// Metadata info blocks are copied verbatim; segments are sorted by
    /// ascending start time; the fixed workflow-status block marks
    /// segmentation, speaker-id and transcription as complete.
    pub fn build(metadata: &Metadata, speakers: &[Speaker], segments: &[Segment]) -> Self {
        let mut sorted = segments.to_vec();
        crate::annotation::types::sort_segments(&mut sorted);

        Self {
            type_info: metadata.type_info.clone(),
            value: DocumentValue {
                languages: vec![metadata.internal_language_code.clone()],
                language_info: metadata.language_info.clone(),
                domain_info: metadata.domain_info.clone(),
                convention_info: metadata.convention_info.clone(),
                annotator_info: metadata.annotator_info.clone(),
                speakers: speakers.to_vec(),
                segments: sorted,
                task_status: TaskStatus::default(),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Serialisation
    // -----------------------------------------------------------------------

    /// Serialise with 4-space indentation — the shape shown in the editor
    /// and written on export.
    pub fn to_json_string(&self) -> String {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        // A struct of plain owned fields cannot fail to serialise.
        self.serialize(&mut serializer)
            .expect("annotation document serialisation cannot fail");
        String::from_utf8(out).expect("serde_json output is UTF-8")
    }

    /// Parse a (possibly hand-edited) document.
    ///
    /// Only JSON syntax errors are rejected; missing fields deserialise to
    /// defaults and extra fields are ignored.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(text).map_err(|e| DocumentError::Parse {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })
    }

    /// Write the document to `path` as indented JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), DocumentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::Io(e.to_string()))?;
        }
        std::fs::write(path, self.to_json_string()).map_err(|e| DocumentError::Io(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
