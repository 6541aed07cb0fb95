//! Annotation data model — metadata, speakers, segments.
//!
//! Field names and nesting mirror the export schema exactly (camelCase on
//! the wire).  Nearly every field carries a serde default: hand-edited
//! documents are accepted even when fields are missing, and deserialise to
//! empty values rather than being rejected.  Only JSON *syntax* errors are
//! treated as fatal by the round-trip path.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TypeInfo
// ---------------------------------------------------------------------------

/// The `type` envelope of the annotation document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

// ---------------------------------------------------------------------------
// Language / domain / annotator / convention info blocks
// ---------------------------------------------------------------------------

/// A dominant language variety spoken by a speaker in the recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantVariety {
    #[serde(default)]
    pub language_locale: String,
    #[serde(default)]
    pub language_variety: Vec<String>,
    #[serde(default)]
    pub other_language_influence: Vec<String>,
}

/// Languages spoken in the recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    #[serde(default)]
    pub spoken_languages: Vec<String>,
    #[serde(default)]
    pub speaker_dominant_varieties: Vec<DominantVariety>,
}

/// One domain with its topic list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEntry {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub topic_list: Vec<String>,
}

/// Domain/topic classification of the recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    #[serde(default)]
    pub domain_version: String,
    #[serde(default)]
    pub domain_list: Vec<DomainEntry>,
}

/// Who annotated the recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatorInfo {
    #[serde(default)]
    pub login_encrypted: String,
    #[serde(default)]
    pub annotator_id: String,
}

/// Which annotation convention is in effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConventionInfo {
    #[serde(default)]
    pub master_convention_name: String,
    #[serde(default)]
    pub custom_addendum: String,
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Session-wide recording metadata, collected once before annotation begins.
///
/// Immutable after the session enters the annotation phase, except through a
/// full JSON round-trip edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Task type name/version written into the document envelope.
    #[serde(rename = "type", default)]
    pub type_info: TypeInfo,
    #[serde(default)]
    pub language_info: LanguageInfo,
    #[serde(default)]
    pub domain_info: DomainInfo,
    #[serde(default)]
    pub annotator_info: AnnotatorInfo,
    #[serde(default)]
    pub convention_info: ConventionInfo,
    /// Short language code stamped onto new segments and into
    /// `value.languages`.
    #[serde(default)]
    pub internal_language_code: String,
}

// ---------------------------------------------------------------------------
// Speaker
// ---------------------------------------------------------------------------

/// A participant in the recording, referenced by segments via `speaker_id`.
///
/// Each demographic attribute carries a "source" naming who asserted it
/// (typically `"Annotator"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    #[serde(default)]
    pub speaker_id: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub gender_source: String,
    #[serde(default)]
    pub speaker_nativity: String,
    #[serde(default)]
    pub speaker_nativity_source: String,
    #[serde(default)]
    pub speaker_role: String,
    #[serde(default)]
    pub speaker_role_source: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Speaker {
    /// Use `id` when non-empty, otherwise generate a fresh UUID v4.
    pub fn resolve_id(id: &str) -> String {
        if id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            id.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Segment labels
// ---------------------------------------------------------------------------

/// Primary content classification of a segment.
///
/// Segments store the label as a plain string so hand-edited documents with
/// unknown labels round-trip untouched; this enum exists for creation-time
/// validation of interactive input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryType {
    Speech,
    Noise,
    Music,
    Silence,
}

impl PrimaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryType::Speech => "Speech",
            PrimaryType::Noise => "Noise",
            PrimaryType::Music => "Music",
            PrimaryType::Silence => "Silence",
        }
    }

    /// Case-insensitive parse of interactive input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "speech" => Some(PrimaryType::Speech),
            "noise" => Some(PrimaryType::Noise),
            "music" => Some(PrimaryType::Music),
            "silence" => Some(PrimaryType::Silence),
            _ => None,
        }
    }
}

/// Loudness label of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoudnessLevel {
    Normal,
    Quiet,
    Loud,
}

impl LoudnessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoudnessLevel::Normal => "Normal",
            LoudnessLevel::Quiet => "Quiet",
            LoudnessLevel::Loud => "Loud",
        }
    }

    /// Case-insensitive parse of interactive input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Some(LoudnessLevel::Normal),
            "quiet" => Some(LoudnessLevel::Quiet),
            "loud" => Some(LoudnessLevel::Loud),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// Transcript payload of a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionData {
    #[serde(default)]
    pub content: String,
}

/// A labeled `[start, end)` time interval within the recording.
///
/// `start < end` and `start >= 0` are enforced at creation only; overlap
/// between segments is permitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub segment_id: String,
    #[serde(default)]
    pub primary_type: String,
    #[serde(default)]
    pub loudness_level: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub segment_languages: Vec<String>,
    #[serde(default)]
    pub speaker_id: String,
    #[serde(default)]
    pub transcription_data: TranscriptionData,
}

impl Segment {
    /// Create a segment with a fresh UUID v4 id.
    ///
    /// Callers are expected to have validated the time range already; this
    /// constructor only assembles the record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start: f64,
        end: f64,
        primary_type: PrimaryType,
        loudness_level: LoudnessLevel,
        language: &str,
        speaker_id: &str,
        transcript_content: &str,
    ) -> Self {
        Self {
            start,
            end,
            segment_id: Uuid::new_v4().to_string(),
            primary_type: primary_type.as_str().to_string(),
            loudness_level: loudness_level.as_str().to_string(),
            language: language.to_string(),
            segment_languages: vec![language.to_string()],
            speaker_id: speaker_id.to_string(),
            transcription_data: TranscriptionData {
                content: transcript_content.to_string(),
            },
        }
    }
}

/// Sort segments by ascending start time (display order).
pub fn sort_segments(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
}

// ---------------------------------------------------------------------------
// Workflow status
// ---------------------------------------------------------------------------

/// One workflow entry in the fixed `taskStatus` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    #[serde(default)]
    pub workflow_status: String,
    #[serde(default)]
    pub workflow_type: String,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            workflow_status: "COMPLETE".into(),
            workflow_type: "LABEL".into(),
        }
    }
}

/// The fixed workflow-status block: segmentation, speaker id and
/// transcription are always marked complete on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    #[serde(default)]
    pub segmentation: WorkflowState,
    #[serde(default)]
    pub speaker_id: WorkflowState,
    #[serde(default)]
    pub transcription: WorkflowState,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
