//! The owned session context and its operations.
//!
//! [`Session`] is the single source of truth for one interactive annotation
//! run: phase, metadata, speakers, segments, the loaded audio and the
//! pending transcript.  It is passed explicitly to every operation — no
//! ambient global state — which keeps extraction, transcription and
//! document building independently testable.
//!
//! Every operation validates its inputs **before** any side effect; on any
//! error the session is left exactly as it was.

use std::path::Path;

use thiserror::Error;

use crate::annotation::{
    AnnotationDocument, DocumentError, LoudnessLevel, Metadata, PrimaryType, Segment, Speaker,
};
use crate::audio::{
    decode_audio, extract_segment, needs_preview, preview_profile, AudioError, AudioProperties,
    PcmBuffer,
};
use crate::config::AudioConfig;
use crate::session::state::SessionPhase;
use crate::transcribe::{TranscribeError, Transcriber, TranscriptOutcome};

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// All errors a session operation can report.
///
/// Input-validation variants fire before any side effect; wrapped subsystem
/// errors propagate with the underlying cause intact.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation requires the annotation phase.
    #[error("metadata has not been saved yet — finish the metadata step first")]
    NotAnnotating,

    /// `begin_annotation` was called twice.
    #[error("metadata is already saved — annotation is in progress")]
    AlreadyAnnotating,

    /// `begin_annotation` needs at least one speaker.
    #[error("cannot proceed without speakers — define at least one speaker")]
    NoSpeakers,

    /// No audio file has been loaded.
    #[error("no audio file loaded")]
    NoAudio,

    /// Start time must be strictly less than end time.
    #[error("start time must be less than end time (got start {start}, end {end})")]
    InvertedRange { start: f64, end: f64 },

    /// Start time cannot be negative.
    #[error("start time cannot be negative (got {start})")]
    NegativeStart { start: f64 },

    /// The referenced speaker does not exist in this session.
    #[error("unknown speaker id: {0}")]
    UnknownSpeaker(String),

    /// The referenced segment does not exist in this session.
    #[error("unknown segment id: {0}")]
    UnknownSegment(String),

    /// Audio decode/encode failure; prior state is preserved.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Transcription failure; the pending transcript is preserved.
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    /// Document parse/export failure; speakers and segments are preserved.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

// ---------------------------------------------------------------------------
// LoadedAudio
// ---------------------------------------------------------------------------

/// The recording currently under annotation.
#[derive(Debug, Clone)]
pub struct LoadedAudio {
    /// Original file name, used to detect re-uploads of the same file.
    pub name: String,
    /// Original undecoded bytes (the preview threshold is judged on these).
    pub bytes: Vec<u8>,
    /// Decoded PCM, the source for all slicing.
    pub pcm: PcmBuffer,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's annotation session, from metadata entry to export.
#[derive(Debug, Default)]
pub struct Session {
    phase: SessionPhase,
    metadata: Metadata,
    speakers: Vec<Speaker>,
    segments: Vec<Segment>,
    audio: Option<LoadedAudio>,
    pending_transcript: String,
}

impl Session {
    /// A fresh session in the metadata-entry phase.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    /// Segments in display order (ascending start time).
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn audio(&self) -> Option<&LoadedAudio> {
        self.audio.as_ref()
    }

    /// Transcript text produced by the most recent successful transcription,
    /// waiting to be attached to the next segment.
    pub fn pending_transcript(&self) -> &str {
        &self.pending_transcript
    }

    // -----------------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------------

    /// Save metadata and the speaker list, and enter the annotation phase.
    ///
    /// Requires at least one speaker — segments reference speakers by id.
    pub fn begin_annotation(
        &mut self,
        metadata: Metadata,
        speakers: Vec<Speaker>,
    ) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Annotating {
            return Err(SessionError::AlreadyAnnotating);
        }
        if speakers.is_empty() {
            return Err(SessionError::NoSpeakers);
        }

        self.metadata = metadata;
        self.speakers = speakers;
        self.phase = SessionPhase::Annotating;
        log::info!(
            "annotation started: {} speaker(s), language {}",
            self.speakers.len(),
            self.metadata.internal_language_code
        );
        Ok(())
    }

    /// Return to the metadata step.  Metadata, speakers and segments are
    /// kept; saving the metadata form again overwrites them.
    pub fn return_to_metadata(&mut self) {
        self.phase = SessionPhase::MetadataEntry;
    }

    // -----------------------------------------------------------------------
    // Audio
    // -----------------------------------------------------------------------

    /// Decode and attach an uploaded audio file, returning its display
    /// properties.
    ///
    /// Decoding happens before any state is touched: an undecodable file
    /// leaves the previously loaded audio (if any) in place.
    pub fn load_audio(&mut self, name: &str, bytes: Vec<u8>) -> Result<AudioProperties, SessionError> {
        self.require_annotating()?;

        let pcm = decode_audio(&bytes)?;
        let properties = AudioProperties::of(&pcm);

        log::info!(
            "loaded '{}': {:.2}s, {} Hz, {} channel(s)",
            name,
            properties.duration_secs,
            properties.sample_rate,
            properties.channels
        );

        self.audio = Some(LoadedAudio {
            name: name.to_string(),
            bytes,
            pcm,
        });
        Ok(properties)
    }

    /// Bytes for the interactive player: the original when it is small
    /// enough, otherwise the lightweight preview profile.
    ///
    /// The preview never feeds transcription — [`Session::transcribe_range`]
    /// always slices the original.
    pub fn playback_audio(&self, config: &AudioConfig) -> Result<Vec<u8>, SessionError> {
        let audio = self.audio.as_ref().ok_or(SessionError::NoAudio)?;

        if needs_preview(audio.bytes.len() as u64, config.preview_threshold_bytes) {
            Ok(preview_profile(&audio.pcm, config.preview_sample_rate)?)
        } else {
            Ok(audio.bytes.clone())
        }
    }

    // -----------------------------------------------------------------------
    // Segments
    // -----------------------------------------------------------------------

    /// Add a segment for `[start, end)`.
    ///
    /// Validates the time range and the speaker reference before anything is
    /// appended; on success the new segment carries a fresh UUID, the
    /// session's internal language code, and the given transcript content,
    /// the pending transcript is cleared, and the list is re-sorted by start
    /// time.
    pub fn add_segment(
        &mut self,
        start: f64,
        end: f64,
        primary_type: PrimaryType,
        loudness_level: LoudnessLevel,
        speaker_id: &str,
        transcript: &str,
    ) -> Result<&Segment, SessionError> {
        self.require_annotating()?;
        validate_range(start, end)?;

        if !self.speakers.iter().any(|s| s.speaker_id == speaker_id) {
            return Err(SessionError::UnknownSpeaker(speaker_id.to_string()));
        }

        let language = self.default_language();
        let segment = Segment::new(
            start,
            end,
            primary_type,
            loudness_level,
            &language,
            speaker_id,
            transcript,
        );
        let id = segment.segment_id.clone();

        self.segments.push(segment);
        crate::annotation::types::sort_segments(&mut self.segments);
        self.pending_transcript.clear();

        log::info!("segment added: [{start}, {end}) {}", primary_type.as_str());

        Ok(self
            .segments
            .iter()
            .find(|s| s.segment_id == id)
            .expect("segment was just inserted"))
    }

    /// Delete the segment with the given id.
    pub fn delete_segment(&mut self, segment_id: &str) -> Result<(), SessionError> {
        self.require_annotating()?;

        let before = self.segments.len();
        self.segments.retain(|s| s.segment_id != segment_id);
        if self.segments.len() == before {
            return Err(SessionError::UnknownSegment(segment_id.to_string()));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transcription
    // -----------------------------------------------------------------------

    /// Transcribe `[start, end)` of the loaded audio.
    ///
    /// The clip is always sliced from the original buffer in the lossless
    /// profile.  On success the mapped content is stored as the pending
    /// transcript; on any failure the pending transcript keeps its previous
    /// value and the error is returned for display.
    pub async fn transcribe_range(
        &mut self,
        transcriber: &dyn Transcriber,
        start: f64,
        end: f64,
    ) -> Result<TranscriptOutcome, SessionError> {
        self.require_annotating()?;
        validate_range(start, end)?;

        let audio = self.audio.as_ref().ok_or(SessionError::NoAudio)?;
        let clip = extract_segment(&audio.pcm, start, end)?;

        let outcome = transcriber.transcribe_clip(&clip, end - start).await?;

        self.pending_transcript = outcome.content().to_string();
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Document
    // -----------------------------------------------------------------------

    /// Assemble the annotation document from the current session state.
    pub fn build_document(&self) -> Result<AnnotationDocument, SessionError> {
        self.require_annotating()?;
        Ok(AnnotationDocument::build(
            &self.metadata,
            &self.speakers,
            &self.segments,
        ))
    }

    /// The document as the 4-space-indented JSON shown in the editor.
    pub fn document_json(&self) -> Result<String, SessionError> {
        Ok(self.build_document()?.to_json_string())
    }

    /// Apply a hand-edited JSON document: replace the speaker and segment
    /// lists with the parsed contents.
    ///
    /// A JSON syntax error leaves both lists untouched and reports the
    /// parse location.  Structural oddities (missing fields, dangling
    /// speaker references) are accepted as-is.
    pub fn apply_json_edit(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_annotating()?;

        let document = AnnotationDocument::from_json(text)?;

        self.speakers = document.value.speakers;
        self.segments = document.value.segments;
        crate::annotation::types::sort_segments(&mut self.segments);
        log::info!(
            "JSON edit applied: {} speaker(s), {} segment(s)",
            self.speakers.len(),
            self.segments.len()
        );
        Ok(())
    }

    /// Export the document to `path` as indented JSON.
    pub fn export(&self, path: &Path) -> Result<(), SessionError> {
        let document = self.build_document()?;
        document.write_to(path)?;
        log::info!("annotation exported to {}", path.display());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn require_annotating(&self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Annotating {
            return Err(SessionError::NotAnnotating);
        }
        Ok(())
    }

    fn default_language(&self) -> String {
        if self.metadata.internal_language_code.is_empty() {
            "en_US".to_string()
        } else {
            self.metadata.internal_language_code.clone()
        }
    }
}

/// Time-range validation shared by segment creation and transcription.
fn validate_range(start: f64, end: f64) -> Result<(), SessionError> {
    if start < 0.0 {
        return Err(SessionError::NegativeStart { start });
    }
    if start >= end {
        return Err(SessionError::InvertedRange { start, end });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::annotation::TypeInfo;
    use crate::audio::test_support::sine_wav_bytes;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Always succeeds with a fixed outcome.
    struct FixedOutcome(TranscriptOutcome);

    #[async_trait]
    impl Transcriber for FixedOutcome {
        async fn transcribe_clip(
            &self,
            _wav: &[u8],
            _duration: f64,
        ) -> Result<TranscriptOutcome, TranscribeError> {
            Ok(self.0.clone())
        }
    }

    /// Always fails with HTTP 429.
    struct RateLimited;

    #[async_trait]
    impl Transcriber for RateLimited {
        async fn transcribe_clip(
            &self,
            _wav: &[u8],
            _duration: f64,
        ) -> Result<TranscriptOutcome, TranscribeError> {
            Err(TranscribeError::Http {
                status: 429,
                body: "quota exceeded".into(),
            })
        }
    }

    /// Records the clip it was handed, then returns free text.
    struct ClipInspector {
        seen: std::sync::Mutex<Option<(usize, f64)>>,
    }

    #[async_trait]
    impl Transcriber for ClipInspector {
        async fn transcribe_clip(
            &self,
            wav: &[u8],
            duration: f64,
        ) -> Result<TranscriptOutcome, TranscribeError> {
            *self.seen.lock().unwrap() = Some((wav.len(), duration));
            Ok(TranscriptOutcome::Text("ok".into()))
        }
    }

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    fn metadata() -> Metadata {
        Metadata {
            type_info: TypeInfo {
                name: "MULTI_SPEAKER_LONG_FORM_TRANSCRIPTION".into(),
                version: "3.1".into(),
            },
            internal_language_code: "en_NZ".into(),
            ..Metadata::default()
        }
    }

    fn speaker(id: &str) -> Speaker {
        Speaker {
            speaker_id: id.into(),
            speaker_role: "Customer".into(),
            ..Speaker::default()
        }
    }

    fn annotating_session() -> Session {
        let mut session = Session::new();
        session
            .begin_annotation(metadata(), vec![speaker("S1")])
            .expect("begin annotation");
        session
    }

    fn session_with_audio() -> Session {
        let mut session = annotating_session();
        // 2 s of 440 Hz at 8 kHz
        session
            .load_audio("tone.wav", sine_wav_bytes(8_000, 16_000, 440.0))
            .expect("load audio");
        session
    }

    // -----------------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------------

    #[test]
    fn new_session_starts_in_metadata_entry() {
        let session = Session::new();
        assert_eq!(session.phase(), SessionPhase::MetadataEntry);
        assert!(session.speakers().is_empty());
        assert!(session.segments().is_empty());
    }

    #[test]
    fn begin_annotation_transitions_phase() {
        let session = annotating_session();
        assert_eq!(session.phase(), SessionPhase::Annotating);
        assert_eq!(session.speakers().len(), 1);
    }

    #[test]
    fn begin_annotation_requires_speakers() {
        let mut session = Session::new();
        let err = session.begin_annotation(metadata(), vec![]).unwrap_err();
        assert!(matches!(err, SessionError::NoSpeakers));
        assert_eq!(session.phase(), SessionPhase::MetadataEntry);
    }

    #[test]
    fn begin_annotation_twice_is_rejected() {
        let mut session = annotating_session();
        let err = session
            .begin_annotation(metadata(), vec![speaker("S2")])
            .unwrap_err();
        assert!(matches!(err, SessionError::AlreadyAnnotating));
        // Original speakers untouched
        assert_eq!(session.speakers()[0].speaker_id, "S1");
    }

    #[test]
    fn return_to_metadata_keeps_state() {
        let mut session = session_with_audio();
        session.return_to_metadata();
        assert_eq!(session.phase(), SessionPhase::MetadataEntry);
        assert_eq!(session.speakers().len(), 1);
        assert!(session.audio().is_some());
    }

    #[test]
    fn operations_require_annotation_phase() {
        let mut session = Session::new();

        assert!(matches!(
            session.load_audio("x.wav", vec![1, 2, 3]),
            Err(SessionError::NotAnnotating)
        ));
        assert!(matches!(
            session.add_segment(
                0.0,
                1.0,
                PrimaryType::Speech,
                LoudnessLevel::Normal,
                "S1",
                ""
            ),
            Err(SessionError::NotAnnotating)
        ));
        assert!(matches!(
            session.build_document(),
            Err(SessionError::NotAnnotating)
        ));
    }

    // -----------------------------------------------------------------------
    // Audio
    // -----------------------------------------------------------------------

    #[test]
    fn load_audio_reports_properties() {
        let mut session = annotating_session();
        let props = session
            .load_audio("tone.wav", sine_wav_bytes(8_000, 16_000, 440.0))
            .expect("load");

        assert!((props.duration_secs - 2.0).abs() < 1e-6);
        assert_eq!(props.sample_rate, 8_000);
        assert_eq!(props.channels, 1);
        assert_eq!(session.audio().unwrap().name, "tone.wav");
    }

    #[test]
    fn undecodable_audio_preserves_previous_audio() {
        let mut session = session_with_audio();

        let err = session.load_audio("bad.bin", vec![0xFF; 64]).unwrap_err();
        assert!(matches!(err, SessionError::Audio(_)));
        // The previously loaded file is still attached.
        assert_eq!(session.audio().unwrap().name, "tone.wav");
    }

    #[test]
    fn playback_uses_original_under_threshold() {
        let session = session_with_audio();
        let config = AudioConfig::default();

        let bytes = session.playback_audio(&config).expect("playback");
        assert_eq!(bytes, session.audio().unwrap().bytes);
    }

    #[test]
    fn playback_uses_preview_over_threshold() {
        let session = session_with_audio();
        let config = AudioConfig {
            preview_sample_rate: 16_000,
            // Force the preview path for this small fixture.
            preview_threshold_bytes: 16,
        };

        let bytes = session.playback_audio(&config).expect("playback");
        let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).expect("read back");
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 16_000);
    }

    #[test]
    fn playback_without_audio_is_rejected() {
        let session = annotating_session();
        assert!(matches!(
            session.playback_audio(&AudioConfig::default()),
            Err(SessionError::NoAudio)
        ));
    }

    // -----------------------------------------------------------------------
    // Segments
    // -----------------------------------------------------------------------

    #[test]
    fn add_segment_appends_and_stamps_language() {
        let mut session = annotating_session();
        let segment = session
            .add_segment(
                0.0,
                5.0,
                PrimaryType::Speech,
                LoudnessLevel::Normal,
                "S1",
                "hello",
            )
            .expect("add")
            .clone();

        assert_eq!(segment.language, "en_NZ");
        assert_eq!(segment.segment_languages, vec!["en_NZ".to_string()]);
        assert_eq!(segment.speaker_id, "S1");
        assert_eq!(segment.transcription_data.content, "hello");
        assert_eq!(session.segments().len(), 1);
    }

    #[test]
    fn inverted_range_rejected_without_append() {
        let mut session = annotating_session();
        let err = session
            .add_segment(
                5.0,
                2.0,
                PrimaryType::Speech,
                LoudnessLevel::Normal,
                "S1",
                "",
            )
            .unwrap_err();

        assert!(matches!(err, SessionError::InvertedRange { .. }));
        assert!(session.segments().is_empty());
    }

    #[test]
    fn negative_start_rejected_without_append() {
        let mut session = annotating_session();
        let err = session
            .add_segment(
                -1.0,
                2.0,
                PrimaryType::Speech,
                LoudnessLevel::Normal,
                "S1",
                "",
            )
            .unwrap_err();

        assert!(matches!(err, SessionError::NegativeStart { .. }));
        assert!(session.segments().is_empty());
    }

    #[test]
    fn unknown_speaker_rejected_without_append() {
        let mut session = annotating_session();
        let err = session
            .add_segment(
                0.0,
                1.0,
                PrimaryType::Speech,
                LoudnessLevel::Normal,
                "S9",
                "",
            )
            .unwrap_err();

        assert!(matches!(err, SessionError::UnknownSpeaker(_)));
        assert!(session.segments().is_empty());
    }

    #[test]
    fn segments_stay_sorted_through_adds_and_deletes() {
        let mut session = annotating_session();
        for (start, end) in [(6.0, 7.0), (1.0, 2.0), (3.5, 4.0), (0.25, 0.5)] {
            session
                .add_segment(
                    start,
                    end,
                    PrimaryType::Speech,
                    LoudnessLevel::Normal,
                    "S1",
                    "",
                )
                .expect("add");
        }

        let second_id = session.segments()[1].segment_id.clone();
        session.delete_segment(&second_id).expect("delete");

        let starts: Vec<f64> = session.segments().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0.25, 3.5, 6.0]);
    }

    #[test]
    fn delete_unknown_segment_is_an_error() {
        let mut session = annotating_session();
        let err = session.delete_segment("no-such-id").unwrap_err();
        assert!(matches!(err, SessionError::UnknownSegment(_)));
    }

    #[test]
    fn overlapping_segments_are_permitted() {
        let mut session = annotating_session();
        session
            .add_segment(0.0, 5.0, PrimaryType::Speech, LoudnessLevel::Normal, "S1", "")
            .expect("first");
        session
            .add_segment(2.0, 8.0, PrimaryType::Music, LoudnessLevel::Quiet, "S1", "")
            .expect("overlap is allowed");
        assert_eq!(session.segments().len(), 2);
    }

    // -----------------------------------------------------------------------
    // Transcription
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn transcribe_stores_text_as_pending() {
        let mut session = session_with_audio();
        let transcriber = FixedOutcome(TranscriptOutcome::Text("kia ora".into()));

        let outcome = session
            .transcribe_range(&transcriber, 0.0, 1.0)
            .await
            .expect("transcribe");

        assert_eq!(outcome, TranscriptOutcome::Text("kia ora".into()));
        assert_eq!(session.pending_transcript(), "kia ora");
    }

    #[tokio::test]
    async fn silence_sentinel_stores_empty_pending() {
        let mut session = session_with_audio();
        let transcriber = FixedOutcome(TranscriptOutcome::Silence);

        session
            .transcribe_range(&transcriber, 0.0, 1.0)
            .await
            .expect("transcribe");

        assert_eq!(session.pending_transcript(), "");
    }

    #[tokio::test]
    async fn noise_sentinel_stores_literal_placeholder() {
        let mut session = session_with_audio();
        let transcriber = FixedOutcome(TranscriptOutcome::NoiseOnly);

        session
            .transcribe_range(&transcriber, 0.0, 1.0)
            .await
            .expect("transcribe");

        assert_eq!(session.pending_transcript(), "[NOISE]");
    }

    #[tokio::test]
    async fn http_429_preserves_pending_transcript() {
        let mut session = session_with_audio();
        session
            .transcribe_range(
                &FixedOutcome(TranscriptOutcome::Text("earlier text".into())),
                0.0,
                1.0,
            )
            .await
            .expect("seed pending transcript");

        let err = session
            .transcribe_range(&RateLimited, 0.0, 1.0)
            .await
            .unwrap_err();

        match err {
            SessionError::Transcribe(TranscribeError::Http { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
        assert_eq!(session.pending_transcript(), "earlier text");
    }

    #[tokio::test]
    async fn transcribe_slices_the_requested_range() {
        let mut session = session_with_audio();
        let inspector = ClipInspector {
            seen: std::sync::Mutex::new(None),
        };

        session
            .transcribe_range(&inspector, 0.5, 1.5)
            .await
            .expect("transcribe");

        let (clip_len, duration) = inspector.seen.lock().unwrap().take().expect("clip captured");
        // 1 s of 8 kHz mono 16-bit plus the 44-byte WAV header.
        assert_eq!(clip_len, 8_000 * 2 + 44);
        assert!((duration - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn transcribe_without_audio_is_rejected() {
        let mut session = annotating_session();
        let err = session
            .transcribe_range(&FixedOutcome(TranscriptOutcome::Silence), 0.0, 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NoAudio));
    }

    #[tokio::test]
    async fn transcribe_validates_range_before_extraction() {
        let mut session = session_with_audio();
        let err = session
            .transcribe_range(&FixedOutcome(TranscriptOutcome::Silence), 3.0, 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvertedRange { .. }));
    }

    // -----------------------------------------------------------------------
    // Document round trip
    // -----------------------------------------------------------------------

    #[test]
    fn document_reflects_session_state() {
        let mut session = annotating_session();
        session
            .add_segment(0.0, 5.0, PrimaryType::Speech, LoudnessLevel::Normal, "S1", "hi")
            .expect("add");

        let doc = session.build_document().expect("build");
        assert_eq!(doc.value.segments.len(), 1);
        assert_eq!(doc.value.speakers.len(), 1);
        assert_eq!(doc.value.languages, vec!["en_NZ".to_string()]);
    }

    #[test]
    fn apply_edited_json_replaces_lists() {
        let mut session = annotating_session();
        session
            .add_segment(0.0, 5.0, PrimaryType::Speech, LoudnessLevel::Normal, "S1", "")
            .expect("add");

        let mut doc = session.build_document().expect("build");
        doc.value.segments[0].transcription_data.content = "edited by hand".into();
        doc.value.segments[0].end = 6.5;

        session
            .apply_json_edit(&doc.to_json_string())
            .expect("apply");

        assert_eq!(
            session.segments()[0].transcription_data.content,
            "edited by hand"
        );
        assert!((session.segments()[0].end - 6.5).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_json_leaves_state_untouched() {
        let mut session = annotating_session();
        session
            .add_segment(0.0, 5.0, PrimaryType::Speech, LoudnessLevel::Normal, "S1", "keep me")
            .expect("add");

        let mut broken = session.document_json().expect("json");
        broken.pop(); // drop the closing brace

        let err = session.apply_json_edit(&broken).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Document(DocumentError::Parse { .. })
        ));

        assert_eq!(session.segments().len(), 1);
        assert_eq!(session.segments()[0].transcription_data.content, "keep me");
        assert_eq!(session.speakers().len(), 1);
    }

    #[test]
    fn apply_json_with_dangling_speaker_is_accepted() {
        let mut session = annotating_session();
        let text = r#"{
            "type": {"name": "T", "version": "1"},
            "value": {
                "speakers": [],
                "segments": [{"start": 0.0, "end": 1.0, "speakerId": "ghost"}]
            }
        }"#;

        session.apply_json_edit(text).expect("permissive apply");
        assert!(session.speakers().is_empty());
        assert_eq!(session.segments()[0].speaker_id, "ghost");
    }

    #[test]
    fn export_writes_readable_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("annotated_data.json");

        let mut session = annotating_session();
        session
            .add_segment(0.0, 5.0, PrimaryType::Speech, LoudnessLevel::Normal, "S1", "hi")
            .expect("add");
        session.export(&path).expect("export");

        let text = std::fs::read_to_string(&path).expect("read back");
        let doc = AnnotationDocument::from_json(&text).expect("parse back");
        assert_eq!(doc.value.segments.len(), 1);
    }
}
