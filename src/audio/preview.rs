//! Lightweight preview profile.
//!
//! Large uploads make interactive playback sluggish, so when the original
//! file exceeds [`needs_preview`]'s threshold the player is fed a reduced
//! rendition instead: **mono, fixed reduced sample rate, 16-bit PCM**.
//!
//! The preview is strictly an optimisation of the playback path.  It is a
//! pure function of the original buffer — re-running it on the same bytes
//! yields a preview with identical duration and layout metadata — and it is
//! never a substitute for the lossless profile used in transcription.

use crate::audio::decode::{AudioError, PcmBuffer};
use crate::audio::extract::encode_wav;
use crate::audio::resample::{mix_to_mono, resample};

/// Default preview sample rate in Hz.
pub const PREVIEW_SAMPLE_RATE: u32 = 16_000;

/// Default original-size threshold above which the preview profile is used.
pub const PREVIEW_THRESHOLD_BYTES: u64 = 25 * 1024 * 1024;

// ---------------------------------------------------------------------------
// needs_preview
// ---------------------------------------------------------------------------

/// Returns `true` when an original file of `original_bytes` length should be
/// played back through the preview profile.
pub fn needs_preview(original_bytes: u64, threshold_bytes: u64) -> bool {
    original_bytes > threshold_bytes
}

// ---------------------------------------------------------------------------
// preview_profile
// ---------------------------------------------------------------------------

/// Convert a decoded buffer into preview-profile WAV bytes: mono at
/// `target_rate` Hz, 16-bit PCM.
///
/// The declared channel count and sample rate of the output always match the
/// target exactly, regardless of the source layout; the duration matches the
/// source to within resampling rounding.
pub fn preview_profile(pcm: &PcmBuffer, target_rate: u32) -> Result<Vec<u8>, AudioError> {
    let mono = mix_to_mono(&pcm.samples, pcm.channels);
    let resampled = resample(&mono, pcm.sample_rate, target_rate);

    encode_wav(&PcmBuffer {
        samples: resampled,
        channels: 1,
        sample_rate: target_rate,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stereo_48k_buffer(frames: usize) -> PcmBuffer {
        let mut samples = Vec::with_capacity(frames * 2);
        for i in 0..frames {
            let s = ((i % 50) as f32 / 100.0) - 0.25;
            samples.push(s);
            samples.push(-s);
        }
        PcmBuffer {
            samples,
            channels: 2,
            sample_rate: 48_000,
        }
    }

    #[test]
    fn preview_is_mono_at_target_rate() {
        let pcm = stereo_48k_buffer(48_000); // 1 s stereo @ 48 kHz
        let bytes = preview_profile(&pcm, PREVIEW_SAMPLE_RATE).expect("preview");

        let reader = hound::WavReader::new(Cursor::new(bytes)).expect("read back");
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, PREVIEW_SAMPLE_RATE);
    }

    #[test]
    fn preview_duration_matches_source() {
        let pcm = stereo_48k_buffer(96_000); // 2 s
        let bytes = preview_profile(&pcm, PREVIEW_SAMPLE_RATE).expect("preview");

        let reader = hound::WavReader::new(Cursor::new(bytes)).expect("read back");
        let secs = reader.len() as f64 / reader.spec().sample_rate as f64;
        assert!(
            (secs - 2.0).abs() < 0.001,
            "preview duration {secs}s drifted from 2 s"
        );
    }

    #[test]
    fn preview_of_mono_low_rate_input_still_reports_target_layout() {
        let pcm = PcmBuffer {
            samples: vec![0.1_f32; 8_000],
            channels: 1,
            sample_rate: 8_000,
        };
        let bytes = preview_profile(&pcm, PREVIEW_SAMPLE_RATE).expect("preview");

        let reader = hound::WavReader::new(Cursor::new(bytes)).expect("read back");
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, PREVIEW_SAMPLE_RATE);
    }

    #[test]
    fn preview_is_idempotent_on_identical_input() {
        let pcm = stereo_48k_buffer(4_800);
        let a = preview_profile(&pcm, PREVIEW_SAMPLE_RATE).expect("first");
        let b = preview_profile(&pcm, PREVIEW_SAMPLE_RATE).expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        assert!(!needs_preview(PREVIEW_THRESHOLD_BYTES, PREVIEW_THRESHOLD_BYTES));
        assert!(needs_preview(
            PREVIEW_THRESHOLD_BYTES + 1,
            PREVIEW_THRESHOLD_BYTES
        ));
        assert!(!needs_preview(1_024, PREVIEW_THRESHOLD_BYTES));
    }
}
