//! Millisecond-accurate segment slicing and the lossless WAV profile.
//!
//! Second offsets coming from the annotation UI are fractional; they are
//! converted to whole milliseconds by *truncating* `secs * 1000`, and the
//! slice is the half-open interval `[start_ms, end_ms)` on the millisecond
//! timeline.  The extracted clip therefore matches `end - start` to within
//! one millisecond.
//!
//! The lossless profile is 16-bit PCM WAV at the source sample rate and
//! channel count.  Transcription always consumes this profile, derived from
//! the original buffer — never from a preview copy.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::decode::{AudioError, PcmBuffer};

// ---------------------------------------------------------------------------
// Millisecond conversion
// ---------------------------------------------------------------------------

/// Convert fractional seconds to whole milliseconds by truncation.
///
/// ```rust
/// use audio_annotator::audio::ms_from_secs;
///
/// assert_eq!(ms_from_secs(0.0), 0);
/// assert_eq!(ms_from_secs(14.711), 14_711);
/// assert_eq!(ms_from_secs(0.0019), 1);
/// ```
pub fn ms_from_secs(secs: f64) -> u64 {
    (secs * 1000.0) as u64
}

// ---------------------------------------------------------------------------
// slice_range
// ---------------------------------------------------------------------------

/// Slice `[start_secs, end_secs)` out of a decoded buffer.
///
/// Validation: `start_secs >= 0` and `start_secs < end_secs`, otherwise
/// [`AudioError::InvalidRange`].  An end offset past the end of the audio is
/// clamped; a start offset past the end yields an empty clip rather than an
/// error, matching the permissive slicing of the annotation workflow.
pub fn slice_range(
    pcm: &PcmBuffer,
    start_secs: f64,
    end_secs: f64,
) -> Result<PcmBuffer, AudioError> {
    if start_secs < 0.0 || start_secs >= end_secs {
        return Err(AudioError::InvalidRange {
            start_secs,
            end_secs,
        });
    }

    let start_ms = ms_from_secs(start_secs);
    let end_ms = ms_from_secs(end_secs);

    let rate = pcm.sample_rate as u64;
    let frame_count = pcm.frame_count() as u64;

    let start_frame = (start_ms * rate / 1000).min(frame_count);
    let end_frame = (end_ms * rate / 1000).min(frame_count);

    let channels = pcm.channels.max(1) as usize;
    let lo = start_frame as usize * channels;
    let hi = end_frame as usize * channels;

    Ok(PcmBuffer {
        samples: pcm.samples[lo..hi].to_vec(),
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
    })
}

// ---------------------------------------------------------------------------
// WAV encoding (lossless profile)
// ---------------------------------------------------------------------------

/// Encode a decoded buffer as 16-bit PCM WAV bytes, preserving the source
/// sample rate and channel count.
pub fn encode_wav(pcm: &PcmBuffer) -> Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| AudioError::Encode(e.to_string()))?;
        for &sample in &pcm.samples {
            writer
                .write_sample(sample_to_i16(sample))
                .map_err(|e| AudioError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| AudioError::Encode(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}

/// Extract `[start_secs, end_secs)` from the original buffer and encode it in
/// the lossless profile.
///
/// This is the clip shape sent to the transcription API (`audio/wav`).
pub fn extract_segment(
    pcm: &PcmBuffer,
    start_secs: f64,
    end_secs: f64,
) -> Result<Vec<u8>, AudioError> {
    let clip = slice_range(pcm, start_secs, end_secs)?;
    encode_wav(&clip)
}

fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_buffer(rate: u32, frames: usize, channels: u16) -> PcmBuffer {
        let mut samples = Vec::with_capacity(frames * channels as usize);
        for i in 0..frames {
            for _ in 0..channels {
                samples.push((i % 100) as f32 / 200.0);
            }
        }
        PcmBuffer {
            samples,
            channels,
            sample_rate: rate,
        }
    }

    // ---- ms_from_secs ------------------------------------------------------

    #[test]
    fn ms_conversion_truncates() {
        assert_eq!(ms_from_secs(0.0), 0);
        assert_eq!(ms_from_secs(5.0), 5_000);
        assert_eq!(ms_from_secs(14.711), 14_711);
        // 1.9 ms truncates to 1 ms, never rounds to 2
        assert_eq!(ms_from_secs(0.0019), 1);
        assert_eq!(ms_from_secs(0.000_9), 0);
    }

    // ---- slice_range -------------------------------------------------------

    #[test]
    fn slice_duration_within_one_ms() {
        let pcm = ramp_buffer(8_000, 8_000, 1); // 1 s mono
        let clip = slice_range(&pcm, 0.25, 0.75).expect("slice");

        let want = 0.75 - 0.25;
        let got = clip.duration_secs();
        assert!(
            (got - want).abs() <= 0.001,
            "duration {got}s differs from {want}s by more than 1 ms"
        );
    }

    #[test]
    fn full_range_reproduces_full_duration() {
        let pcm = ramp_buffer(8_000, 8_000, 1);
        let clip = slice_range(&pcm, 0.0, pcm.duration_secs()).expect("slice");
        assert_eq!(clip.frame_count(), pcm.frame_count());
    }

    #[test]
    fn slice_is_half_open() {
        // [0 ms, 1 ms) at 8 kHz = exactly 8 frames: indices 0..8
        let pcm = ramp_buffer(8_000, 100, 1);
        let clip = slice_range(&pcm, 0.0, 0.001).expect("slice");
        assert_eq!(clip.frame_count(), 8);
        assert_eq!(clip.samples[0], pcm.samples[0]);
        assert_eq!(clip.samples[7], pcm.samples[7]);
    }

    #[test]
    fn stereo_slice_keeps_frames_aligned() {
        let pcm = ramp_buffer(8_000, 8_000, 2);
        let clip = slice_range(&pcm, 0.5, 1.0).expect("slice");
        assert_eq!(clip.channels, 2);
        assert_eq!(clip.samples.len() % 2, 0);
        assert_eq!(clip.frame_count(), 4_000);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let pcm = ramp_buffer(8_000, 8_000, 1);
        let err = slice_range(&pcm, 5.0, 2.0).unwrap_err();
        assert!(matches!(err, AudioError::InvalidRange { .. }));
    }

    #[test]
    fn negative_start_is_rejected() {
        let pcm = ramp_buffer(8_000, 8_000, 1);
        let err = slice_range(&pcm, -0.5, 2.0).unwrap_err();
        assert!(matches!(err, AudioError::InvalidRange { .. }));
    }

    #[test]
    fn end_past_duration_is_clamped() {
        let pcm = ramp_buffer(8_000, 8_000, 1); // 1 s
        let clip = slice_range(&pcm, 0.5, 99.0).expect("slice");
        assert_eq!(clip.frame_count(), 4_000);
    }

    #[test]
    fn start_past_duration_yields_empty_clip() {
        let pcm = ramp_buffer(8_000, 8_000, 1);
        let clip = slice_range(&pcm, 10.0, 11.0).expect("slice");
        assert_eq!(clip.frame_count(), 0);
    }

    // ---- encode_wav / extract_segment --------------------------------------

    #[test]
    fn encoded_wav_preserves_layout() {
        let pcm = ramp_buffer(44_100, 4_410, 2);
        let bytes = encode_wav(&pcm).expect("encode");

        let reader = hound::WavReader::new(Cursor::new(bytes)).expect("read back");
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 4_410 * 2);
    }

    #[test]
    fn extracted_segment_duration_matches() {
        let pcm = ramp_buffer(16_000, 32_000, 1); // 2 s
        let bytes = extract_segment(&pcm, 0.5, 1.5).expect("extract");

        let reader = hound::WavReader::new(Cursor::new(bytes)).expect("read back");
        let frames = reader.len() as f64 / reader.spec().channels as f64;
        let secs = frames / reader.spec().sample_rate as f64;
        assert!((secs - 1.0).abs() <= 0.001);
    }

    #[test]
    fn sample_conversion_clamps() {
        assert_eq!(sample_to_i16(2.0), i16::MAX);
        assert_eq!(sample_to_i16(-2.0), -i16::MAX);
        assert_eq!(sample_to_i16(0.0), 0);
    }
}
