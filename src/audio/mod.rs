//! Audio pipeline — decode → slice → re-encode.
//!
//! # Pipeline
//!
//! ```text
//! uploaded bytes → decode_audio (symphonia, format auto-detect)
//!               → PcmBuffer (interleaved f32)
//!               ├─ AudioProperties (duration / peak / rate / channels)
//!               ├─ extract_segment → lossless WAV → transcription
//!               └─ preview_profile → mono 16 kHz WAV → playback (large files)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use audio_annotator::audio::{decode_audio, extract_segment, AudioProperties};
//!
//! let bytes = std::fs::read("recording.mp3").unwrap();
//! let pcm = decode_audio(&bytes).unwrap();
//! println!("{:.2} s", AudioProperties::of(&pcm).duration_secs);
//!
//! // Lossless clip of the first five seconds, ready for transcription.
//! let clip = extract_segment(&pcm, 0.0, 5.0).unwrap();
//! ```

pub mod decode;
pub mod extract;
pub mod preview;
pub mod properties;
pub mod resample;

#[cfg(test)]
pub(crate) mod test_support;

pub use decode::{decode_audio, AudioError, PcmBuffer};
pub use extract::{encode_wav, extract_segment, ms_from_secs, slice_range};
pub use preview::{needs_preview, preview_profile, PREVIEW_SAMPLE_RATE, PREVIEW_THRESHOLD_BYTES};
pub use properties::AudioProperties;
pub use resample::{mix_to_mono, resample};
