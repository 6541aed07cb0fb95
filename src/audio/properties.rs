//! Summary metrics of a loaded recording.
//!
//! Shown once after upload so the annotator can sanity-check the file before
//! marking segments: duration, peak loudness, sample rate, channel layout.

use crate::audio::decode::PcmBuffer;

// ---------------------------------------------------------------------------
// AudioProperties
// ---------------------------------------------------------------------------

/// Display metrics computed from a decoded buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioProperties {
    /// Total duration in fractional seconds.
    pub duration_secs: f64,
    /// Peak sample level in dBFS.  `f32::NEG_INFINITY` for digital silence.
    pub peak_dbfs: f32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

impl AudioProperties {
    /// Compute properties of a decoded buffer.
    pub fn of(pcm: &PcmBuffer) -> Self {
        let peak = pcm
            .samples
            .iter()
            .fold(0.0_f32, |acc, &s| acc.max(s.abs()));

        let peak_dbfs = if peak > 0.0 {
            20.0 * peak.log10()
        } else {
            f32::NEG_INFINITY
        };

        Self {
            duration_secs: pcm.duration_secs(),
            peak_dbfs,
            sample_rate: pcm.sample_rate,
            channels: pcm.channels,
        }
    }

    /// "Mono" / "Stereo" label as shown in the properties panel.
    pub fn channel_label(&self) -> &'static str {
        if self.channels >= 2 {
            "Stereo"
        } else {
            "Mono"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
