//! Shared WAV fixtures for audio tests.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Encode `frames` of a mono sine wave at `rate` Hz into WAV bytes.
pub fn sine_wav_bytes(rate: u32, frames: usize, freq_hz: f32) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).expect("writer");
        for i in 0..frames {
            let t = i as f32 / rate as f32;
            let s = (2.0 * std::f32::consts::PI * freq_hz * t).sin() * 0.5;
            writer
                .write_sample((s * i16::MAX as f32) as i16)
                .expect("sample");
        }
        writer.finalize().expect("finalize");
    }
    cursor.into_inner()
}

/// Encode `frames` of a two-channel ramp at `rate` Hz into WAV bytes.
pub fn stereo_wav_bytes(rate: u32, frames: usize) -> Vec<u8> {
    let spec = WavSpec {
        channels: 2,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).expect("writer");
        for i in 0..frames {
            let s = ((i % 256) as i32 - 128) as i16 * 100;
            writer.write_sample(s).expect("left");
            writer.write_sample(-s).expect("right");
        }
        writer.finalize().expect("finalize");
    }
    cursor.into_inner()
}
