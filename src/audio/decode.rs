//! Container/codec auto-detecting audio decoder.
//!
//! [`decode_audio`] turns an in-memory audio file (wav, mp3, m4a, ogg, flac,
//! webm, …) into a [`PcmBuffer`] of interleaved `f32` samples.  Format
//! detection is done by content probing, never by file extension — the
//! uploaded bytes are the only input.

use std::io::Cursor;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::probe::Hint;
use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// All errors that can arise from audio decoding, slicing and encoding.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AudioError {
    /// The byte buffer could not be recognised as any supported container.
    #[error("unrecognised audio format: {0}")]
    UnknownFormat(String),

    /// The container was recognised but held no decodeable audio track.
    #[error("no supported audio track found")]
    NoAudioTrack,

    /// A packet failed to decode with the underlying codec error.
    #[error("audio decode failed: {0}")]
    Decode(String),

    /// The track does not declare a sample rate.
    #[error("could not determine sample rate")]
    UnknownSampleRate,

    /// WAV encoding failed.
    #[error("audio encode failed: {0}")]
    Encode(String),

    /// A segment range was inverted, negative or empty.
    #[error("invalid time range: start {start_secs}s, end {end_secs}s")]
    InvalidRange { start_secs: f64, end_secs: f64 },
}

// ---------------------------------------------------------------------------
// PcmBuffer
// ---------------------------------------------------------------------------

/// Decoded PCM audio: interleaved `f32` samples plus layout metadata.
///
/// `samples.len()` is always a multiple of `channels`; one *frame* is one
/// sample per channel at a single instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Number of interleaved channels (>= 1).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl PcmBuffer {
    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Duration in fractional seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Duration in whole milliseconds (truncated).
    pub fn duration_ms(&self) -> u64 {
        (self.frame_count() as u64 * 1000) / self.sample_rate as u64
    }
}

// ---------------------------------------------------------------------------
// decode_audio
// ---------------------------------------------------------------------------

/// Decode an in-memory audio file of any supported format to interleaved
/// `f32` PCM.
///
/// The first decodeable track is used.  Corrupt trailing packets after at
/// least one good frame are tolerated (the decoded prefix is returned);
/// input that yields no audio at all is an error.
pub fn decode_audio(bytes: &[u8]) -> Result<PcmBuffer, AudioError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(&Hint::new(), mss, &Default::default(), &Default::default())
        .map_err(|e| AudioError::UnknownFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AudioError::NoAudioTrack)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &Default::default())
        .map_err(|e| AudioError::Decode(e.to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(AudioError::UnknownSampleRate)?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels: u16 = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream, or trailing garbage after decoded content.
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                if samples.is_empty() {
                    return Err(AudioError::Decode(e.to_string()));
                }
                break;
            }
        };

        while !format.metadata().is_latest() {
            format.metadata().pop();
        }
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A single bad packet is skippable; a stream that never decodes
            // is not.
            Err(SymphoniaError::DecodeError(_)) if !samples.is_empty() => continue,
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        if channels == 0 {
            channels = decoded.spec().channels.count() as u16;
        }

        match decoded {
            AudioBufferRef::F32(buf) => append_interleaved_f32(&mut samples, &buf),
            AudioBufferRef::U8(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::U16(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::U24(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::U32(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::S8(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::S16(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::S24(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::S32(buf) => append_interleaved(&mut samples, &buf),
            AudioBufferRef::F64(buf) => append_interleaved(&mut samples, &buf),
        }
    }

    if samples.is_empty() || channels == 0 {
        return Err(AudioError::NoAudioTrack);
    }

    Ok(PcmBuffer {
        samples,
        channels,
        sample_rate,
    })
}

/// Interleave all channels of a typed buffer into `out`, converting to f32.
fn append_interleaved<T>(out: &mut Vec<f32>, buf: &std::borrow::Cow<AudioBuffer<T>>)
where
    T: symphonia::core::sample::Sample,
    f32: FromSample<T>,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    out.reserve(frames * channels);
    for frame in 0..frames {
        for ch in 0..channels {
            out.push(f32::from_sample(buf.chan(ch)[frame]));
        }
    }
}

fn append_interleaved_f32(out: &mut Vec<f32>, buf: &std::borrow::Cow<AudioBuffer<f32>>) {
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    out.reserve(frames * channels);
    for frame in 0..frames {
        for ch in 0..channels {
            out.push(buf.chan(ch)[frame]);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
