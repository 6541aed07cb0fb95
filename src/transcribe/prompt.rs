//! Instruction prompt for segment transcription.
//!
//! The clip sent to the API is already sliced to the marked range, so the
//! prompt pins the model's attention to `0.000 s .. duration` of the
//! *supplied* clip and defines two exact sentinel outputs:
//!
//! * [`SILENCE_SENTINEL`] — no audible speech in the clip.
//! * [`NOISE_SENTINEL`] — only background noise / music / non-speech sound.
//!
//! Anything else the model returns is treated as free-text transcript.

/// Exact token the model must return for a clip with no audible speech.
pub const SILENCE_SENTINEL: &str = "[SILENCE]";

/// Exact token the model must return for a clip with only non-speech sound.
pub const NOISE_SENTINEL: &str = "[NOISE]";

// ---------------------------------------------------------------------------
// build_segment_prompt
// ---------------------------------------------------------------------------

/// Build the transcription instruction for a clip of `duration_secs` seconds.
///
/// The duration is rendered with three decimals to match the millisecond
/// resolution of segment boundaries.
///
/// # Example
/// ```rust
/// use audio_annotator::transcribe::build_segment_prompt;
///
/// let prompt = build_segment_prompt(5.0);
/// assert!(prompt.contains("0.000 seconds to 5.000 seconds"));
/// assert!(prompt.contains("[SILENCE]"));
/// ```
pub fn build_segment_prompt(duration_secs: f64) -> String {
    format!(
        "You are an expert audio transcriptionist. Your task is to process an audio file and \
         transcribe ONLY a specific time segment.\n\
         \n\
         IMPORTANT INSTRUCTIONS:\n\
         1.  Analyze ONLY the audio content from 0.000 seconds to {duration:.3} seconds.\n\
         2.  The duration of the target segment is {duration:.3} seconds.\n\
         3.  You MUST IGNORE all audio content before 0.000 seconds and after {duration:.3} seconds.\n\
         4.  Focus exclusively on the specified time range: 0.000s - {duration:.3}s.\n\
         5.  Automatically detect the language spoken *within that specific segment*.\n\
         6.  Provide a highly accurate transcription of ONLY that time segment.\n\
         7.  If there is no audible speech in that specific time range, you MUST respond with \
         the exact text \"{silence}\".\n\
         8.  If there is only background noise, music, or non-speech sounds in that segment, \
         you MUST respond with the exact text \"{noise}\".\n\
         9.  Return ONLY the final transcribed text from the specified segment. Do not include \
         any commentary, timestamps, or introductory phrases like \"Here is the transcription:\".\n",
        duration = duration_secs,
        silence = SILENCE_SENTINEL,
        noise = NOISE_SENTINEL,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
