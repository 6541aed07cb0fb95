//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared freely.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable consulted when `TranscriberConfig::api_key` is unset.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// TranscriberConfig
// ---------------------------------------------------------------------------

/// Settings for the Gemini transcription endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Base URL of the API endpoint.
    pub base_url: String,
    /// API key — `None` means read the `GEMINI_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Model identifier used in the request path.
    pub model: String,
    /// Maximum seconds to wait for a transcription response before timing out.
    pub timeout_secs: u64,
    /// Sampling temperature (0.0 – 1.0).  Kept low so repeated requests on
    /// identical audio tend toward the same transcript.
    pub temperature: f32,
    /// Upper bound on generated tokens per response.
    pub max_output_tokens: u32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-1.5-flash-latest".into(),
            timeout_secs: 120,
            temperature: 0.1,
            max_output_tokens: 2000,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

impl TranscriberConfig {
    /// Resolve the API key: the explicit settings value wins, otherwise the
    /// `GEMINI_API_KEY` environment variable.  Empty strings count as unset.
    ///
    /// Returns `None` when no key is configured anywhere — callers must treat
    /// that as a hard failure *before* issuing any network call.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref() {
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
        std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for audio decoding and the preview profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate of the lightweight preview profile in Hz.
    pub preview_sample_rate: u32,
    /// Original-file size in bytes above which the preview profile is used
    /// for playback instead of the original buffer.
    pub preview_threshold_bytes: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            preview_sample_rate: 16_000,
            preview_threshold_bytes: 25 * 1024 * 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// AnnotationDefaults
// ---------------------------------------------------------------------------

/// Pre-filled values for the metadata-entry step.
///
/// These only seed the interactive form; the values actually annotated are
/// whatever the user confirms when the session leaves metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDefaults {
    /// Task type name written into the document envelope.
    pub type_name: String,
    /// Task type version written into the document envelope.
    pub type_version: String,
    /// Default language code for the recording and new segments.
    pub language: String,
    /// Default domain name.
    pub domain: String,
    /// Default master convention name.
    pub master_convention: String,
    /// Default annotator identifier.
    pub annotator_id: String,
}

impl Default for AnnotationDefaults {
    fn default() -> Self {
        Self {
            type_name: "MULTI_SPEAKER_LONG_FORM_TRANSCRIPTION".into(),
            type_version: "3.1".into(),
            language: "en_US".into(),
            domain: "Call-center".into(),
            master_convention: "awsTranscriptionGuidelines_en_US_3.1".into(),
            annotator_id: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use audio_annotator::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Transcription endpoint settings.
    pub transcriber: TranscriberConfig,
    /// Audio decoding / preview settings.
    pub audio: AudioConfig,
    /// Metadata-form defaults.
    pub annotation: AnnotationDefaults,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
