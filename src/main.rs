//! Application entry point — interactive audio annotation CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime (the transcription round trip is the only
//!    async operation; the CLI blocks on it).
//! 4. Run the metadata-entry form, then the annotation command loop, over a
//!    single [`Session`].
//!
//! The transcriber is built lazily on the first `transcribe` command so the
//! tool stays fully usable offline; a missing API key is detected at that
//! point, before any network call.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use audio_annotator::annotation::{
    AnnotatorInfo, ConventionInfo, DomainEntry, DomainInfo, DominantVariety, LanguageInfo,
    LoudnessLevel, Metadata, PrimaryType, Speaker, TypeInfo,
};
use audio_annotator::audio::AudioProperties;
use audio_annotator::config::{AppConfig, AppPaths};
use audio_annotator::session::{Session, SessionPhase};
use audio_annotator::transcribe::{GeminiTranscriber, Transcriber};

// ---------------------------------------------------------------------------
// Line input helpers
// ---------------------------------------------------------------------------

/// Prompt for one line; empty input returns `default`.
fn ask(input: &mut impl BufRead, prompt: &str, default: &str) -> String {
    if default.is_empty() {
        print!("{prompt}: ");
    } else {
        print!("{prompt} [{default}]: ");
    }
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return default.to_string();
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Metadata-entry form
// ---------------------------------------------------------------------------

/// Collect metadata and the speaker list, then move the session into the
/// annotation phase.
fn run_metadata_form(input: &mut impl BufRead, config: &AppConfig, session: &mut Session) {
    println!("== Step 1: metadata ==");

    let defaults = &config.annotation;
    let type_name = ask(input, "Task type name", &defaults.type_name);
    let type_version = ask(input, "Task type version", &defaults.type_version);
    let language = ask(input, "Language code", &defaults.language);
    let domain = ask(input, "Domain", &defaults.domain);
    let topics = ask(input, "Topic list (comma-separated)", "Banking");
    let annotator_id = ask(input, "Annotator ID", &defaults.annotator_id);
    let login_encrypted = ask(input, "Login encrypted (optional)", "");
    let master_convention = ask(input, "Master convention", &defaults.master_convention);
    let custom_addendum = ask(input, "Custom addendum (optional)", "");

    let head_count: usize = ask(input, "Number of speakers", "1").parse().unwrap_or(1).max(1);

    let mut speakers = Vec::with_capacity(head_count);
    let mut dominant_varieties = Vec::new();
    for i in 0..head_count {
        println!("-- Speaker {} --", i + 1);
        let id = Speaker::resolve_id(&ask(input, "Speaker ID (blank for auto)", ""));
        let gender = ask(input, "Gender", "Female");
        let nativity = ask(input, "Nativity", "Native");
        let role = ask(input, "Role", "Customer");
        let variety = ask(input, "Language variety (comma-separated)", "");
        let influence = ask(input, "Other language influence (comma-separated)", "");

        speakers.push(Speaker {
            speaker_id: id,
            gender,
            gender_source: "Annotator".into(),
            speaker_nativity: nativity,
            speaker_nativity_source: "Annotator".into(),
            speaker_role: role,
            speaker_role_source: "Annotator".into(),
            languages: vec![language.clone()],
        });

        if i == 0 {
            dominant_varieties.push(DominantVariety {
                language_locale: language.clone(),
                language_variety: split_csv(&variety),
                other_language_influence: split_csv(&influence),
            });
        }
    }

    let metadata = Metadata {
        type_info: TypeInfo {
            name: type_name,
            version: type_version,
        },
        language_info: LanguageInfo {
            spoken_languages: vec![language.clone()],
            speaker_dominant_varieties: dominant_varieties,
        },
        domain_info: DomainInfo {
            domain_version: "1.0".into(),
            domain_list: vec![DomainEntry {
                domain,
                topic_list: split_csv(&topics),
            }],
        },
        annotator_info: AnnotatorInfo {
            login_encrypted,
            annotator_id,
        },
        convention_info: ConventionInfo {
            master_convention_name: master_convention,
            custom_addendum,
        },
        internal_language_code: language,
    };

    match session.begin_annotation(metadata, speakers) {
        Ok(()) => println!("Metadata saved. Entering annotation.\n"),
        Err(e) => println!("error: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn print_properties(props: &AudioProperties) {
    let peak = if props.peak_dbfs.is_finite() {
        format!("{:.2} dBFS", props.peak_dbfs)
    } else {
        "-inf dBFS".into()
    };
    println!(
        "Duration {:.2} s | Peak {} | {:.1} kHz | {}",
        props.duration_secs,
        peak,
        props.sample_rate as f64 / 1000.0,
        props.channel_label()
    );
}

fn print_segments(session: &Session) {
    if session.segments().is_empty() {
        println!("no segments yet");
        return;
    }
    for (i, seg) in session.segments().iter().enumerate() {
        println!(
            "{:>2}. [{:.3} - {:.3}) {} / {} / speaker {} / \"{}\"  ({})",
            i + 1,
            seg.start,
            seg.end,
            seg.primary_type,
            seg.loudness_level,
            seg.speaker_id,
            seg.transcription_data.content,
            seg.segment_id
        );
    }
}

fn print_help() {
    println!(
        "commands:\n\
         \x20 load <path>                     load an audio file\n\
         \x20 props                           show audio properties\n\
         \x20 transcribe <start> <end>        request a transcript for the range\n\
         \x20 add <start> <end> <type> <loudness> <speaker-id>\n\
         \x20                                 add a segment (uses the pending transcript)\n\
         \x20 list                            list segments\n\
         \x20 delete <segment-id>             delete a segment\n\
         \x20 speakers                        list speakers\n\
         \x20 json                            print the annotation document\n\
         \x20 apply <path>                    apply an edited JSON document\n\
         \x20 export [path]                   write the document to disk\n\
         \x20 back                            return to the metadata step\n\
         \x20 quit                            exit"
    );
}

// ---------------------------------------------------------------------------
// Annotation command loop
// ---------------------------------------------------------------------------

struct App {
    config: AppConfig,
    session: Session,
    runtime: tokio::runtime::Runtime,
    transcriber: Option<GeminiTranscriber>,
}

impl App {
    /// Build the transcriber on first use; fails fast when no API key is
    /// configured, before any network call.
    fn ensure_transcriber(&mut self) -> Result<(), String> {
        if self.transcriber.is_none() {
            let transcriber = GeminiTranscriber::from_config(&self.config.transcriber)
                .map_err(|e| e.to_string())?;
            self.transcriber = Some(transcriber);
        }
        Ok(())
    }

    fn handle(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return true;
        };
        let args: Vec<&str> = parts.collect();

        match command {
            "load" => {
                let Some(path) = args.first() else {
                    println!("usage: load <path>");
                    return true;
                };
                match std::fs::read(path) {
                    Ok(bytes) => {
                        let name = PathBuf::from(path)
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| path.to_string());
                        match self.session.load_audio(&name, bytes) {
                            Ok(props) => print_properties(&props),
                            Err(e) => println!("error: {e}"),
                        }
                    }
                    Err(e) => println!("error: could not read {path}: {e}"),
                }
            }

            "props" => match self.session.audio() {
                Some(audio) => print_properties(&AudioProperties::of(&audio.pcm)),
                None => println!("error: no audio file loaded"),
            },

            "transcribe" => {
                let (Some(start), Some(end)) = (parse_secs(args.first()), parse_secs(args.get(1)))
                else {
                    println!("usage: transcribe <start-secs> <end-secs>");
                    return true;
                };
                if let Err(e) = self.ensure_transcriber() {
                    println!("error: {e}");
                    return true;
                }
                let App {
                    session,
                    runtime,
                    transcriber,
                    ..
                } = self;
                let transcriber: &dyn Transcriber =
                    transcriber.as_ref().expect("ensured above");

                println!("Requesting transcription for {start}s - {end}s ...");
                match runtime.block_on(session.transcribe_range(transcriber, start, end)) {
                    Ok(outcome) => {
                        println!("{}", outcome.describe());
                        if !session.pending_transcript().is_empty() {
                            println!("pending transcript: {}", session.pending_transcript());
                        }
                    }
                    Err(e) => println!("error: {e}"),
                }
            }

            "add" => {
                let (Some(start), Some(end)) = (parse_secs(args.first()), parse_secs(args.get(1)))
                else {
                    println!("usage: add <start> <end> <type> <loudness> <speaker-id>");
                    return true;
                };
                let Some(primary_type) = args.get(2).and_then(|s| PrimaryType::parse(s)) else {
                    println!("error: type must be one of Speech, Noise, Music, Silence");
                    return true;
                };
                let Some(loudness) = args.get(3).and_then(|s| LoudnessLevel::parse(s)) else {
                    println!("error: loudness must be one of Normal, Quiet, Loud");
                    return true;
                };
                let Some(speaker_id) = args.get(4) else {
                    println!("error: a speaker id is required");
                    return true;
                };

                let transcript = self.session.pending_transcript().to_string();
                match self.session.add_segment(
                    start,
                    end,
                    primary_type,
                    loudness,
                    speaker_id,
                    &transcript,
                ) {
                    Ok(segment) => println!("segment {} added", segment.segment_id),
                    Err(e) => println!("error: {e}"),
                }
            }

            "list" => print_segments(&self.session),

            "delete" => match args.first() {
                Some(id) => match self.session.delete_segment(id) {
                    Ok(()) => println!("segment deleted"),
                    Err(e) => println!("error: {e}"),
                },
                None => println!("usage: delete <segment-id>"),
            },

            "speakers" => {
                for s in self.session.speakers() {
                    println!("{} ({})", s.speaker_id, s.speaker_role);
                }
            }

            "json" => match self.session.document_json() {
                Ok(text) => println!("{text}"),
                Err(e) => println!("error: {e}"),
            },

            "apply" => match args.first() {
                Some(path) => match std::fs::read_to_string(path) {
                    Ok(text) => match self.session.apply_json_edit(&text) {
                        Ok(()) => println!("JSON changes applied"),
                        Err(e) => println!("error: {e}"),
                    },
                    Err(e) => println!("error: could not read {path}: {e}"),
                },
                None => println!("usage: apply <path>"),
            },

            "export" => {
                let path = args
                    .first()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| AppPaths::new().export_dir.join("annotated_data.json"));
                match self.session.export(&path) {
                    Ok(()) => println!("exported to {}", path.display()),
                    Err(e) => println!("error: {e}"),
                }
            }

            "back" => {
                self.session.return_to_metadata();
                println!("returned to metadata entry");
            }

            "help" => print_help(),
            "quit" | "exit" => return false,

            other => println!("unknown command: {other} (try 'help')"),
        }
        true
    }
}

fn parse_secs(arg: Option<&&str>) -> Option<f64> {
    arg.and_then(|s| s.parse::<f64>().ok())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("audio annotator starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime — the transcription request is the only async work.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let mut app = App {
        config,
        session: Session::new(),
        runtime,
        transcriber: None,
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    println!("audio annotator — type 'help' for commands\n");

    loop {
        if app.session.phase() == SessionPhase::MetadataEntry {
            let config = app.config.clone();
            run_metadata_form(&mut input, &config, &mut app.session);
            continue;
        }

        print!("annotate> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break; // EOF
        }
        if !app.handle(line.trim()) {
            break;
        }
    }

    Ok(())
}
