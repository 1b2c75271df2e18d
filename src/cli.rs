//! Command-line interface for diascribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Speaker-attributed transcription for long recordings
#[derive(Parser, Debug)]
#[command(
    name = "diascribe",
    version = crate::version_string(),
    about = "Speaker-attributed transcription for long recordings"
)]
pub struct Cli {
    /// Path to the audio recording (WAV)
    #[arg(value_name = "AUDIO")]
    pub audio: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Window length (default: 30s). Examples: 45s, 2m, 90
    #[arg(long, short = 'w', value_name = "DURATION", value_parser = parse_window_secs)]
    pub window: Option<u32>,

    /// Whisper model path (default: models/ggml-base.bin)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Language code for transcription (default: fr)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Beam width for transcription decoding (default: 5)
    #[arg(long, value_name = "N")]
    pub beam_size: Option<u32>,

    /// Transcript destination (default: transcriptions.txt beside the source)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Leave window files on disk after the run
    #[arg(long)]
    pub keep_segments: bool,
}

/// Parse a window duration string into whole seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`, `2m30s`).
fn parse_window_secs(s: &str) -> Result<u32, String> {
    let s = s.trim();
    // Bare number → seconds
    let secs = if let Ok(secs) = s.parse::<u64>() {
        secs
    } else {
        humantime::parse_duration(s)
            .map(|d| d.as_secs())
            .map_err(|e| e.to_string())?
    };

    if secs == 0 {
        return Err("window must be positive".to_string());
    }
    u32::try_from(secs).map_err(|_| "window too large".to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,

    /// Write a default configuration file
    Init,
}
