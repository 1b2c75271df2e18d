use anyhow::Result;
use clap::{CommandFactory, Parser};
use diascribe::cli::{Cli, Commands, ConfigAction};
use diascribe::config::Config;
use diascribe::diarize::CommandDiarizer;
use diascribe::pipeline::{RunOptions, run_pipeline};
use diascribe::stt::{WhisperConfig, WhisperTranscriber};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let Some(audio) = cli.audio else {
                Cli::command().print_help()?;
                std::process::exit(2);
            };
            run_transcription(
                audio,
                cli.config,
                cli.window,
                cli.model,
                cli.language,
                cli.beam_size,
                cli.output,
                cli.keep_segments,
                cli.quiet,
            )
            .await?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(&action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "diascribe",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Run the transcription pipeline for one recording.
///
/// # Arguments
/// * `audio` - Path to the source recording
/// * `config_path` - Optional config file override from CLI
/// * `window` / `model` / `language` / `beam_size` - Optional CLI overrides
/// * `output` - Optional transcript destination override
/// * `keep_segments` - Leave window files on disk after the run
/// * `quiet` - Suppress status messages
#[allow(clippy::too_many_arguments)]
async fn run_transcription(
    audio: PathBuf,
    config_path: Option<PathBuf>,
    window: Option<u32>,
    model: Option<String>,
    language: Option<String>,
    beam_size: Option<u32>,
    output: Option<PathBuf>,
    keep_segments: bool,
    quiet: bool,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;

    // Apply CLI overrides
    if let Some(w) = window {
        config.segmenter.window_seconds = w;
    }
    if let Some(m) = model {
        config.stt.model = m;
    }
    if let Some(l) = language {
        config.stt.language = l;
    }
    if let Some(b) = beam_size {
        config.stt.beam_size = b;
    }
    config.validate()?;

    // Load the model ONCE before windowing (this is the slow part)
    if !quiet {
        eprintln!("Compute backend: {}", diascribe::defaults::gpu_backend());
        eprintln!("Loading transcription model '{}'...", config.stt.model);
    }
    let transcriber = WhisperTranscriber::new(WhisperConfig {
        model_path: PathBuf::from(&config.stt.model),
        language: config.stt.language.clone(),
        beam_size: config.stt.beam_size,
        gpu: config.stt.gpu,
        threads: config.stt.threads,
    })?;
    let diarizer = CommandDiarizer::new(config.diarization.clone());
    if !quiet {
        eprintln!("Models ready.");
    }

    // Ctrl-C requests cooperative cancellation; cleanup still runs
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nCancelling after the current window...");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let options = RunOptions {
        window_seconds: config.segmenter.window_seconds,
        output,
        keep_segments,
        quiet,
    };

    let transcript = run_pipeline(&audio, &diarizer, &transcriber, &options, &cancel)?;

    if !quiet {
        eprintln!(
            "{} Transcript saved to {}",
            "Done.".green(),
            transcript.display()
        );
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/diascribe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// Handle `config show` and `config init`.
fn handle_config_command(action: &ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            let path = custom_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);

            if path.exists() {
                eprintln!("Configuration already exists at {}", path.display());
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, toml::to_string_pretty(&Config::default())?)?;
            eprintln!("{} Wrote {}", "Created.".green(), path.display());
        }
    }

    Ok(())
}
