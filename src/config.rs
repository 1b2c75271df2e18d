use crate::defaults;
use crate::error::{DiascribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterConfig,
    pub diarization: DiarizationConfig,
    pub stt: SttConfig,
}

/// Audio windowing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterConfig {
    pub window_seconds: u32,
}

/// Speaker diarization configuration.
///
/// The diarization capability runs as an external helper process; `command`
/// names the binary, `model` and `device` are forwarded to it, and the
/// HuggingFace token is handed over through the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiarizationConfig {
    pub command: String,
    pub model: String,
    pub device: String,
    pub hf_token: String,
}

/// Speech-to-text configuration.
///
/// `model` is a path to a ggml model file; quantized variants (q5_1, q8_0)
/// double as the numeric precision profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model: String,
    pub language: String,
    pub beam_size: u32,
    pub gpu: bool,
    pub threads: Option<usize>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            window_seconds: defaults::WINDOW_SECONDS,
        }
    }
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            command: defaults::DEFAULT_DIARIZE_COMMAND.to_string(),
            model: defaults::DEFAULT_DIARIZE_MODEL.to_string(),
            device: "auto".to_string(),
            hf_token: String::new(),
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            beam_size: defaults::DEFAULT_BEAM_SIZE,
            gpu: true,
            threads: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Only returns defaults if the file is missing; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(DiascribeError::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - DIASCRIBE_MODEL → stt.model
    /// - DIASCRIBE_LANGUAGE → stt.language
    /// - DIASCRIBE_HF_TOKEN → diarization.hf_token
    /// - DIASCRIBE_DIARIZE_COMMAND → diarization.command
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("DIASCRIBE_MODEL")
            && !model.is_empty()
        {
            self.stt.model = model;
        }

        if let Ok(language) = std::env::var("DIASCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.stt.language = language;
        }

        if let Ok(token) = std::env::var("DIASCRIBE_HF_TOKEN")
            && !token.is_empty()
        {
            self.diarization.hf_token = token;
        }

        if let Ok(command) = std::env::var("DIASCRIBE_DIARIZE_COMMAND")
            && !command.is_empty()
        {
            self.diarization.command = command;
        }

        self
    }

    /// Validate configuration values that the pipeline depends on.
    pub fn validate(&self) -> Result<()> {
        if self.segmenter.window_seconds == 0 {
            return Err(DiascribeError::ConfigInvalidValue {
                key: "segmenter.window_seconds".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.stt.beam_size == 0 {
            return Err(DiascribeError::ConfigInvalidValue {
                key: "stt.beam_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/diascribe/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("diascribe")
            .join("config.toml")
    }
}
