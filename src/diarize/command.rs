//! External diarization engine.
//!
//! Speaker diarization runs as a separate helper process, one invocation per
//! window. The helper receives the window file plus model/device arguments
//! and prints a JSON turn list on stdout. The HuggingFace token travels via
//! the environment so it never shows up in a process listing.

use crate::config::DiarizationConfig;
use crate::diarize::diarizer::{Diarizer, SpeakerTurn};
use crate::error::{DiascribeError, Result};
use crate::segment::AudioWindow;
use serde::Deserialize;
use std::process::{Command, Stdio};

/// JSON document expected on the helper's stdout.
#[derive(Debug, Deserialize)]
struct HelperOutput {
    turns: Vec<HelperTurn>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelperTurn {
    start: f64,
    end: f64,
    speaker: String,
}

/// Diarization engine that shells out to a helper binary per window.
pub struct CommandDiarizer {
    config: DiarizationConfig,
}

impl CommandDiarizer {
    pub fn new(config: DiarizationConfig) -> Self {
        Self { config }
    }

    fn invocation_error(&self, window: &AudioWindow, message: String) -> DiascribeError {
        DiascribeError::ModelInvocation {
            stage: "diarization".to_string(),
            window: window.index,
            message,
        }
    }
}

impl Diarizer for CommandDiarizer {
    fn diarize(&self, window: &AudioWindow) -> Result<Vec<SpeakerTurn>> {
        let mut cmd = Command::new(&self.config.command);
        cmd.arg(&window.path)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--device")
            .arg(&self.config.device)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if !self.config.hf_token.is_empty() {
            cmd.env("HF_TOKEN", &self.config.hf_token);
        }

        let output = cmd.output().map_err(|e| {
            self.invocation_error(
                window,
                format!("failed to run '{}': {}", self.config.command, e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.invocation_error(
                window,
                format!("'{}' exited with {}: {}", self.config.command, output.status, stderr.trim()),
            ));
        }

        let parsed: HelperOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| self.invocation_error(window, format!("invalid helper output: {}", e)))?;

        if let Some(message) = parsed.error {
            return Err(self.invocation_error(window, message));
        }

        Ok(parsed
            .turns
            .into_iter()
            .map(|t| SpeakerTurn {
                start: t.start,
                end: t.end,
                tag: t.speaker,
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
