//! Whisper-based speech-to-text transcription.
//!
//! This module provides a Whisper implementation of the Transcriber trait using whisper-rs.
//!
//! # Feature Gate
//!
//! This module requires the `whisper` feature to be enabled and cmake to be installed.
//! To build with Whisper support:
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::defaults;
use crate::error::{DiascribeError, Result};
use crate::segment::AudioWindow;
use crate::stt::transcriber::{Transcriber, TranscriptSpan};
use std::path::PathBuf;

#[cfg(feature = "whisper")]
use crate::audio::SourceAudio;
#[cfg(feature = "whisper")]
use crate::audio::wav::resample;

#[cfg(feature = "whisper")]
use std::sync::{Mutex, Once};
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,
    /// Fixed language code for the whole run (e.g., "fr", "en")
    pub language: String,
    /// Beam width for decoding
    pub beam_size: u32,
    /// Offload inference to the GPU when the build supports it
    pub gpu: bool,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(defaults::DEFAULT_MODEL),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            beam_size: defaults::DEFAULT_BEAM_SIZE,
            gpu: true,
            threads: None,
        }
    }
}

/// Convert i16 audio samples to f32 normalized to [-1.0, 1.0]
///
/// Whisper expects audio in f32 format normalized to the range [-1.0, 1.0].
/// Input is 16-bit PCM audio where samples range from -32768 to 32767.
fn convert_audio(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&sample| sample as f32 / 32768.0)
        .collect()
}

/// Whisper-based transcriber implementation.
///
/// Uses whisper-rs for speech-to-text with per-segment timestamps.
/// The WhisperContext is wrapped in a Mutex to ensure thread safety.
///
/// # Feature Gate
///
/// This type is only available when the `whisper` feature is enabled.
#[cfg(feature = "whisper")]
pub struct WhisperTranscriber {
    context: Mutex<WhisperContext>,
    config: WhisperConfig,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

/// Whisper-based transcriber placeholder (without whisper feature).
///
/// This is a stub implementation that returns errors when used.
/// Enable the `whisper` feature to use real transcription.
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperTranscriber {
    config: WhisperConfig,
    model_name: String,
}

fn model_name_from_path(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn model_not_found(path: &std::path::Path) -> DiascribeError {
    DiascribeError::ModelLoad {
        stage: "transcription".to_string(),
        message: format!("model not found at {}", path.display()),
    }
}

#[cfg(feature = "whisper")]
impl WhisperTranscriber {
    /// Create a new Whisper transcriber.
    ///
    /// # Errors
    /// Returns `ModelLoad` if the model file doesn't exist or fails to load.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        // Install logging hooks to suppress whisper.cpp output (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(model_not_found(&config.model_path));
        }

        let model_name = model_name_from_path(&config.model_path);

        let mut context_params = WhisperContextParameters::default();
        context_params.use_gpu(config.gpu);
        // Fused attention kernels; avoids a softmax kernel that crashes on
        // recent GPU architectures with older ggml.
        context_params.flash_attn(true);
        let context = WhisperContext::new_with_params(
            config.model_path.to_str().ok_or_else(|| DiascribeError::ModelLoad {
                stage: "transcription".to_string(),
                message: "Invalid UTF-8 in model path".to_string(),
            })?,
            context_params,
        )
        .map_err(|e| DiascribeError::ModelLoad {
            stage: "transcription".to_string(),
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context: Mutex::new(context),
            config,
            model_name,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    fn invocation_error(&self, window: &AudioWindow, message: String) -> DiascribeError {
        DiascribeError::ModelInvocation {
            stage: "transcription".to_string(),
            window: window.index,
            message,
        }
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperTranscriber {
    /// Create a new Whisper transcriber (stub implementation).
    ///
    /// This returns an error indicating that the whisper feature is not enabled.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        if !config.model_path.exists() {
            return Err(model_not_found(&config.model_path));
        }

        let model_name = model_name_from_path(&config.model_path);

        Ok(Self { config, model_name })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(feature = "whisper")]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, window: &AudioWindow) -> Result<Vec<TranscriptSpan>> {
        // Decode the window file and bring it to Whisper's expected rate
        let audio = SourceAudio::load(&window.path)
            .map_err(|e| self.invocation_error(window, e.to_string()))?;
        let samples = resample(
            audio.samples(),
            audio.sample_rate(),
            defaults::WHISPER_SAMPLE_RATE,
        );
        let audio_f32 = convert_audio(&samples);

        let context = self
            .context
            .lock()
            .map_err(|e| self.invocation_error(window, format!("Failed to acquire context lock: {}", e)))?;

        let mut state = context
            .create_state()
            .map_err(|e| self.invocation_error(window, format!("Failed to create Whisper state: {}", e)))?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: self.config.beam_size as i32,
            patience: -1.0,
        });

        // Language is fixed per run; no auto-detection across windows
        params.set_language(Some(&self.config.language));

        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }

        // Disable printing to stdout/stderr
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &audio_f32)
            .map_err(|e| self.invocation_error(window, format!("Whisper inference failed: {}", e)))?;

        // Segment timestamps arrive in centiseconds
        let mut spans = Vec::new();
        for segment in state.as_iter() {
            let text = segment.to_string().trim().to_string();
            if text.is_empty() {
                continue;
            }
            spans.push(TranscriptSpan {
                start: segment.start_timestamp() as f64 / 100.0,
                end: segment.end_timestamp() as f64 / 100.0,
                text,
            });
        }

        Ok(spans)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(not(feature = "whisper"))]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, _window: &AudioWindow) -> Result<Vec<TranscriptSpan>> {
        Err(DiascribeError::ModelLoad {
            stage: "transcription".to_string(),
            message: concat!(
                "Whisper feature not enabled. This binary was built without speech recognition.\n",
                "To fix: cargo build --release (whisper is enabled by default)\n",
                "If build fails with cmake errors, install: sudo apt install cmake"
            )
            .to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_config_default() {
        let config = WhisperConfig::default();
        assert_eq!(config.model_path, PathBuf::from("models/ggml-base.bin"));
        assert_eq!(config.language, defaults::DEFAULT_LANGUAGE);
        assert_eq!(config.beam_size, 5);
        assert!(config.gpu);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_whisper_config_custom() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/custom/model.bin"),
            language: "en".to_string(),
            beam_size: 8,
            gpu: false,
            threads: Some(4),
        };
        assert_eq!(config.model_path, PathBuf::from("/custom/model.bin"));
        assert_eq!(config.language, "en");
        assert_eq!(config.beam_size, 8);
        assert!(!config.gpu);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_whisper_transcriber_new_fails_for_missing_model() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/nonexistent/model.bin"),
            ..WhisperConfig::default()
        };

        let result = WhisperTranscriber::new(config);
        assert!(result.is_err());

        match result {
            Err(DiascribeError::ModelLoad { stage, message }) => {
                assert_eq!(stage, "transcription");
                assert!(message.contains("/nonexistent/model.bin"));
            }
            _ => panic!("Expected ModelLoad error"),
        }
    }

    #[test]
    fn test_convert_audio_i16_to_f32() {
        // Test conversion of common values
        let samples = vec![0i16, 16384, -16384, 32767, -32768];
        let converted = convert_audio(&samples);

        assert_eq!(converted.len(), samples.len());
        assert_eq!(converted[0], 0.0); // 0 -> 0.0
        assert!((converted[1] - 0.5).abs() < 0.01); // 16384 -> ~0.5
        assert!((converted[2] + 0.5).abs() < 0.01); // -16384 -> ~-0.5
        assert!((converted[3] - 0.999969).abs() < 0.01); // 32767 -> ~1.0
        assert_eq!(converted[4], -1.0); // -32768 -> -1.0
    }

    #[test]
    fn test_convert_audio_empty() {
        let samples: Vec<i16> = vec![];
        let converted = convert_audio(&samples);
        assert_eq!(converted.len(), 0);
    }

    #[test]
    fn test_model_name_extraction() {
        assert_eq!(
            model_name_from_path(std::path::Path::new("models/ggml-base.bin")),
            "ggml-base"
        );
        assert_eq!(
            model_name_from_path(std::path::Path::new("/x/ggml-large-v3-q5_1.bin")),
            "ggml-large-v3-q5_1"
        );
    }

    #[test]
    fn test_whisper_transcriber_implements_transcriber_trait() {
        fn _assert_transcriber_trait_bounds<T: Transcriber>() {}
        _assert_transcriber_trait_bounds::<WhisperTranscriber>();
    }
}
