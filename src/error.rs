//! Error types for diascribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiascribeError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Source audio errors
    #[error("Audio file not found: {path}")]
    SourceMissing { path: String },

    #[error("Failed to decode audio: {message}")]
    SourceUnreadable { message: String },

    // External model errors
    #[error("Failed to load {stage} model: {message}")]
    ModelLoad { stage: String, message: String },

    #[error("{stage} failed on window {window}: {message}")]
    ModelInvocation {
        stage: String,
        window: usize,
        message: String,
    },

    // Artifact errors
    #[error("Storage error at {path}: {message}")]
    Storage { path: String, message: String },

    // Cooperative cancellation (Ctrl-C)
    #[error("Run cancelled")]
    Cancelled,

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DiascribeError>;

impl DiascribeError {
    /// Build a `Storage` error from a path and an underlying cause.
    pub fn storage(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        DiascribeError::Storage {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_source_missing_display() {
        let error = DiascribeError::SourceMissing {
            path: "/tmp/meeting.wav".to_string(),
        };
        assert_eq!(error.to_string(), "Audio file not found: /tmp/meeting.wav");
    }

    #[test]
    fn test_source_unreadable_display() {
        let error = DiascribeError::SourceUnreadable {
            message: "not a WAV file".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to decode audio: not a WAV file");
    }

    #[test]
    fn test_model_invocation_display_includes_stage_and_window() {
        let error = DiascribeError::ModelInvocation {
            stage: "diarization".to_string(),
            window: 3,
            message: "process exited with status 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "diarization failed on window 3: process exited with status 1"
        );
    }

    #[test]
    fn test_model_load_display() {
        let error = DiascribeError::ModelLoad {
            stage: "transcription".to_string(),
            message: "model not found at models/ggml-base.bin".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load transcription model: model not found at models/ggml-base.bin"
        );
    }

    #[test]
    fn test_storage_helper_carries_path_and_cause() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = DiascribeError::storage(Path::new("/out/transcriptions.txt"), io_error);
        assert_eq!(
            error.to_string(),
            "Storage error at /out/transcriptions.txt: access denied"
        );
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(DiascribeError::Cancelled.to_string(), "Run cancelled");
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = DiascribeError::ConfigInvalidValue {
            key: "segmenter.window_seconds".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for segmenter.window_seconds: must be positive"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: DiascribeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: DiascribeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: DiascribeError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<DiascribeError>();
        assert_sync::<DiascribeError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(DiascribeError::Cancelled)
        }
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_debug_format() {
        let error = DiascribeError::SourceMissing {
            path: "/test/path".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("SourceMissing"));
        assert!(debug_str.contains("/test/path"));
    }
}
