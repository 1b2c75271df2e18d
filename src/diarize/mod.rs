//! Speaker diarization: who spoke when, per window.

pub mod command;
pub mod diarizer;

pub use command::CommandDiarizer;
pub use diarizer::{Diarizer, MockDiarizer, SpeakerTurn};
