// Pipeline error surface
// Configuration validation and convenience-decoder failures only; the core
// algorithm itself never fails once its configuration has been validated.

use thiserror::Error;

use crate::audio::AudioError;

/// Errors returned by [`crate::pipeline::process`] and friends.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The caller-supplied configuration (or PCM buffer) cannot be analyzed.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// Only produced by the convenience entry points that bundle decoding.
    #[error("failed to decode audio: {0}")]
    DecodeFailed(#[from] AudioError),
}

/// Errors returned by the companion [`crate::pipeline::combine::combine`] operation.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("failed to decode input {path}: {source}")]
    DecodeFailed { path: String, source: AudioError },

    #[error(
        "mismatched format: expected {expected_sample_rate} Hz / {expected_channels}ch, \
         got {actual_sample_rate} Hz / {actual_channels}ch in {path}"
    )]
    MismatchedFormat {
        path: String,
        expected_sample_rate: u32,
        expected_channels: u16,
        actual_sample_rate: u32,
        actual_channels: u16,
    },

    #[error("no input files supplied")]
    NoInputs,

    #[error("failed to write output WAV: {0}")]
    WriteFailed(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
