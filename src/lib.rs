// onset-core
// Offline audio onset-detection and feature-extraction pipeline.
//
// Decode or supply PCM, run it through `pipeline::process`, and get back an
// `AudioSource`: per-frame loudness, spectral novelty, detected onsets and a
// source-average tempo estimate. Nothing here touches real-time audio I/O;
// everything operates on buffers already in memory.

pub mod audio;
pub mod error;
pub mod model;
pub mod pipeline;

pub use error::{CombineError, PipelineError};
pub use model::{AudioFrame, AudioOnset, AudioSource, AudioUri};
pub use pipeline::{combine, process, process_audio_data, PipelineConfig};
