// Audio ingestion module
// WAV decoding convenience so the pipeline can be exercised without an
// external decoder. Out of the invariant-bearing core: failures here surface
// as PipelineError::DecodeFailed, never as a core-pipeline error.

pub mod ingest;

pub use ingest::{ingest_wav, ingest_wav_file, AudioData, AudioError};
