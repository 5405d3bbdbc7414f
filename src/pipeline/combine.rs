// Concatenates several WAV files of identical format into one, sample-exact,
// and returns a handle to the written file. A companion to the core pipeline
// rather than part of it: nothing here feeds back into `process`.

use std::path::{Path, PathBuf};

use hound::{WavSpec, WavWriter};

use crate::audio::ingest::ingest_wav_file;
use crate::error::CombineError;
use crate::model::AudioUri;

/// Concatenate `paths` (read in order) into one WAV file written next to the
/// first input, returning an [`AudioUri`] for the combined file.
///
/// All inputs must share sample rate and channel count; the first mismatch
/// is reported as `CombineError::MismatchedFormat` and no output file is
/// written. `fps` is accepted for signature symmetry with the core pipeline
/// but does not affect the combined audio.
pub fn combine(paths: &[impl AsRef<Path>], _fps: f64) -> Result<AudioUri, CombineError> {
    if paths.is_empty() {
        log::error!("combine called with no input paths");
        return Err(CombineError::NoInputs);
    }

    let mut decoded = Vec::with_capacity(paths.len());
    let mut expected_sample_rate = 0u32;
    let mut expected_channels = 0u16;

    for (i, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let audio = ingest_wav_file(path).map_err(|source| {
            let err = CombineError::DecodeFailed {
                path: path.display().to_string(),
                source,
            };
            log::error!("{err}");
            err
        })?;

        if i == 0 {
            expected_sample_rate = audio.sample_rate;
            expected_channels = audio.channels;
        } else if audio.sample_rate != expected_sample_rate || audio.channels != expected_channels
        {
            let err = CombineError::MismatchedFormat {
                path: path.display().to_string(),
                expected_sample_rate,
                expected_channels,
                actual_sample_rate: audio.sample_rate,
                actual_channels: audio.channels,
            };
            log::error!("{err}");
            return Err(err);
        }

        decoded.push(audio);
    }

    let output_path = combined_output_path(paths[0].as_ref());
    let spec = WavSpec {
        channels: expected_channels,
        sample_rate: expected_sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(&output_path, spec).map_err(|e| {
        log::error!("failed to create output WAV {}: {e}", output_path.display());
        CombineError::from(e)
    })?;
    for audio in &decoded {
        for &sample in &audio.samples {
            writer.write_sample(sample).map_err(|e| {
                log::error!("failed to write sample to {}: {e}", output_path.display());
                CombineError::from(e)
            })?;
        }
    }
    writer.finalize().map_err(|e| {
        log::error!("failed to finalize output WAV {}: {e}", output_path.display());
        CombineError::from(e)
    })?;

    Ok(AudioUri(output_path.display().to_string()))
}

fn combined_output_path(first: &Path) -> PathBuf {
    let stem = first
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("combined");
    first.with_file_name(format!("{stem}.combined.wav"))
}
