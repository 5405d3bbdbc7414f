// Pipeline execution module
// Orchestrates the onset-detection pipeline: mixdown -> framing -> spectral
// analysis -> novelty -> measurement -> peak picking -> post-filters ->
// tempo -> linking/normalization -> assembly.

pub mod combine;
pub mod filters;
pub mod frames;
pub mod linking;
pub mod measurement;
pub mod mixdown;
pub mod novelty;
pub mod peaks;
pub mod spectral;
pub mod tempo;
pub mod trace;

pub use combine::combine;
pub use trace::{read_trace_file, TraceBuilder, TraceEntry, TraceError, TraceWriter};

use uuid::Uuid;

use crate::audio::AudioData;
use crate::error::PipelineError;
use crate::model::AudioSource;
use filters::HysteresisConfig;
use frames::FrameIterator;
use novelty::NoveltyTracker;
use peaks::PeakPickerConfig;
use spectral::SpectralAnalyzer;

/// Configuration for one `process()` invocation. All fields have the
/// defaults listed below.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// FFT window size in samples; must be a power of two.
    pub fft_size: usize,

    /// Adaptive-threshold multiplier for the peak picker.
    pub sensitivity: f32,

    /// Minimum time after a detected onset before another can be accepted.
    pub refractory_seconds: f64,

    /// Frames on each side of center used to compute the local mean.
    pub threshold_half_window: usize,

    /// Whether to run the hysteresis (Schmitt trigger) post-filter.
    pub apply_hysteresis: bool,
    pub hysteresis_high: f32,
    pub hysteresis_low: f32,

    /// Whether to run the minimum-gap post-filter.
    pub apply_min_hit_gap: bool,
    pub min_hit_gap_frames: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            fft_size: 2048,
            sensitivity: 1.2,
            refractory_seconds: 0.06,
            threshold_half_window: 8,
            apply_hysteresis: false,
            hysteresis_high: 0.24,
            hysteresis_low: 0.17,
            apply_min_hit_gap: true,
            min_hit_gap_frames: 2,
        }
    }
}

impl PipelineConfig {
    fn validate(&self, fps: f64, channel_count: u16) -> Result<(), PipelineError> {
        if fps <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "fps must be strictly positive, got {fps}"
            )));
        }
        if !self.fft_size.is_power_of_two() {
            return Err(PipelineError::InvalidConfig(format!(
                "fft_size must be a power of two, got {}",
                self.fft_size
            )));
        }
        if channel_count == 0 {
            return Err(PipelineError::InvalidConfig(
                "channel_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run the full onset-detection pipeline over already-decoded PCM.
///
/// `pcm` is interleaved per-channel float PCM (`channel_count` channels,
/// any finite length). Returns `InvalidConfig` for non-positive `fps`, a
/// non-power-of-two `fft_size`, or a zero channel count; an empty `pcm`
/// buffer is not an error and yields an `AudioSource` with no frames.
pub fn process(
    pcm: &[f32],
    sample_rate: u32,
    channel_count: u16,
    fps: f64,
    config: &PipelineConfig,
) -> Result<AudioSource, PipelineError> {
    process_traced(pcm, sample_rate, channel_count, fps, config, None, None)
}

/// Same as [`process`], but emits one [`TraceEntry`] per component to
/// `trace` when supplied, and tags the run with `source_uri` for the
/// resulting [`AudioSource`].
pub fn process_traced(
    pcm: &[f32],
    sample_rate: u32,
    channel_count: u16,
    fps: f64,
    config: &PipelineConfig,
    trace: Option<&TraceWriter>,
    source_uri: Option<String>,
) -> Result<AudioSource, PipelineError> {
    config.validate(fps, channel_count).map_err(|e| {
        log::error!("invalid pipeline configuration: {e}");
        e
    })?;

    log::info!(
        "processing {} samples at {} Hz, {} channel(s), fps={}",
        pcm.len(),
        sample_rate,
        channel_count,
        fps
    );

    emit(trace, "mixdown", 0.1, "reducing channels to mono");
    let mono = mixdown::to_mono(pcm, channel_count);

    let hop = frames::hop_size(sample_rate, fps);
    let frame_count = FrameIterator::frame_count(mono.len(), hop);

    emit(
        trace,
        "analysis",
        0.2,
        &format!("analyzing {frame_count} frame(s)"),
    );

    let mut analyzer = SpectralAnalyzer::new(config.fft_size);
    let mut novelty = NoveltyTracker::new(analyzer.bins());
    let mut log_mag = vec![0.0f32; analyzer.bins()];

    let mut descriptors = Vec::with_capacity(frame_count);
    let mut audio_frames = Vec::with_capacity(frame_count);

    for raw in FrameIterator::new(&mono, hop, config.fft_size) {
        analyzer.analyze_into(&raw.analysis_samples, &mut log_mag);
        let descriptor = novelty.push(&log_mag);
        descriptors.push(descriptor);

        let rms = measurement::rms(&raw.exact_samples);
        let loudness_db = measurement::loudness_db(rms);

        audio_frames.push(crate::model::AudioFrame {
            index: raw.index,
            time: raw.index as f64 * hop as f64 / sample_rate as f64,
            samples: raw.exact_samples,
            bpm: 0.0,
            rms,
            rms_normalized: 0.0,
            loudness_db,
            loudness_normalized: 0.0,
            relative_loudness_normalized: 0.0,
            onset: None,
            onsets: Vec::new(),
        });
    }

    emit(trace, "peak_picking", 0.5, "picking adaptive-threshold peaks");
    let peak_config = PeakPickerConfig {
        half_window: config.threshold_half_window,
        sensitivity: config.sensitivity,
        refractory_frames: (config.refractory_seconds * fps).round() as usize,
    };
    let mut kept = peaks::pick_peaks(&descriptors, &peak_config);

    emit(trace, "post_filters", 0.65, "applying post-filters");
    if config.apply_hysteresis {
        let hysteresis = HysteresisConfig::new(config.hysteresis_high, config.hysteresis_low);
        kept = filters::apply_hysteresis(kept, &hysteresis);
    }
    if config.apply_min_hit_gap {
        kept = filters::apply_min_gap(kept, config.min_hit_gap_frames);
    }

    emit(trace, "tempo", 0.8, "estimating tempo");
    let onset_frame_indices: Vec<usize> = kept.iter().map(|p| p.frame_index).collect();
    let average_bpm = tempo::estimate_bpm(&onset_frame_indices, fps);
    linking::stamp_bpm(&mut audio_frames, average_bpm);

    emit(trace, "normalization", 0.9, "linking onsets and normalizing");
    linking::link_and_attach(kept, &mut audio_frames);
    let summary = linking::normalize(&mut audio_frames);

    let duration = if sample_rate > 0 {
        mono.len() as f64 / sample_rate as f64
    } else {
        0.0
    };

    emit(trace, "assembly", 1.0, "pipeline complete");

    Ok(AudioSource {
        id: Uuid::new_v4(),
        sample_rate,
        duration,
        fps,
        channels: channel_count,
        frames: audio_frames,
        average_bpm,
        average_rms: summary.average_rms,
        average_loudness_db: summary.average_loudness_db,
        max_loudness_db: summary.max_loudness_db,
        average_onset_loudness: summary.average_onset_loudness,
        source_uri,
    })
}

/// Convenience wrapper that mixes down and analyzes an already-decoded
/// [`AudioData`] value (see `crate::audio::ingest`).
pub fn process_audio_data(
    audio: &AudioData,
    fps: f64,
    config: &PipelineConfig,
) -> Result<AudioSource, PipelineError> {
    process(&audio.samples, audio.sample_rate, audio.channels, fps, config)
}

fn emit(trace: Option<&TraceWriter>, stage: &str, progress: f32, message: &str) {
    log::debug!("[{stage}] {message}");
    if let Some(writer) = trace {
        let entry = TraceBuilder::stage(stage).progress(progress, message);
        if let Err(err) = writer.write(&entry) {
            log::warn!("failed to write trace entry for stage {stage}: {err}");
        }
    }
}
