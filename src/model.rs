// Pipeline result types
// AudioSource, AudioFrame and AudioOnset are plain owned value types produced
// once by the pipeline and handed to the caller. No back-references, no
// shared mutation, no cycles: "next onset" is a scalar frame index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A detected transient event ("onset").
///
/// Invariants: `frame_index` equals the carrying [`AudioFrame::index`];
/// onsets occur in strictly increasing frame order; consecutive onsets are
/// separated by at least the configured refractory (and min-gap, if that
/// post-filter is enabled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioOnset {
    /// Timestamp in seconds from the start of the source.
    pub timestamp: f64,

    /// Index of the frame that carries this onset.
    pub frame_index: usize,

    /// Raw novelty-function value at detection.
    pub descriptor: f32,

    /// Adaptive threshold the descriptor exceeded.
    pub threshold_at_detection: f32,

    /// Descriptor rescaled into [0, 1] against the source's observed range.
    pub descriptor_normalized: f32,

    /// RMS of the carrying frame.
    pub rms: f32,

    /// Loudness (dB) of the carrying frame.
    pub loudness_db: f32,

    /// Loudness normalized by the fixed [-60, 0] dB window, clamped to [0, 1].
    pub loudness_normalized: f32,

    /// Frames until the next kept onset (0 if this is the last one).
    pub distance_to_next_onset: usize,

    /// Frame index of the next kept onset (0 if this is the last one).
    pub next_onset_frame: usize,
}

/// One analysis step: a hop-length slice of audio plus its spectral novelty
/// descriptor, loudness measurements and (usually 0-or-1) onsets.
///
/// Invariants: `index` is contiguous from 0; consecutive timestamps differ
/// by exactly `hop / sample_rate`; `rms >= 0`; `loudness_db >= -140.0`; every
/// normalized field lies in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFrame {
    /// Zero-based, contiguous frame index.
    pub index: usize,

    /// Timestamp in seconds: `index * hop / sample_rate`.
    pub time: f64,

    /// The exact (non-padded) hop-length sample slice used for RMS/dB.
    /// The FFT-sized, zero-padded analysis window is transient and not kept.
    pub samples: Vec<f32>,

    /// Copy of the source's average BPM, stamped after tempo estimation.
    pub bpm: f64,

    /// RMS of `samples`.
    pub rms: f32,

    /// RMS normalized to the source's observed `max_rms`.
    pub rms_normalized: f32,

    /// Loudness in dB (`20 * log10(rms)`, floored at -140.0).
    pub loudness_db: f32,

    /// Loudness normalized by the fixed [-60, 0] dB window, clamped to [0, 1].
    pub loudness_normalized: f32,

    /// Loudness normalized relative to the source's observed max, with a
    /// -140 dB floor as the zero point.
    pub relative_loudness_normalized: f32,

    /// The primary onset carried by this frame, if any.
    pub onset: Option<AudioOnset>,

    /// All onsets carried by this frame (usually 0 or 1 entries).
    pub onsets: Vec<AudioOnset>,
}

impl AudioFrame {
    /// True if this frame carries at least one onset.
    pub fn has_onset(&self) -> bool {
        !self.onsets.is_empty()
    }
}

/// The aggregate result of running the pipeline over one decoded PCM source.
///
/// Produced once by [`crate::pipeline::process`]; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSource {
    /// Stable identifier for this analysis run.
    pub id: Uuid,

    /// Sample rate of the original PCM, in Hz.
    pub sample_rate: u32,

    /// Total duration of the source, in seconds.
    pub duration: f64,

    /// Analysis frame rate used to produce `frames` (frames per second).
    pub fps: f64,

    /// Channel count of the original (pre-mixdown) source.
    pub channels: u16,

    /// Ordered analysis frames, one per hop.
    pub frames: Vec<AudioFrame>,

    /// Source-average BPM (0 if undeterminable).
    pub average_bpm: f64,

    /// Source-average RMS across all frames.
    pub average_rms: f32,

    /// Source-average per-frame loudness (dB) across all frames.
    pub average_loudness_db: f32,

    /// Maximum per-frame loudness (dB) observed in the source.
    pub max_loudness_db: f32,

    /// Average loudness (dB) across onset-carrying frames only (0 if none).
    pub average_onset_loudness: f32,

    /// Optional handle identifying where this source came from (file path,
    /// URI, or caller-supplied label). Not interpreted by the pipeline.
    pub source_uri: Option<String>,
}

impl AudioSource {
    /// All onsets across all frames, in frame order.
    pub fn onsets(&self) -> impl Iterator<Item = &AudioOnset> {
        self.frames.iter().flat_map(|frame| frame.onsets.iter())
    }

    /// Total number of onsets kept after post-filtering.
    pub fn onset_count(&self) -> usize {
        self.frames.iter().map(|frame| frame.onsets.len()).sum()
    }
}

/// A handle to a file produced by the companion [`crate::pipeline::combine::combine`]
/// operation. Mirrors the reference's URI-shaped return value without
/// depending on a concrete URI crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioUri(pub String);

impl AudioUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AudioUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
