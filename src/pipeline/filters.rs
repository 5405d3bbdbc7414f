// Post-filters, both optional, applied in order: hysteresis (Schmitt
// trigger) first, then minimum-gap deduplication. Hysteresis runs first
// because it only looks at descriptor strength, so min-gap never has to
// dedupe an onset that would have been rejected by the loudness gate anyway.

use crate::pipeline::peaks::RawPeak;

#[derive(Debug, Clone)]
pub struct HysteresisConfig {
    pub high: f32,
    pub low: f32,
}

impl HysteresisConfig {
    /// Clamp so `high >= low + 0.01`, per spec.
    pub fn new(high: f32, low: f32) -> Self {
        let high = high.max(low + 0.01);
        HysteresisConfig { high, low }
    }
}

/// Schmitt-trigger gate over kept onsets, ordered by time/frame index.
pub fn apply_hysteresis(peaks: Vec<RawPeak>, config: &HysteresisConfig) -> Vec<RawPeak> {
    let mut kept = Vec::with_capacity(peaks.len());
    let mut gate_open = false;

    for peak in peaks {
        let n = peak.descriptor_normalized;
        if gate_open {
            if n < config.low {
                gate_open = false;
                continue;
            }
            kept.push(peak);
        } else if n >= config.high {
            gate_open = true;
            kept.push(peak);
        }
    }

    kept
}

/// Deduplicate onsets closer together than `min_hit_gap_frames`, keeping the
/// stronger (higher `descriptor_normalized`) candidate of each close pair.
pub fn apply_min_gap(peaks: Vec<RawPeak>, min_hit_gap_frames: usize) -> Vec<RawPeak> {
    if min_hit_gap_frames == 0 {
        return peaks;
    }

    let mut kept: Vec<RawPeak> = Vec::with_capacity(peaks.len());

    for peak in peaks {
        match kept.last() {
            Some(last) if peak.frame_index - last.frame_index < min_hit_gap_frames => {
                if peak.descriptor_normalized > last.descriptor_normalized {
                    *kept.last_mut().unwrap() = peak;
                }
                // else: drop the current candidate, keep the stronger one.
            }
            _ => kept.push(peak),
        }
    }

    kept
}
