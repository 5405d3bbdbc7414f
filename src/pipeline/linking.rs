// Onset linking and normalization: links each kept onset to its successor,
// then normalizes RMS and loudness across the whole frame list and computes
// the source-level aggregates.

use crate::model::{AudioFrame, AudioOnset};
use crate::pipeline::measurement::LOUDNESS_FLOOR_DB;
use crate::pipeline::peaks::RawPeak;

const LOUDNESS_WINDOW_DB: f32 = 60.0;

/// Turn post-filter peaks into linked [`AudioOnset`] values and attach them
/// to their carrying frames. `frames` must already have RMS/dB populated
/// and be indexed identically to the peaks' `frame_index`.
pub fn link_and_attach(peaks: Vec<RawPeak>, frames: &mut [AudioFrame]) {
    for (i, peak) in peaks.iter().enumerate() {
        let (next_onset_frame, distance_to_next_onset) = match peaks.get(i + 1) {
            Some(next) => (next.frame_index, next.frame_index - peak.frame_index),
            None => (0, 0),
        };

        let frame = &frames[peak.frame_index];
        let onset = AudioOnset {
            timestamp: frame.time,
            frame_index: peak.frame_index,
            descriptor: peak.descriptor,
            threshold_at_detection: peak.threshold_at_detection,
            descriptor_normalized: peak.descriptor_normalized,
            rms: frame.rms,
            loudness_db: frame.loudness_db,
            loudness_normalized: clamp01((frame.loudness_db + LOUDNESS_WINDOW_DB) / LOUDNESS_WINDOW_DB),
            distance_to_next_onset,
            next_onset_frame,
        };

        let frame = &mut frames[peak.frame_index];
        frame.onsets.push(onset.clone());
        if frame.onset.is_none() {
            frame.onset = Some(onset);
        }
    }
}

/// Source-level aggregates computed alongside per-frame normalization.
#[derive(Debug, Clone, Copy)]
pub struct NormalizationSummary {
    pub average_rms: f32,
    pub average_loudness_db: f32,
    pub max_loudness_db: f32,
    pub average_onset_loudness: f32,
}

/// Normalize RMS and loudness across `frames` in place, and compute the
/// source-level aggregates from the same pass.
pub fn normalize(frames: &mut [AudioFrame]) -> NormalizationSummary {
    if frames.is_empty() {
        return NormalizationSummary {
            average_rms: 0.0,
            average_loudness_db: LOUDNESS_FLOOR_DB,
            max_loudness_db: LOUDNESS_FLOOR_DB,
            average_onset_loudness: 0.0,
        };
    }

    let max_rms = frames
        .iter()
        .map(|f| f.rms)
        .fold(0.0f32, f32::max);
    let max_loudness_db = frames
        .iter()
        .map(|f| f.loudness_db)
        .fold(LOUDNESS_FLOOR_DB, f32::max);

    let mut rms_sum = 0.0f32;
    let mut loudness_sum = 0.0f32;
    let mut onset_loudness_sum = 0.0f32;
    let mut onset_count = 0usize;

    let relative_denominator = max_loudness_db - LOUDNESS_FLOOR_DB;

    for frame in frames.iter_mut() {
        frame.rms_normalized = if max_rms > 0.0 { frame.rms / max_rms } else { 0.0 };
        frame.loudness_normalized =
            clamp01((frame.loudness_db + LOUDNESS_WINDOW_DB) / LOUDNESS_WINDOW_DB);
        frame.relative_loudness_normalized = if relative_denominator > 0.0 {
            (frame.loudness_db - LOUDNESS_FLOOR_DB) / relative_denominator
        } else {
            0.0
        };

        rms_sum += frame.rms;
        loudness_sum += frame.loudness_db;

        if frame.has_onset() {
            onset_loudness_sum += frame.loudness_db;
            onset_count += 1;
        }
    }

    NormalizationSummary {
        average_rms: rms_sum / frames.len() as f32,
        average_loudness_db: loudness_sum / frames.len() as f32,
        max_loudness_db,
        average_onset_loudness: if onset_count > 0 {
            onset_loudness_sum / onset_count as f32
        } else {
            0.0
        },
    }
}

/// Stamp the estimated tempo onto every frame.
pub fn stamp_bpm(frames: &mut [AudioFrame], bpm: f64) {
    for frame in frames {
        frame.bpm = bpm;
    }
}

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, rms: f32, loudness_db: f32) -> AudioFrame {
        AudioFrame {
            index,
            time: index as f64 * 0.01,
            samples: Vec::new(),
            bpm: 0.0,
            rms,
            rms_normalized: 0.0,
            loudness_db,
            loudness_normalized: 0.0,
            relative_loudness_normalized: 0.0,
            onset: None,
            onsets: Vec::new(),
        }
    }

    #[test]
    fn linking_sets_distance_and_next_onset_frame() {
        let mut frames: Vec<AudioFrame> =
            (0..6).map(|i| frame(i, 0.1, -20.0)).collect();
        let peaks = vec![
            RawPeak {
                frame_index: 1,
                descriptor: 1.0,
                threshold_at_detection: 0.5,
                descriptor_normalized: 1.0,
            },
            RawPeak {
                frame_index: 4,
                descriptor: 1.0,
                threshold_at_detection: 0.5,
                descriptor_normalized: 1.0,
            },
        ];

        link_and_attach(peaks, &mut frames);

        let first = frames[1].onset.as_ref().unwrap();
        assert_eq!(first.next_onset_frame, 4);
        assert_eq!(first.distance_to_next_onset, 3);

        let last = frames[4].onset.as_ref().unwrap();
        assert_eq!(last.next_onset_frame, 0);
        assert_eq!(last.distance_to_next_onset, 0);
    }

    #[test]
    fn normalize_empty_frames_pins_floor() {
        let mut frames: Vec<AudioFrame> = Vec::new();
        let summary = normalize(&mut frames);
        assert_eq!(summary.average_rms, 0.0);
        assert_eq!(summary.max_loudness_db, LOUDNESS_FLOOR_DB);
    }

    #[test]
    fn normalize_is_idempotent_given_fixed_max() {
        let mut frames = vec![frame(0, 0.5, -10.0), frame(1, 1.0, -5.0)];
        let first = normalize(&mut frames);
        let second = normalize(&mut frames);
        assert_eq!(first.max_loudness_db, second.max_loudness_db);
        assert_eq!(frames[0].rms_normalized, 0.5);
        assert_eq!(frames[1].rms_normalized, 1.0);
    }

    #[test]
    fn all_normalized_fields_are_bounded() {
        let mut frames = vec![frame(0, 0.0, LOUDNESS_FLOOR_DB), frame(1, 2.0, 6.0)];
        normalize(&mut frames);
        for f in &frames {
            assert!(f.rms_normalized >= 0.0 && f.rms_normalized <= 1.0);
            assert!(f.loudness_normalized >= 0.0 && f.loudness_normalized <= 1.0);
            assert!(f.relative_loudness_normalized >= 0.0 && f.relative_loudness_normalized <= 1.0);
        }
    }
}
