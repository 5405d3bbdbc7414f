// Spectral analysis: windowed real FFT -> magnitude -> log compression.
//
// realfft produces fft_size/2 + 1 complex bins for a real input of length
// fft_size (it does not fold Nyquist into the first/last bin). This
// implementation truncates to the first fft_size/2 bins before computing
// magnitude/log-magnitude, discarding the Nyquist bin, so that bin count
// stays consistent across log_mag, the novelty diff and the high-frequency
// ramp.

use realfft::num_complex::Complex32;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Per-frame windowed FFT -> log-magnitude computation. Allocates its FFT
/// plan and scratch buffers once and reuses them across every frame of one
/// `process()` invocation instead of reallocating per frame.
pub struct SpectralAnalyzer {
    fft: Arc<dyn RealToComplex<f32>>,
    hann: Vec<f32>,
    windowed: Vec<f32>,
    complex_scratch: Vec<Complex32>,
    bins: usize,
}

impl SpectralAnalyzer {
    /// `fft_size` must be a power of two (validated by the caller).
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let complex_scratch = fft.make_output_vec();

        SpectralAnalyzer {
            fft,
            hann: hann_window(fft_size),
            windowed: vec![0.0; fft_size],
            complex_scratch,
            bins: fft_size / 2,
        }
    }

    /// Number of magnitude bins produced per frame (`fft_size / 2`).
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Window, transform and log-compress one zero-padded analysis frame.
    /// Writes `log_mag[k] = ln(1 + |X[k]|^2)` for `k in 0..bins()` into
    /// `out`, which must already be sized to `bins()`.
    pub fn analyze_into(&mut self, analysis_samples: &[f32], out: &mut [f32]) {
        debug_assert_eq!(analysis_samples.len(), self.hann.len());
        debug_assert_eq!(out.len(), self.bins);

        for ((dst, &sample), &w) in self
            .windowed
            .iter_mut()
            .zip(analysis_samples)
            .zip(&self.hann)
        {
            *dst = sample * w;
        }

        // `process` borrows `windowed` mutably as scratch; its post-call
        // contents are unspecified, so it is fully overwritten next frame.
        self.fft
            .process(&mut self.windowed, &mut self.complex_scratch)
            .expect("fixed-size forward FFT on correctly sized buffers cannot fail");

        for (dst, bin) in out.iter_mut().zip(&self.complex_scratch[..self.bins]) {
            let mag_sq = bin.re * bin.re + bin.im * bin.im;
            *dst = (1.0 + mag_sq).ln();
        }
    }
}

/// Non-half, denormalized Hann window: `0.5 * (1 - cos(2*pi*i/n))`.
fn hann_window(n: usize) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos()))
        .collect()
}
