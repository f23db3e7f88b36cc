use ndarray::{Array2, ArrayView2, Zip};
use rustfft::{FftPlanner, num_complex::Complex};

use crate::BandpassParameters;

/// Sample frequencies of a discrete Fourier transform of length `n` with sample spacing `d`.
///
/// Non-negative frequencies come first, followed by the negative ones in increasing order.
pub fn fft_frequencies(n: usize, d: f64) -> Vec<f64> {
    let num_non_negative = n.saturating_sub(1) / 2 + 1;
    (0..n)
        .map(|i| {
            let k = if i < num_non_negative {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k / (n as f64 * d)
        })
        .collect()
}

/// Symmetric Tukey window of length `m`.
///
/// `alpha` is the fraction of the window inside the cosine tapers.
/// `alpha <= 0` is a rectangular window and `alpha >= 1` a Hann window.
pub fn tukey(m: usize, alpha: f64) -> Vec<f64> {
    if m <= 1 || alpha <= 0. {
        return vec![1.; m];
    }
    let last = (m - 1) as f64;
    if alpha >= 1. {
        return (0..m)
            .map(|n| 0.5 - 0.5 * (2. * std::f64::consts::PI * n as f64 / last).cos())
            .collect();
    }
    let width = (alpha * last / 2.).floor() as usize;
    (0..m)
        .map(|n| {
            let x = n as f64;
            if n <= width {
                0.5 * (1. + (std::f64::consts::PI * (-1. + 2. * x / alpha / last)).cos())
            } else if n < m - width - 1 {
                1.
            } else {
                0.5 * (1.
                    + (std::f64::consts::PI * (-2. / alpha + 1. + 2. * x / alpha / last)).cos())
            }
        })
        .collect()
}

fn nearest_bin(frequencies: &[f64], target: f64) -> usize {
    frequencies
        .iter()
        .map(|f| (f - target).abs())
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Bandpass filters every sensor row in the frequency domain.
///
/// The pass band spans the bins nearest to the high-pass and the low-pass
/// cutoff and is shaped by a Tukey window. Only non-negative frequencies pass,
/// so the result is the magnitude of the filtered analytic signal.
pub fn bandpass_filtering(
    data: ArrayView2<f32>,
    time_spacing_in_ms: f32,
    params: &BandpassParameters,
) -> Array2<f32> {
    let n = data.ncols();
    let frequencies = fft_frequencies(n, time_spacing_in_ms as f64 / 1000.);
    let small_index = nearest_bin(&frequencies, params.cutoff_highpass as f64);
    let large_index = nearest_bin(&frequencies, params.cutoff_lowpass as f64);

    let mut window = vec![0.0f32; n];
    if large_index > small_index {
        window[small_index..large_index]
            .iter_mut()
            .zip(tukey(large_index - small_index, params.tukey_alpha as f64))
            .for_each(|(w, t)| *w = t as f32);
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut output = Array2::zeros(data.raw_dim());
    Zip::from(output.rows_mut())
        .and(data.rows())
        .par_for_each(|mut dst, src| {
            let mut buffer = src
                .iter()
                .map(|&v| Complex::new(v, 0.))
                .collect::<Vec<_>>();
            fft.process(&mut buffer);
            buffer
                .iter_mut()
                .zip(window.iter())
                .for_each(|(b, &w)| *b *= w);
            ifft.process(&mut buffer);
            dst.iter_mut()
                .zip(buffer.iter())
                .for_each(|(d, b)| *d = b.norm() / n as f32);
        });
    output
}
