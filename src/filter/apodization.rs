use std::f32::consts::PI;

use crate::ApodizationMethod;

/// Per-sensor weights, broadcast over every pixel of the output grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ApodizationWeights {
    weights: Vec<f32>,
}

impl ApodizationWeights {
    #[allow(missing_docs)]
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }
}

fn periodic_cosine_window(n: usize, a0: f32) -> Vec<f32> {
    if n == 1 {
        return vec![1.];
    }
    (0..n)
        .map(|i| a0 - (1. - a0) * (2. * PI * i as f32 / n as f32).cos())
        .collect()
}

/// Builds the apodization weights for `n_sensor_elements` sensors.
///
/// Without a method every weight is 1.
pub fn apodization(
    method: Option<ApodizationMethod>,
    n_sensor_elements: usize,
) -> ApodizationWeights {
    let weights = match method {
        Some(ApodizationMethod::Hann) => periodic_cosine_window(n_sensor_elements, 0.5),
        Some(ApodizationMethod::Hamming) => periodic_cosine_window(n_sensor_elements, 0.54),
        Some(ApodizationMethod::Box) | None => vec![1.; n_sensor_elements],
    };
    ApodizationWeights { weights }
}
