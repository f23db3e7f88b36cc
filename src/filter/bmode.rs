use ndarray::{Array, Axis, Dimension, Zip};
use rustfft::{FftPlanner, num_complex::Complex};

use crate::BModeMethod;

fn analytic_weights(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| match i {
            0 => 1.,
            i if n % 2 == 0 && i == n / 2 => 1.,
            i if i < n.div_ceil(2) => 2.,
            _ => 0.,
        })
        .collect()
}

fn envelope<D: Dimension>(data: &mut Array<f32, D>, axis: Axis) {
    let n = data.len_of(axis);
    if n == 0 {
        return;
    }
    let h = analytic_weights(n);
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);
    Zip::from(data.lanes_mut(axis)).par_for_each(|mut lane| {
        let mut buffer = lane
            .iter()
            .map(|&v| Complex::new(v, 0.))
            .collect::<Vec<_>>();
        fft.process(&mut buffer);
        buffer.iter_mut().zip(h.iter()).for_each(|(b, &h)| *b *= h);
        ifft.process(&mut buffer);
        lane.iter_mut()
            .zip(buffer.iter())
            .for_each(|(v, b)| *v = b.norm() / n as f32);
    });
}

/// Applies a B-mode envelope transform.
///
/// The Hilbert transform is taken along `axis`.
pub fn b_mode<D: Dimension>(
    mut data: Array<f32, D>,
    method: BModeMethod,
    axis: Axis,
) -> Array<f32, D> {
    match method {
        BModeMethod::AbsoluteValue => data.mapv_inplace(f32::abs),
        BModeMethod::HilbertTransform => envelope(&mut data, axis),
    }
    data
}
