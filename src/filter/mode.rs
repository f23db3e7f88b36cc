use ndarray::{Array2, Axis, Zip};

use crate::ReconstructionMode;

/// Converts the time series into the signal the beamformer sums up.
pub fn reconstruction_mode_transformation(
    data: Array2<f32>,
    mode: ReconstructionMode,
) -> Array2<f32> {
    match mode {
        ReconstructionMode::Pressure => data,
        ReconstructionMode::Differential => {
            let mut output = Array2::zeros(data.raw_dim());
            Zip::from(output.lanes_mut(Axis(1)))
                .and(data.lanes(Axis(1)))
                .par_for_each(|mut dst, src| {
                    src.windows(2)
                        .into_iter()
                        .zip(dst.iter_mut())
                        .enumerate()
                        .for_each(|(t, (w, d))| *d = (w[1] - w[0]) * (t + 1) as f32);
                });
            output
        }
    }
}
