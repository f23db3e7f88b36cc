use std::ops::Range;

use nalgebra::Point3;
use ndarray::{Array2, Zip};

use super::Grid;

/// Time-of-flight delays of a batch of pixels [samples].
///
/// Rows are pixels, columns sensor elements. Delays outside `[0, T)` are
/// flagged in `invalid` and clipped into the valid sample range.
#[derive(Debug)]
pub(crate) struct DelayTable {
    pub(crate) delays: Array2<f32>,
    pub(crate) invalid: Array2<bool>,
}

/// Delay between the pixel at grid indices `(x, y, z)` and a sensor [samples].
///
/// Only the lateral sensor coordinates are taken as absolute values.
pub(crate) fn delay(
    (x, y, z): (usize, usize, usize),
    sensor: &Point3<f32>,
    spacing_mm: f32,
    sos_dt: f32,
) -> f32 {
    let dy = y as f32 * spacing_mm - sensor.z;
    let dx = x as f32 * spacing_mm - sensor.x.abs();
    let dz = z as f32 * spacing_mm - sensor.y.abs();
    (dy * dy + dx * dx + dz * dz).sqrt() / sos_dt
}

impl DelayTable {
    pub(crate) fn new(
        grid: &Grid,
        sensors: &[Point3<f32>],
        sos_dt: f32,
        n_samples: usize,
        pixels: Range<usize>,
    ) -> Self {
        let shape = (pixels.len(), sensors.len());
        let mut delays = Array2::zeros(shape);
        let mut invalid = Array2::from_elem(shape, false);
        let t_max = n_samples as f32;
        Zip::indexed(delays.rows_mut())
            .and(invalid.rows_mut())
            .par_for_each(|i, mut delays, mut invalid| {
                let idx = grid.index(pixels.start + i);
                delays
                    .iter_mut()
                    .zip(invalid.iter_mut())
                    .zip(sensors.iter())
                    .for_each(|((d, m), sensor)| {
                        let v = delay(idx, sensor, grid.spacing_mm(), sos_dt);
                        *m = !(0. ..t_max).contains(&v);
                        *d = v.clamp(0., t_max - 1.);
                    });
            });
        Self { delays, invalid }
    }
}
