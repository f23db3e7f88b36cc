use indicatif::ProgressBar;
use ndarray::{ArrayView1, Zip};

use super::{Contribution, KernelInput, delay::DelayTable};

#[derive(Debug)]
pub(crate) struct Cpu<'a> {
    input: KernelInput<'a>,
    pixels_per_batch: usize,
}

impl<'a> Cpu<'a> {
    pub(crate) fn new(input: KernelInput<'a>, pixels_per_batch: usize) -> Self {
        Self {
            input,
            pixels_per_batch: pixels_per_batch.max(1),
        }
    }

    pub(crate) fn num_batches(&self) -> usize {
        self.input.grid.num_pixels().div_ceil(self.pixels_per_batch)
    }

    /// Linearly interpolated, apodized contributions of every sensor to one pixel.
    fn accumulate(&self, delays: ArrayView1<f32>, invalid: ArrayView1<bool>) -> Contribution {
        let t_max = self.input.signal.ncols() - 1;
        itertools::izip!(
            delays.iter(),
            invalid.iter(),
            self.input.signal.rows(),
            self.input.weights.iter()
        )
        .filter(|&(_, &invalid, _, _)| !invalid)
        .map(|(&d, _, signal, &w)| {
            let lower = d.floor() as usize;
            let upper = (lower + 1).min(t_max);
            (signal[lower] * (upper as f32 - d) + signal[upper] * (d - lower as f32)) * w
        })
        .filter(|&v| v != 0.)
        .fold(Contribution::default(), |acc, v| Contribution {
            sum: acc.sum + v,
            count: acc.count + 1,
        })
    }

    pub(crate) fn compute(&self, pb: &ProgressBar) -> Vec<Contribution> {
        let grid = self.input.grid;
        let num_pixels = grid.num_pixels();
        let mut dst = vec![Contribution::default(); num_pixels];
        dst.chunks_mut(self.pixels_per_batch)
            .enumerate()
            .for_each(|(i, dst)| {
                let start = i * self.pixels_per_batch;
                let pixels = start..start + dst.len();
                tracing::debug!("Computing pixels {:?} of {}", pixels, num_pixels);
                let table = DelayTable::new(
                    grid,
                    self.input.sensors,
                    self.input.sos_dt,
                    self.input.signal.ncols(),
                    pixels,
                );
                Zip::from(dst)
                    .and(table.delays.rows())
                    .and(table.invalid.rows())
                    .par_for_each(|dst, delays, invalid| *dst = self.accumulate(delays, invalid));
                pb.inc(1);
            });
        dst
    }
}
