use getset::CopyGetters;

use crate::device::SensorGeometry;

/// Output pixel grid.
///
/// Axis 0 runs along the sensor x extent, axis 1 along depth and axis 2 along
/// the sensor y extent.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Grid {
    xdim: usize,
    ydim: usize,
    zdim: usize,
    /// Pixel spacing [mm].
    spacing_mm: f32,
}

fn clamp_dim(axis: &str, n: f32) -> usize {
    if n >= 1. {
        n as usize
    } else {
        tracing::warn!("Degenerate {} extent ({}), clamped to 1 pixel", axis, n);
        1
    }
}

impl Grid {
    /// Sizes the grid from the sensor extent and the recorded travel distance.
    pub fn new(
        geometry: &SensorGeometry,
        n_samples: usize,
        time_spacing_in_ms: f32,
        speed_of_sound: f32,
        spacing_mm: f32,
    ) -> Self {
        let extent = geometry.aabb().extent();
        let xdim = clamp_dim("x", (extent.x / spacing_mm).floor() + 1.);
        let zdim = clamp_dim("y", (extent.y / spacing_mm).floor() + 1.);
        let ydim = clamp_dim(
            "depth",
            (n_samples as f32 * time_spacing_in_ms * speed_of_sound / spacing_mm).round_ties_even(),
        );
        Self {
            xdim,
            ydim,
            zdim,
            spacing_mm,
        }
    }

    #[allow(missing_docs)]
    pub const fn dims(&self) -> (usize, usize, usize) {
        (self.xdim, self.ydim, self.zdim)
    }

    #[allow(missing_docs)]
    pub const fn num_pixels(&self) -> usize {
        self.xdim * self.ydim * self.zdim
    }

    /// Grid indices of the pixel at a row-major linear index.
    pub(crate) const fn index(&self, p: usize) -> (usize, usize, usize) {
        (
            p / (self.ydim * self.zdim),
            (p / self.zdim) % self.ydim,
            p % self.zdim,
        )
    }
}
