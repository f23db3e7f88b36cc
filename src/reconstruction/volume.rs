use derive_more::Deref;
use ndarray::Array3;

/// Normalized reconstructed image.
///
/// Axis 0 is the lateral x axis, axis 1 depth and axis 2 the lateral y axis.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct ReconstructedVolume {
    #[deref]
    data: Array3<f32>,
    spacing_mm: f32,
}

impl ReconstructedVolume {
    pub(crate) fn new(data: Array3<f32>, spacing_mm: f32) -> Self {
        Self { data, spacing_mm }
    }

    /// Pixel spacing [mm].
    pub const fn spacing_mm(&self) -> f32 {
        self.spacing_mm
    }

    #[allow(missing_docs)]
    pub fn into_inner(self) -> Array3<f32> {
        self.data
    }

    /// Index of the brightest pixel. `NaN` pixels are skipped.
    pub fn argmax(&self) -> Option<(usize, usize, usize)> {
        self.data
            .indexed_iter()
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |acc: Option<((usize, usize, usize), f32)>, (idx, &v)| match acc {
                Some((_, max)) if max >= v => acc,
                _ => Some((idx, v)),
            })
            .map(|(idx, _)| idx)
    }

    /// Exports the volume as a table with one row per pixel.
    #[cfg(feature = "polars")]
    pub fn to_dataframe(&self) -> Result<polars::frame::DataFrame, crate::ReconstructionError> {
        use polars::df;

        let (nx, ny, nz) = self.data.dim();
        let s = self.spacing_mm;
        let (x, y, z): (Vec<_>, Vec<_>, Vec<_>) = itertools::multiunzip(
            itertools::iproduct!(0..nx, 0..ny, 0..nz)
                .map(|(ix, iy, iz)| (ix as f32 * s, iy as f32 * s, iz as f32 * s)),
        );
        let p = self.data.iter().copied().collect::<Vec<_>>();
        Ok(df!(
            "x[mm]" => &x,
            "y[mm]" => &y,
            "z[mm]" => &z,
            "p[a.u.]" => &p,
        )?)
    }
}
