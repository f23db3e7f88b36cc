use derive_more::Deref;
use ndarray::{Array2, ArrayD, Ix2};

use crate::ReconstructionError;

/// Sensor time series, one row per sensor element and one column per time sample.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct TimeSeriesData(Array2<f32>);

impl TimeSeriesData {
    /// Wraps the time series, rejecting data without any sensor element or time sample.
    pub fn new(data: Array2<f32>) -> Result<Self, ReconstructionError> {
        match data.dim() {
            (n, t) if n == 0 || t == 0 => Err(ReconstructionError::EmptyTimeSeries((n, t))),
            _ => Ok(Self(data)),
        }
    }

    #[allow(missing_docs)]
    pub fn num_sensors(&self) -> usize {
        self.0.dim().0
    }

    #[allow(missing_docs)]
    pub fn num_samples(&self) -> usize {
        self.0.dim().1
    }

    #[allow(missing_docs)]
    pub fn into_inner(self) -> Array2<f32> {
        self.0
    }
}

impl TryFrom<ArrayD<f32>> for TimeSeriesData {
    type Error = ReconstructionError;

    fn try_from(data: ArrayD<f32>) -> Result<Self, Self::Error> {
        if data.ndim() != 2 {
            return Err(ReconstructionError::InvalidDimension(data.ndim()));
        }
        Self::new(data.into_dimensionality::<Ix2>()?)
    }
}
