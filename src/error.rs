use thiserror::Error;

use crate::store::DataField;

/// An interface for error handling in pa-das.
#[derive(Error, Debug)]
pub enum ReconstructionError {
    /// A required parameter could not be resolved from the settings or any fallback.
    #[error("Please specify a value for {}", .0.join(" or "))]
    MissingParameter(&'static [&'static str]),
    /// A resolved parameter is out of its valid range.
    #[error("Invalid value {value} for {key}: {reason}")]
    InvalidParameter {
        /// The settings key.
        key: &'static str,
        /// The offending value.
        value: f32,
        /// What the value must satisfy.
        reason: &'static str,
    },
    /// Error when the time series data is not two-dimensional.
    #[error(
        "Time series data must have exactly 2 dimensions, one for the sensor elements and one for time, but has {0}"
    )]
    InvalidDimension(usize),
    /// Error when the time series data has no sensor element or no time sample.
    #[error("Time series data must contain at least one sensor element and one time sample, but has shape {0:?}")]
    EmptyTimeSeries((usize, usize)),
    /// Error when the sensor geometry does not match the sensor axis of the time series data.
    #[error(
        "Number of sensor positions ({positions}) does not match number of sensor elements ({elements})"
    )]
    ShapeMismatch {
        /// Number of positions reported by the device.
        positions: usize,
        /// Number of rows in the time series data.
        elements: usize,
    },
    /// Error when the device identifier is not registered.
    #[error("Unknown digital device: {0}")]
    UnknownDevice(String),
    /// Error when the requested field is not in the store.
    #[error("Data field {field} for wavelength {wavelength} nm not found")]
    FieldNotFound {
        /// The requested field.
        field: DataField,
        /// The requested wavelength [nm].
        wavelength: u32,
    },
    /// Error when the requested field holds no value.
    #[error("Data field {0} is empty")]
    EmptyField(DataField),
    #[allow(missing_docs)]
    #[error("{0}")]
    Shape(#[from] ndarray::ShapeError),
    #[allow(missing_docs)]
    #[error("{0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),
    #[allow(missing_docs)]
    #[cfg(feature = "polars")]
    #[error("{0}")]
    Polars(#[from] polars::error::PolarsError),
    /// Error when the suitable GPU adapter is not found.
    #[cfg(feature = "gpu")]
    #[error("No suitable adapter found")]
    NoSuitableAdapterFound,
    #[allow(missing_docs)]
    #[cfg(feature = "gpu")]
    #[error("{0}")]
    RequestDeviceError(#[from] wgpu::RequestDeviceError),
    #[allow(missing_docs)]
    #[cfg(feature = "gpu")]
    #[error("{0}")]
    PollError(#[from] wgpu::PollError),
    #[allow(missing_docs)]
    #[cfg(feature = "gpu")]
    #[error("{0}")]
    RecvError(#[from] flume::RecvError),
    #[allow(missing_docs)]
    #[cfg(feature = "gpu")]
    #[error("{0}")]
    BufferAsyncError(#[from] wgpu::BufferAsyncError),
}
