use std::collections::HashMap;

use ndarray::ArrayD;

use crate::ReconstructionError;

/// Data fields persisted by a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DataField {
    /// Spatially varying speed of sound [m/s].
    #[display("speed_of_sound")]
    SpeedOfSound,
    /// Simulated sensor time series (sensor elements × time samples).
    #[display("time_series_data")]
    TimeSeriesData,
    /// Reconstructed pressure image.
    #[display("reconstructed_data")]
    ReconstructedData,
}

/// Storage of simulation output fields, keyed by field and wavelength.
pub trait FieldStore {
    /// Loads a field recorded for the given wavelength [nm].
    fn load_field(&self, field: DataField, wavelength: u32)
    -> Result<ArrayD<f32>, ReconstructionError>;

    /// Saves a field for the given wavelength [nm], replacing any previous value.
    fn save_field(
        &mut self,
        field: DataField,
        wavelength: u32,
        data: ArrayD<f32>,
    ) -> Result<(), ReconstructionError>;
}

/// A [`FieldStore`] kept in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryFieldStore {
    fields: HashMap<(DataField, u32), ArrayD<f32>>,
}

impl MemoryFieldStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, consuming and returning the store.
    pub fn with_field(mut self, field: DataField, wavelength: u32, data: ArrayD<f32>) -> Self {
        self.fields.insert((field, wavelength), data);
        self
    }
}

impl FieldStore for MemoryFieldStore {
    fn load_field(
        &self,
        field: DataField,
        wavelength: u32,
    ) -> Result<ArrayD<f32>, ReconstructionError> {
        self.fields
            .get(&(field, wavelength))
            .cloned()
            .ok_or(ReconstructionError::FieldNotFound { field, wavelength })
    }

    fn save_field(
        &mut self,
        field: DataField,
        wavelength: u32,
        data: ArrayD<f32>,
    ) -> Result<(), ReconstructionError> {
        self.fields.insert((field, wavelength), data);
        Ok(())
    }
}

/// Mean of a stored field, accumulated in double precision.
pub(crate) fn field_mean(
    store: &dyn FieldStore,
    field: DataField,
    wavelength: u32,
) -> Result<f32, ReconstructionError> {
    let data = store.load_field(field, wavelength)?;
    if data.is_empty() {
        return Err(ReconstructionError::EmptyField(field));
    }
    Ok((data.iter().map(|&v| v as f64).sum::<f64>() / data.len() as f64) as f32)
}
