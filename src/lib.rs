#![warn(missing_docs)]

//! Delay-and-sum reconstruction of photoacoustic sensor time series into 3D pressure images.

mod device;
mod error;
pub mod filter;
mod option;
mod reconstruction;
mod store;
mod utils;

pub use device::{
    DeviceGeometry, DeviceRegistry, LinearArray, SensorArray, SensorGeometry, VolumeDimensions,
};
pub use error::ReconstructionError;
pub use option::{
    ApodizationMethod, BModeMethod, BModeParameters, BandpassParameters, ExecutionTarget,
    ReconstructionMode, ReconstructionOption, ReconstructionParameters, Settings,
    ZeroContributionPolicy,
};
pub use reconstruction::{DelayAndSum, Grid, ReconstructedVolume, TimeSeriesData};
pub use store::{DataField, FieldStore, MemoryFieldStore};
pub use utils::aabb::Aabb;

/// Speed of sound used by [`reconstruct_delay_and_sum`] when none is configured [m/s].
pub const DEFAULT_SPEED_OF_SOUND: f32 = 1540.;
/// Time spacing used by [`reconstruct_delay_and_sum`] when no sampling rate is configured [s].
pub const DEFAULT_TIME_SPACING: f32 = 2.5e-8;
/// Pixel spacing used by [`reconstruct_delay_and_sum`] when none is configured [mm].
pub const DEFAULT_SENSOR_SPACING: f32 = 0.1;

/// Reconstructs a volume with the built-in devices.
///
/// Only absent settings are filled: `speed_of_sound` [m/s], the sampling rate derived
/// from `time_spacing` [s], `spacing_mm` from `sensor_spacing` [mm], and the device,
/// which defaults to [`DeviceRegistry::LINEAR_ARRAY`].
pub fn reconstruct_delay_and_sum(
    time_series: &TimeSeriesData,
    settings: Option<Settings>,
    speed_of_sound: f32,
    time_spacing: f32,
    sensor_spacing: f32,
) -> Result<ReconstructedVolume, ReconstructionError> {
    let settings = settings.unwrap_or_default();
    let settings = Settings {
        speed_of_sound: settings.speed_of_sound.or(Some(speed_of_sound)),
        sensor_sampling_rate_mhz: settings
            .sensor_sampling_rate_mhz
            .or(Some(1. / time_spacing / 1e6)),
        spacing_mm: settings.spacing_mm.or(Some(sensor_spacing)),
        device: settings
            .device
            .or_else(|| Some(DeviceRegistry::LINEAR_ARRAY.to_owned())),
        ..settings
    };
    DelayAndSum::default().reconstruct(time_series, &settings)
}
