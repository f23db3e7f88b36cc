mod linear;
mod sensor_array;

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use derive_more::Deref;
use nalgebra::{Point3, Vector3};

use crate::{ReconstructionError, utils::aabb::Aabb};

pub use linear::LinearArray;
pub use sensor_array::SensorArray;

/// Extent of the simulation volume [mm].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeDimensions {
    #[allow(missing_docs)]
    pub x_mm: f32,
    #[allow(missing_docs)]
    pub y_mm: f32,
    #[allow(missing_docs)]
    pub z_mm: f32,
}

/// Positions of the sensor elements in the global volume frame [mm].
///
/// The order matches the sensor axis of the time series data.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct SensorGeometry(Vec<Point3<f32>>);

impl SensorGeometry {
    #[allow(missing_docs)]
    pub fn new(positions: Vec<Point3<f32>>) -> Self {
        Self(positions)
    }

    /// Axis-aligned bounding box of the sensor elements.
    pub fn aabb(&self) -> Aabb {
        self.0.iter().fold(Aabb::empty(), |aabb, p| aabb.grow(*p))
    }
}

impl From<Vec<Point3<f32>>> for SensorGeometry {
    fn from(positions: Vec<Point3<f32>>) -> Self {
        Self(positions)
    }
}

/// A digital twin of a detection device.
pub trait DeviceGeometry: Debug + Send + Sync {
    /// Height of the device mount above the volume origin [mm].
    fn probe_height_mm(&self) -> f32;

    /// Returns the volume dimensions the device needs, given the requested ones.
    fn adjust_volume(&self, volume: VolumeDimensions) -> VolumeDimensions;

    /// Positions of the detector elements relative to the device [mm].
    fn detector_element_positions(&self) -> Vec<Point3<f32>>;

    /// Position of the device in the volume: centered in x and y, at the probe height in z.
    fn device_position(&self, volume: &VolumeDimensions) -> Vector3<f32> {
        Vector3::new(volume.x_mm / 2., volume.y_mm / 2., self.probe_height_mm())
    }

    /// Detector element positions translated into the volume frame.
    fn detector_element_positions_in_volume(&self, volume: &VolumeDimensions) -> SensorGeometry {
        let offset = self.device_position(volume);
        SensorGeometry(
            self.detector_element_positions()
                .into_iter()
                .map(|p| p + offset)
                .collect(),
        )
    }
}

/// Named device profiles.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    devices: HashMap<String, Arc<dyn DeviceGeometry>>,
}

impl DeviceRegistry {
    /// Identifier of the default [`LinearArray`].
    pub const LINEAR_ARRAY: &'static str = "linear_array";

    /// Creates a registry without any device.
    pub fn empty() -> Self {
        Self {
            devices: HashMap::new(),
        }
    }

    /// Registers a device, replacing any device with the same identifier.
    pub fn with_device(mut self, id: impl Into<String>, device: impl DeviceGeometry + 'static) -> Self {
        self.devices.insert(id.into(), Arc::new(device));
        self
    }

    /// Looks up a device by identifier.
    pub fn get(&self, id: &str) -> Result<Arc<dyn DeviceGeometry>, ReconstructionError> {
        self.devices
            .get(id)
            .cloned()
            .ok_or_else(|| ReconstructionError::UnknownDevice(id.to_owned()))
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::empty().with_device(Self::LINEAR_ARRAY, LinearArray::default())
    }
}
