use nalgebra::Point3;

use super::{DeviceGeometry, VolumeDimensions};

/// A device with explicitly given detector element positions.
///
/// The volume is used as requested.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorArray {
    positions: Vec<Point3<f32>>,
    probe_height_mm: f32,
}

impl SensorArray {
    /// Creates a device from element positions relative to the device [mm].
    pub fn new(positions: Vec<Point3<f32>>) -> Self {
        Self {
            positions,
            probe_height_mm: 0.,
        }
    }

    #[allow(missing_docs)]
    pub fn with_probe_height_mm(self, probe_height_mm: f32) -> Self {
        Self {
            probe_height_mm,
            ..self
        }
    }
}

impl DeviceGeometry for SensorArray {
    fn probe_height_mm(&self) -> f32 {
        self.probe_height_mm
    }

    fn adjust_volume(&self, volume: VolumeDimensions) -> VolumeDimensions {
        volume
    }

    fn detector_element_positions(&self) -> Vec<Point3<f32>> {
        self.positions.clone()
    }
}
