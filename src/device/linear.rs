use nalgebra::Point3;

use super::{DeviceGeometry, VolumeDimensions};

/// A linear array of detector elements along the x axis, centered on the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearArray {
    /// Distance between neighboring elements [mm].
    pub pitch_mm: f32,
    #[allow(missing_docs)]
    pub number_of_elements: usize,
    /// Height of the device mount [mm].
    pub probe_height_mm: f32,
}

impl Default for LinearArray {
    fn default() -> Self {
        Self {
            pitch_mm: 0.5,
            number_of_elements: 100,
            probe_height_mm: 0.,
        }
    }
}

impl LinearArray {
    /// Width covered by the elements [mm].
    pub fn aperture_mm(&self) -> f32 {
        self.number_of_elements.saturating_sub(1) as f32 * self.pitch_mm
    }
}

impl DeviceGeometry for LinearArray {
    fn probe_height_mm(&self) -> f32 {
        self.probe_height_mm
    }

    fn adjust_volume(&self, volume: VolumeDimensions) -> VolumeDimensions {
        let aperture = self.aperture_mm();
        if volume.x_mm >= aperture {
            return volume;
        }
        tracing::debug!(
            "Enlarging volume x dimension from {} mm to the array aperture {} mm",
            volume.x_mm,
            aperture
        );
        VolumeDimensions {
            x_mm: aperture,
            ..volume
        }
    }

    fn detector_element_positions(&self) -> Vec<Point3<f32>> {
        let center = (self.number_of_elements as f32 - 1.) / 2.;
        (0..self.number_of_elements)
            .map(|i| Point3::new((i as f32 - center) * self.pitch_mm, 0., 0.))
            .collect()
    }
}
