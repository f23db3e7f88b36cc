use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box [mm].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    #[allow(missing_docs)]
    pub min: Point3<f32>,
    #[allow(missing_docs)]
    pub max: Point3<f32>,
}

impl Aabb {
    pub(crate) fn empty() -> Self {
        let min = Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let max = Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        Self { min, max }
    }

    pub(crate) fn grow(self, other: Point3<f32>) -> Aabb {
        Aabb {
            min: self.min.inf(&other),
            max: self.max.sup(&other),
        }
    }

    /// Size of the box along each axis. Zero for an empty box.
    pub fn extent(&self) -> Vector3<f32> {
        (self.max - self.min).map(|v| v.max(0.))
    }
}
