use ndarray::{Array, Dimension};

/// Min-max normalizes `data` to `[0, 1]`.
///
/// `NaN` values are ignored and kept. If all finite values are equal, they become 0.
pub fn normalize<D: Dimension>(mut data: Array<f32, D>) -> Array<f32, D> {
    let (min, max) = data
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    let range = max - min;
    if range > 0. {
        data.mapv_inplace(|v| (v - min) / range);
    } else {
        data.mapv_inplace(|v| if v.is_nan() { v } else { 0. });
    }
    data
}
