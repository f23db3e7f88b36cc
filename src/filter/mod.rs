//! Stateless signal and image transforms used around the beamformer.

mod apodization;
mod bandpass;
mod bmode;
mod mode;
mod normalize;

pub use apodization::{ApodizationWeights, apodization};
pub use bandpass::{bandpass_filtering, fft_frequencies, tukey};
pub use bmode::b_mode;
pub use mode::reconstruction_mode_transformation;
pub use normalize::normalize;
