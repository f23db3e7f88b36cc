mod method;
mod params;

pub use method::{
    ApodizationMethod, BModeMethod, ExecutionTarget, ReconstructionMode, ZeroContributionPolicy,
};
pub use params::{BandpassParameters, BModeParameters, ReconstructionParameters};

use crate::device::VolumeDimensions;

/// Sparse reconstruction settings.
///
/// Every field is optional. [`ReconstructionParameters::resolve`] applies the
/// fallback rules and fails on required values that cannot be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Speed of sound [m/s].
    pub speed_of_sound: Option<f32>,
    /// Wavelength [nm] whose recorded sound-speed field is averaged when no speed of sound is set.
    pub wavelength: Option<u32>,
    /// Time step of the acoustic simulator [s].
    pub simulator_time_step: Option<f32>,
    /// Sampling rate of the sensor [MHz].
    pub sensor_sampling_rate_mhz: Option<f32>,
    /// Pixel spacing [mm].
    pub spacing_mm: Option<f32>,
    /// Identifier of the digital device in the [`DeviceRegistry`](crate::DeviceRegistry).
    pub device: Option<String>,
    /// Requested simulation volume. Devices may enlarge it.
    pub volume: Option<VolumeDimensions>,
    /// Use the GPU. If unset, the GPU is used when available.
    pub gpu: Option<bool>,
    #[allow(missing_docs)]
    pub reconstruction_mode: Option<ReconstructionMode>,
    #[allow(missing_docs)]
    pub apodization_method: Option<ApodizationMethod>,
    /// Bandpass filtering is performed unless this is `Some(false)`.
    pub perform_bandpass_filtering: Option<bool>,
    /// Low-pass cutoff [Hz].
    pub bandpass_cutoff_lowpass: Option<f32>,
    /// High-pass cutoff [Hz].
    pub bandpass_cutoff_highpass: Option<f32>,
    /// Taper fraction of the Tukey window.
    pub tukey_window_alpha: Option<f32>,
    #[allow(missing_docs)]
    pub bmode_method: Option<BModeMethod>,
    /// Apply the B-mode method to the time series before beamforming.
    pub bmode_before_reconstruction: Option<bool>,
    /// Apply the B-mode method to the reconstructed volume.
    pub bmode_after_reconstruction: Option<bool>,
}

impl Settings {
    pub(crate) const SPEED_OF_SOUND: &'static str = "speed_of_sound";
    pub(crate) const WAVELENGTH: &'static str = "wavelength";
    pub(crate) const SIMULATOR_TIME_STEP: &'static str = "simulator_time_step";
    pub(crate) const SENSOR_SAMPLING_RATE_MHZ: &'static str = "sensor_sampling_rate_mhz";
    pub(crate) const SPACING_MM: &'static str = "spacing_mm";
    pub(crate) const DEVICE: &'static str = "device";
    pub(crate) const TUKEY_WINDOW_ALPHA: &'static str = "tukey_window_alpha";
    pub(crate) const BANDPASS_CUTOFF_HIGHPASS: &'static str = "bandpass_cutoff_highpass";
    pub(crate) const BANDPASS_CUTOFF_LOWPASS: &'static str = "bandpass_cutoff_lowpass";
}

/// Runtime options of the reconstruction engine.
#[derive(Debug, Clone, Copy)]
pub struct ReconstructionOption {
    /// Print a progress bar over the pixel batches.
    pub print_progress: bool,
    /// Upper bound of the memory used by one batch of the delay table [MB].
    pub memory_limits_hint_mb: usize,
    /// Value of pixels no sensor contributes to.
    pub zero_contribution: ZeroContributionPolicy,
}

impl std::default::Default for ReconstructionOption {
    fn default() -> Self {
        Self {
            print_progress: false,
            memory_limits_hint_mb: 128,
            zero_contribution: ZeroContributionPolicy::Zero,
        }
    }
}

impl ReconstructionOption {
    pub(crate) fn pb(&self, n: usize) -> Result<indicatif::ProgressBar, crate::ReconstructionError> {
        if !self.print_progress {
            return Ok(indicatif::ProgressBar::hidden());
        }
        let pb = indicatif::ProgressBar::new(n as _);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed}] [{bar:40.cyan/blue}] {percent}% ({eta})")?
                .progress_chars("#-"),
        );
        Ok(pb)
    }

    /// Number of pixels whose delay table fits into the memory hint.
    pub(crate) fn pixels_per_batch(&self, num_sensors: usize) -> usize {
        let bytes_per_pixel = num_sensors * (size_of::<f32>() + size_of::<bool>());
        (self.memory_limits_hint_mb.saturating_mul(1024 * 1024) / bytes_per_pixel.max(1)).max(1)
    }
}
