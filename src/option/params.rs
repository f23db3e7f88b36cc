use getset::{CopyGetters, Getters};

use crate::{
    ApodizationMethod, BModeMethod, DeviceRegistry, ExecutionTarget, ReconstructionError,
    ReconstructionMode, Settings,
    device::{SensorGeometry, VolumeDimensions},
    store::{DataField, FieldStore, field_mean},
};

/// Frequency-domain bandpass filter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandpassParameters {
    /// Low-pass cutoff [Hz].
    pub cutoff_lowpass: f32,
    /// High-pass cutoff [Hz].
    pub cutoff_highpass: f32,
    /// Taper fraction of the Tukey window.
    pub tukey_alpha: f32,
}

impl Default for BandpassParameters {
    fn default() -> Self {
        Self {
            cutoff_lowpass: 8e6,
            cutoff_highpass: 0.1e6,
            tukey_alpha: 0.5,
        }
    }
}

/// B-mode envelope configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BModeParameters {
    #[allow(missing_docs)]
    pub method: BModeMethod,
    /// Apply to the time series before beamforming.
    pub before_reconstruction: bool,
    /// Apply to the reconstructed volume.
    pub after_reconstruction: bool,
}

/// Fully resolved and validated reconstruction parameters.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct ReconstructionParameters {
    /// Speed of sound [m/s].
    #[getset(get_copy = "pub")]
    speed_of_sound: f32,
    /// Time between two samples [ms].
    #[getset(get_copy = "pub")]
    time_spacing_in_ms: f32,
    /// Pixel spacing [mm].
    #[getset(get_copy = "pub")]
    spacing_mm: f32,
    #[getset(get_copy = "pub")]
    mode: ReconstructionMode,
    #[getset(get_copy = "pub")]
    apodization: Option<ApodizationMethod>,
    /// `None` if bandpass filtering is disabled.
    #[getset(get_copy = "pub")]
    bandpass: Option<BandpassParameters>,
    /// `None` if no B-mode method is configured.
    #[getset(get_copy = "pub")]
    bmode: Option<BModeParameters>,
    #[getset(get_copy = "pub")]
    target: ExecutionTarget,
    /// Volume dimensions after the device adjustment.
    #[getset(get = "pub")]
    volume: VolumeDimensions,
}

fn truthy(v: Option<f32>) -> Option<f32> {
    v.filter(|&v| v != 0.)
}

fn positive(key: &'static str, value: f32) -> Result<f32, ReconstructionError> {
    if value.is_finite() && value > 0. {
        Ok(value)
    } else {
        Err(ReconstructionError::InvalidParameter {
            key,
            value,
            reason: "must be positive and finite",
        })
    }
}

impl ReconstructionParameters {
    /// Resolves the parameters and the sensor geometry from sparse settings.
    ///
    /// `store` is only consulted when the speed of sound has to be derived from
    /// the recorded sound-speed field. The settings are not modified.
    pub fn resolve(
        settings: &Settings,
        registry: &DeviceRegistry,
        store: Option<&dyn FieldStore>,
    ) -> Result<(Self, SensorGeometry), ReconstructionError> {
        let speed_of_sound = match (truthy(settings.speed_of_sound), settings.wavelength, store) {
            (Some(c), _, _) => c,
            (None, Some(wavelength), Some(store)) if wavelength != 0 => {
                field_mean(store, DataField::SpeedOfSound, wavelength)?
            }
            _ => {
                return Err(ReconstructionError::MissingParameter(&[
                    Settings::SPEED_OF_SOUND,
                    Settings::WAVELENGTH,
                ]));
            }
        };
        let speed_of_sound = positive(Settings::SPEED_OF_SOUND, speed_of_sound)?;

        let time_spacing_in_ms = match (
            truthy(settings.simulator_time_step),
            truthy(settings.sensor_sampling_rate_mhz),
        ) {
            (Some(dt), _) => positive(Settings::SIMULATOR_TIME_STEP, dt)? * 1000.,
            (None, Some(rate)) => 1. / (positive(Settings::SENSOR_SAMPLING_RATE_MHZ, rate)? * 1000.),
            (None, None) => {
                return Err(ReconstructionError::MissingParameter(&[
                    Settings::SENSOR_SAMPLING_RATE_MHZ,
                    Settings::SIMULATOR_TIME_STEP,
                ]));
            }
        };

        let spacing_mm = truthy(settings.spacing_mm)
            .ok_or(ReconstructionError::MissingParameter(&[Settings::SPACING_MM]))?;
        let spacing_mm = positive(Settings::SPACING_MM, spacing_mm)?;

        let device = registry.get(
            settings
                .device
                .as_deref()
                .ok_or(ReconstructionError::MissingParameter(&[Settings::DEVICE]))?,
        )?;
        let volume = device.adjust_volume(settings.volume.unwrap_or_default());
        let geometry = device.detector_element_positions_in_volume(&volume);

        let bandpass = match settings.perform_bandpass_filtering {
            Some(false) => None,
            _ => Some(Self::resolve_bandpass(settings)?),
        };

        let bmode = settings.bmode_method.map(|method| BModeParameters {
            method,
            before_reconstruction: settings.bmode_before_reconstruction.unwrap_or(false),
            after_reconstruction: settings.bmode_after_reconstruction.unwrap_or(false),
        });

        let params = Self {
            speed_of_sound,
            time_spacing_in_ms,
            spacing_mm,
            mode: settings.reconstruction_mode.unwrap_or_default(),
            apodization: settings.apodization_method,
            bandpass,
            bmode,
            target: ExecutionTarget::resolve(settings.gpu),
            volume,
        };
        tracing::debug!("Resolved reconstruction parameters: {:?}", params);

        Ok((params, geometry))
    }

    fn resolve_bandpass(settings: &Settings) -> Result<BandpassParameters, ReconstructionError> {
        let default = BandpassParameters::default();
        let params = BandpassParameters {
            cutoff_lowpass: settings
                .bandpass_cutoff_lowpass
                .unwrap_or(default.cutoff_lowpass),
            cutoff_highpass: settings
                .bandpass_cutoff_highpass
                .unwrap_or(default.cutoff_highpass),
            tukey_alpha: settings.tukey_window_alpha.unwrap_or(default.tukey_alpha),
        };
        if !(0.0..=1.0).contains(&params.tukey_alpha) {
            return Err(ReconstructionError::InvalidParameter {
                key: Settings::TUKEY_WINDOW_ALPHA,
                value: params.tukey_alpha,
                reason: "must be in [0, 1]",
            });
        }
        for (key, value) in [
            (Settings::BANDPASS_CUTOFF_LOWPASS, params.cutoff_lowpass),
            (Settings::BANDPASS_CUTOFF_HIGHPASS, params.cutoff_highpass),
        ] {
            if !value.is_finite() {
                return Err(ReconstructionError::InvalidParameter {
                    key,
                    value,
                    reason: "must be finite",
                });
            }
        }
        if params.cutoff_highpass < 0. {
            return Err(ReconstructionError::InvalidParameter {
                key: Settings::BANDPASS_CUTOFF_HIGHPASS,
                value: params.cutoff_highpass,
                reason: "must not be negative",
            });
        }
        if params.cutoff_highpass > params.cutoff_lowpass {
            return Err(ReconstructionError::InvalidParameter {
                key: Settings::BANDPASS_CUTOFF_LOWPASS,
                value: params.cutoff_lowpass,
                reason: "must not be lower than the high-pass cutoff",
            });
        }
        Ok(params)
    }

    /// Whether the B-mode method is applied to the time series.
    pub fn bmode_before(&self) -> Option<BModeMethod> {
        self.bmode
            .filter(|b| b.before_reconstruction)
            .map(|b| b.method)
    }

    /// Whether the B-mode method is applied to the reconstructed volume.
    pub fn bmode_after(&self) -> Option<BModeMethod> {
        self.bmode
            .filter(|b| b.after_reconstruction)
            .map(|b| b.method)
    }
}
