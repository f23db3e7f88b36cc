mod cpu;
mod delay;
#[cfg(feature = "gpu")]
mod gpu;
mod grid;
mod time_series;
mod volume;

use getset::Getters;
use indicatif::ProgressBar;
use nalgebra::Point3;
use ndarray::{Array2, Array3, ArrayView2, Axis};
use rayon::prelude::*;

use crate::{
    DeviceRegistry, ExecutionTarget, ReconstructionError, ReconstructionOption,
    ReconstructionParameters, Settings, ZeroContributionPolicy,
    filter::{apodization, b_mode, bandpass_filtering, normalize, reconstruction_mode_transformation},
    store::{DataField, FieldStore},
};

pub use grid::Grid;
pub use time_series::TimeSeriesData;
pub use volume::ReconstructedVolume;

/// Accumulated contribution of all sensors to one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Contribution {
    pub(crate) sum: f32,
    pub(crate) count: u32,
}

impl Contribution {
    /// Mean over the contributing sensors, or the sentinel if none contributed.
    pub(crate) fn value(self, policy: ZeroContributionPolicy) -> f32 {
        if self.count == 0 {
            policy.sentinel()
        } else {
            self.sum / self.count as f32
        }
    }
}

/// Everything the beamforming kernels read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KernelInput<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) sensors: &'a [Point3<f32>],
    pub(crate) signal: ArrayView2<'a, f32>,
    pub(crate) weights: &'a [f32],
    /// Distance sound travels during one sample [mm].
    pub(crate) sos_dt: f32,
}

#[derive(Debug)]
enum ComputeDevice<'a> {
    Cpu(cpu::Cpu<'a>),
    #[cfg(feature = "gpu")]
    Gpu(gpu::Gpu),
}

impl<'a> ComputeDevice<'a> {
    fn new(target: ExecutionTarget, input: KernelInput<'a>, option: &ReconstructionOption) -> Self {
        let cpu = |input: KernelInput<'a>| {
            let pixels_per_batch = option.pixels_per_batch(input.sensors.len());
            Self::Cpu(cpu::Cpu::new(input, pixels_per_batch))
        };
        match target {
            ExecutionTarget::Cpu => cpu(input),
            #[cfg(feature = "gpu")]
            ExecutionTarget::Gpu => match gpu::Gpu::new(&input) {
                Ok(gpu) => Self::Gpu(gpu),
                Err(e) => {
                    tracing::warn!("Failed to initialize GPU ({}), falling back to CPU", e);
                    cpu(input)
                }
            },
            #[cfg(not(feature = "gpu"))]
            ExecutionTarget::Gpu => cpu(input),
        }
    }

    fn num_batches(&self) -> usize {
        match self {
            Self::Cpu(cpu) => cpu.num_batches(),
            #[cfg(feature = "gpu")]
            Self::Gpu(gpu) => gpu.num_batches(),
        }
    }

    fn compute(&self, pb: &ProgressBar) -> Result<Vec<Contribution>, ReconstructionError> {
        match self {
            Self::Cpu(cpu) => Ok(cpu.compute(pb)),
            #[cfg(feature = "gpu")]
            Self::Gpu(gpu) => gpu.compute(pb),
        }
    }
}

#[cfg(feature = "gpu")]
pub(crate) fn gpu_available() -> bool {
    static AVAILABLE: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *AVAILABLE.get_or_init(gpu::Gpu::is_available)
}

#[cfg(not(feature = "gpu"))]
pub(crate) const fn gpu_available() -> bool {
    false
}

/// Delay-and-sum reconstruction engine.
#[derive(Debug, Clone, Default, Getters)]
#[getset(get = "pub")]
pub struct DelayAndSum {
    /// Devices that `Settings::device` can name.
    registry: DeviceRegistry,
    /// Runtime options.
    option: ReconstructionOption,
}

impl DelayAndSum {
    #[allow(missing_docs)]
    pub fn new(registry: DeviceRegistry, option: ReconstructionOption) -> Self {
        Self { registry, option }
    }

    /// Reconstructs a volume from the time series.
    ///
    /// The speed of sound must be given in `settings` since no field store is available.
    pub fn reconstruct(
        &self,
        time_series: &TimeSeriesData,
        settings: &Settings,
    ) -> Result<ReconstructedVolume, ReconstructionError> {
        self.reconstruct_impl(time_series, settings, None)
    }

    /// Reconstructs a volume, falling back to the mean recorded speed of sound in `store`.
    pub fn reconstruct_with_store(
        &self,
        time_series: &TimeSeriesData,
        settings: &Settings,
        store: &dyn FieldStore,
    ) -> Result<ReconstructedVolume, ReconstructionError> {
        self.reconstruct_impl(time_series, settings, Some(store))
    }

    /// Loads the time series of the configured wavelength from `store`, reconstructs it,
    /// and saves the result back under the same wavelength.
    pub fn run(
        &self,
        settings: &Settings,
        store: &mut dyn FieldStore,
    ) -> Result<ReconstructedVolume, ReconstructionError> {
        let wavelength = settings
            .wavelength
            .ok_or(ReconstructionError::MissingParameter(&[Settings::WAVELENGTH]))?;
        let time_series =
            TimeSeriesData::try_from(store.load_field(DataField::TimeSeriesData, wavelength)?)?;
        let volume = self.reconstruct_impl(&time_series, settings, Some(&*store))?;
        store.save_field(
            DataField::ReconstructedData,
            wavelength,
            volume.clone().into_inner().into_dyn(),
        )?;
        Ok(volume)
    }

    fn preprocess(
        &self,
        time_series: &TimeSeriesData,
        params: &ReconstructionParameters,
    ) -> Array2<f32> {
        let mut data = Array2::clone(time_series);
        if let Some(method) = params.bmode_before() {
            tracing::debug!("Applying {} B-mode to the time series", method);
            data = b_mode(data, method, Axis(1));
        }
        data = reconstruction_mode_transformation(data, params.mode());
        if let Some(bandpass) = params.bandpass() {
            tracing::debug!("Applying bandpass filter: {:?}", bandpass);
            data = bandpass_filtering(data.view(), params.time_spacing_in_ms(), &bandpass);
        }
        data
    }

    fn reconstruct_impl(
        &self,
        time_series: &TimeSeriesData,
        settings: &Settings,
        store: Option<&dyn FieldStore>,
    ) -> Result<ReconstructedVolume, ReconstructionError> {
        let (params, geometry) = ReconstructionParameters::resolve(settings, &self.registry, store)?;
        if geometry.len() != time_series.num_sensors() {
            return Err(ReconstructionError::ShapeMismatch {
                positions: geometry.len(),
                elements: time_series.num_sensors(),
            });
        }

        let signal = self.preprocess(time_series, &params);

        let grid = Grid::new(
            &geometry,
            time_series.num_samples(),
            params.time_spacing_in_ms(),
            params.speed_of_sound(),
            params.spacing_mm(),
        );
        tracing::info!(
            "Reconstructing {:?} pixels from {} sensor elements on {}",
            grid.dims(),
            geometry.len(),
            params.target()
        );

        let weights = apodization(params.apodization(), geometry.len());
        let input = KernelInput {
            grid: &grid,
            sensors: &geometry,
            signal: signal.view(),
            weights: weights.as_slice(),
            sos_dt: params.speed_of_sound() * params.time_spacing_in_ms(),
        };
        let device = ComputeDevice::new(params.target(), input, &self.option);
        let pb = self.option.pb(device.num_batches())?;
        let contributions = device.compute(&pb)?;
        pb.finish_and_clear();

        let policy = self.option.zero_contribution;
        let mut data = Array3::from_shape_vec(
            grid.dims(),
            contributions
                .into_par_iter()
                .map(|c| c.value(policy))
                .collect(),
        )?;
        data.invert_axis(Axis(0));
        let mut data = data.as_standard_layout().into_owned();

        if let Some(method) = params.bmode_after() {
            tracing::debug!("Applying {} B-mode to the volume", method);
            data = b_mode(data, method, Axis(1));
        }

        Ok(ReconstructedVolume::new(normalize(data), grid.spacing_mm()))
    }
}
