use derive_more::Display;

/// Transformation applied to the time series before beamforming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ReconstructionMode {
    /// Use the recorded pressure as is.
    #[default]
    #[display("pressure")]
    Pressure,
    /// Use the time-weighted derivative `t · dp/dt`.
    #[display("differential")]
    Differential,
}

impl From<&str> for ReconstructionMode {
    fn from(key: &str) -> Self {
        match key {
            "differential" => Self::Differential,
            _ => Self::Pressure,
        }
    }
}

/// Per-sensor weighting of the back-projected contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ApodizationMethod {
    /// Uniform weight 1.
    #[display("box")]
    Box,
    /// Periodic Hann window over the sensor elements.
    #[display("hann")]
    Hann,
    /// Periodic Hamming window over the sensor elements.
    #[display("hamming")]
    Hamming,
}

impl From<&str> for ApodizationMethod {
    fn from(key: &str) -> Self {
        match key {
            "hann" => Self::Hann,
            "hamming" => Self::Hamming,
            _ => Self::Box,
        }
    }
}

/// Envelope transform for B-mode display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BModeMethod {
    /// Absolute value of the signal.
    #[display("absolute_value")]
    AbsoluteValue,
    /// Magnitude of the analytic signal.
    #[display("hilbert_transform")]
    HilbertTransform,
}

impl BModeMethod {
    /// Parses a method key. Unknown keys mean no B-mode transform.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "absolute_value" => Some(Self::AbsoluteValue),
            "hilbert_transform" => Some(Self::HilbertTransform),
            _ => None,
        }
    }
}

/// Value of a pixel that no sensor contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ZeroContributionPolicy {
    /// Write `0`.
    #[default]
    #[display("zero")]
    Zero,
    /// Write `NaN`. Normalization ignores these pixels.
    #[display("nan")]
    Nan,
}

impl ZeroContributionPolicy {
    pub(crate) const fn sentinel(&self) -> f32 {
        match self {
            Self::Zero => 0.,
            Self::Nan => f32::NAN,
        }
    }
}

/// Where the beamforming kernel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExecutionTarget {
    #[allow(missing_docs)]
    #[display("cpu")]
    Cpu,
    #[allow(missing_docs)]
    #[display("gpu")]
    Gpu,
}

impl ExecutionTarget {
    /// Selects the target from an optional GPU flag.
    ///
    /// An explicit flag wins. Without one, a GPU is used if an adapter is available.
    pub fn resolve(gpu: Option<bool>) -> Self {
        match gpu {
            Some(true) if cfg!(feature = "gpu") => Self::Gpu,
            Some(true) => {
                tracing::warn!("GPU requested but pa-das was built without the gpu feature");
                Self::Cpu
            }
            Some(false) => Self::Cpu,
            None if crate::reconstruction::gpu_available() => Self::Gpu,
            None => Self::Cpu,
        }
    }
}
