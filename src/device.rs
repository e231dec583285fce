use std::fmt;

use clap::ValueEnum;
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider, ExecutionProvider,
    ExecutionProviderDispatch,
};

/// Compute device a model session can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cuda,
    CoreMl,
    Cpu,
}

/// Device requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceChoice {
    Auto,
    Cuda,
    Coreml,
    Cpu,
}

impl Device {
    /// Preference order for `auto`.
    pub const PREFERENCE: [Device; 3] = [Self::Cuda, Self::CoreMl, Self::Cpu];

    /// The first device whose provider ONNX Runtime was built with.
    ///
    /// A compiled-in provider does not guarantee a usable accelerator, so this
    /// is only a hint; `auto` sessions still fall back per provider.
    pub fn detect() -> Self {
        if CUDAExecutionProvider::default().is_available().unwrap_or(false) {
            Self::Cuda
        } else if CoreMLExecutionProvider::default()
            .is_available()
            .unwrap_or(false)
        {
            Self::CoreMl
        } else {
            Self::Cpu
        }
    }

    fn provider(self) -> ExecutionProviderDispatch {
        match self {
            Self::Cuda => CUDAExecutionProvider::default().build(),
            Self::CoreMl => CoreMLExecutionProvider::default().build(),
            Self::Cpu => CPUExecutionProvider::default().build(),
        }
    }
}

impl DeviceChoice {
    /// Devices to register, in order. `auto` always ends with the CPU.
    pub fn devices(self) -> Vec<Device> {
        match self {
            Self::Auto => Device::PREFERENCE.to_vec(),
            Self::Cuda => vec![Device::Cuda],
            Self::Coreml => vec![Device::CoreMl],
            Self::Cpu => vec![Device::Cpu],
        }
    }

    /// Whether a provider that fails to register aborts session creation.
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Cuda | Self::Coreml)
    }

    /// Execution providers for a session under this choice.
    ///
    /// `auto` registers every provider leniently and ONNX Runtime skips the
    /// ones that cannot start. A forced accelerator that is unavailable is a
    /// startup error instead of a silent CPU fallback.
    pub fn execution_providers(self) -> Vec<ExecutionProviderDispatch> {
        let strict = self.is_strict();
        self.devices()
            .into_iter()
            .map(|device| {
                let provider = device.provider();
                if strict { provider.error_on_failure() } else { provider }
            })
            .collect()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cuda => "cuda",
            Self::CoreMl => "coreml",
            Self::Cpu => "cpu",
        };
        f.write_str(name)
    }
}

impl fmt::Display for DeviceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Cuda => write!(f, "{}", Device::Cuda),
            Self::Coreml => write!(f, "{}", Device::CoreMl),
            Self::Cpu => write!(f, "{}", Device::Cpu),
        }
    }
}
