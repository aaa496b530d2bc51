//! Device configuration for local inference.

use std::fmt;
use std::str::FromStr;

use crate::error::MimirError;

/// Compute device for local inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// CPU execution (default).
    #[default]
    Cpu,

    /// CUDA GPU execution.
    #[cfg(feature = "cuda")]
    Cuda {
        /// GPU device ID (0-indexed).
        device_id: u32,
    },
}

impl Device {
    /// Get the device name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            #[cfg(feature = "cuda")]
            Self::Cuda { .. } => "CUDA",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            #[cfg(feature = "cuda")]
            Self::Cuda { device_id } => write!(f, "cuda:{device_id}"),
        }
    }
}

/// Parses `cpu`, `cuda` or `cuda:<id>`.
///
/// CUDA devices are rejected when the crate is built without the `cuda`
/// feature, so a config asking for a GPU never silently runs on the CPU.
impl FromStr for Device {
    type Err = MimirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "cpu" => Ok(Self::Cpu),
            #[cfg(feature = "cuda")]
            "cuda" => Ok(Self::Cuda { device_id: 0 }),
            #[cfg(feature = "cuda")]
            other if other.starts_with("cuda:") => {
                let device_id = other["cuda:".len()..].parse().map_err(|_| {
                    MimirError::Configuration(format!("invalid CUDA device id in '{other}'"))
                })?;
                Ok(Self::Cuda { device_id })
            }
            other if other.starts_with("cuda") => Err(MimirError::Configuration(format!(
                "device '{other}' requires the `cuda` feature"
            ))),
            other => Err(MimirError::Configuration(format!(
                "unknown device '{other}' (expected \"cpu\" or \"cuda\")"
            ))),
        }
    }
}
