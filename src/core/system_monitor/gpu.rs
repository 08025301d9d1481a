//! GPU busy percent and VRAM usage read from two sysfs files.

use std::path::PathBuf;

use super::metrics::GpuMetrics;
use super::sysfs::{read_int, read_line};

pub const DEFAULT_GPU_USAGE_PATH: &str = "/sys/class/drm/card1/device/gpu_busy_percent";
pub const DEFAULT_VRAM_USED_PATH: &str = "/sys/class/drm/card1/device/mem_info_vram_used";

const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

/// Reads GPU utilization and VRAM usage.
///
/// Read or parse failures degrade to `0` instead of failing the tick.
#[derive(Debug, Clone)]
pub struct GpuSampler {
    usage_path: PathBuf,
    vram_path: PathBuf,
}

impl GpuSampler {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(usage_path: P, vram_path: Q) -> Self {
        Self {
            usage_path: usage_path.into(),
            vram_path: vram_path.into(),
        }
    }

    pub fn sample(&self) -> GpuMetrics {
        let utilization_percent = read_int(&self.usage_path).unwrap_or_else(|e| {
            log::debug!("GPU usage unavailable, using 0: {}", e);
            0
        });

        let vram_used_raw = read_line(&self.vram_path).unwrap_or_else(|e| {
            log::debug!("VRAM usage unavailable, using 0: {}", e);
            "0".to_string()
        });
        let vram_used_bytes = vram_used_raw.parse::<u64>().unwrap_or_else(|_| {
            log::debug!("VRAM value {:?} is not a byte count, using 0", vram_used_raw);
            0
        });

        GpuMetrics {
            utilization_percent,
            vram_used_bytes,
            vram_used_gb: vram_used_bytes as f64 / BYTES_PER_GIB,
            vram_used_raw,
        }
    }
}

impl Default for GpuSampler {
    fn default() -> Self {
        Self::new(DEFAULT_GPU_USAGE_PATH, DEFAULT_VRAM_USED_PATH)
    }
}
