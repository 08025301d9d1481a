use serde::{Deserialize, Serialize};

/// Values derived from one CPU sample
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuMetrics {
    pub load_average: (f64, f64, f64), // 1, 5, 15 min
    /// Index 0 is the aggregate, followed by one entry per core
    pub usage: Vec<f32>,
    pub usage_tooltip: String,
    pub max_frequency_ghz: f64,
    pub min_frequency_ghz: f64,
    pub avg_frequency_ghz: f64,
}

impl CpuMetrics {
    pub fn total_usage(&self) -> f32 {
        self.usage.first().copied().unwrap_or(0.0)
    }

    pub fn per_core_usage(&self) -> &[f32] {
        self.usage.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub utilization_percent: i64,
    pub vram_used_bytes: u64,
    pub vram_used_gb: f64,
    /// VRAM file contents as read, `"0"` when unreadable
    pub vram_used_raw: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerMetrics {
    pub package_watts: f64,
    pub core_watts: f64,
    pub other_watts: f64,
}

impl PowerMetrics {
    pub fn new(package_watts: f64, core_watts: f64) -> Self {
        Self {
            package_watts,
            core_watts,
            other_watts: package_watts - core_watts,
        }
    }

    /// Package power clamped into the 0..=255 range used for state lookup.
    pub fn state_input(&self) -> u8 {
        self.package_watts.clamp(0.0, 255.0) as u8
    }
}
