//! Metric samplers.
//!
//! Each sampler reads raw counters for one resource and turns them into the
//! values a module renders. Samplers that need deltas own their previous
//! reading.

mod cpu;
mod gpu;
mod metrics;
mod rapl;
pub mod sysfs;

pub use cpu::{cpu_usage, frequency_summary, parse_proc_stat, CpuSampler, CpuTimes, DEFAULT_PROC_STAT};
pub use gpu::{GpuSampler, DEFAULT_GPU_USAGE_PATH, DEFAULT_VRAM_USED_PATH};
pub use metrics::{CpuMetrics, GpuMetrics, PowerMetrics};
pub use rapl::{energy_delta, power_between, EnergyReading, RaplSampler, DEFAULT_RAPL_DIR};
