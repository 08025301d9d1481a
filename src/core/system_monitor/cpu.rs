//! CPU load, usage and frequency.
//!
//! Usage is derived from the cumulative tick counters in `/proc/stat`; the
//! sampler keeps the previous snapshot to compute deltas. Load average and
//! frequencies come from `sysinfo`.

use std::fs;
use std::path::PathBuf;

use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::metrics::CpuMetrics;
use crate::error::{BarError, Result};

pub const DEFAULT_PROC_STAT: &str = "/proc/stat";

/// Cumulative ticks for one `cpu`/`cpuN` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub idle: u64,
    pub total: u64,
}

/// Parse every `cpu*` line of `/proc/stat`. The aggregate line comes first.
pub fn parse_proc_stat(contents: &str) -> Vec<CpuTimes> {
    contents
        .lines()
        .filter(|line| line.starts_with("cpu"))
        .filter_map(|line| {
            let fields: Vec<u64> = line
                .split_whitespace()
                .skip(1)
                .map_while(|f| f.parse().ok())
                .collect();
            if fields.len() < 4 {
                return None;
            }
            // user nice system idle iowait irq softirq steal ...
            let idle = fields[3].saturating_add(fields.get(4).copied().unwrap_or(0));
            Some(CpuTimes {
                idle,
                total: fields.iter().fold(0u64, |acc, f| acc.saturating_add(*f)),
            })
        })
        .collect()
}

/// Usage percentages (aggregate first) and a tooltip listing them.
///
/// Without a compatible previous snapshot every entry is `0.0`.
pub fn cpu_usage(previous: &[CpuTimes], current: &[CpuTimes]) -> (Vec<f32>, String) {
    let comparable = previous.len() == current.len();
    let usage: Vec<f32> = current
        .iter()
        .enumerate()
        .map(|(i, curr)| {
            if !comparable {
                return 0.0;
            }
            let prev = previous[i];
            let total = curr.total.saturating_sub(prev.total);
            let idle = curr.idle.saturating_sub(prev.idle);
            if total == 0 {
                0.0
            } else {
                (100.0 * (1.0 - idle as f64 / total as f64)).clamp(0.0, 100.0) as f32
            }
        })
        .collect();

    let mut tooltip = String::new();
    for (i, value) in usage.iter().enumerate() {
        if i == 0 {
            tooltip.push_str(&format!("Total: {:.1}%", value));
        } else {
            tooltip.push_str(&format!("\nCore{}: {:.1}%", i - 1, value));
        }
    }

    (usage, tooltip)
}

/// `(max, min, avg)` in GHz from per-core MHz values.
pub fn frequency_summary(frequencies_mhz: &[u64]) -> (f64, f64, f64) {
    if frequencies_mhz.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let to_ghz = |mhz: f64| ((mhz / 1000.0) * 100.0).round() / 100.0;
    let max = frequencies_mhz.iter().copied().max().unwrap_or(0);
    let min = frequencies_mhz.iter().copied().min().unwrap_or(0);
    let avg = frequencies_mhz.iter().sum::<u64>() as f64 / frequencies_mhz.len() as f64;
    (to_ghz(max as f64), to_ghz(min as f64), to_ghz(avg))
}

pub struct CpuSampler {
    stat_path: PathBuf,
    prev_times: Vec<CpuTimes>,
    system: System,
}

impl CpuSampler {
    pub fn new() -> Self {
        Self::with_stat_path(DEFAULT_PROC_STAT)
    }

    pub fn with_stat_path<P: Into<PathBuf>>(stat_path: P) -> Self {
        let refresh_kind =
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_frequency());
        Self {
            stat_path: stat_path.into(),
            prev_times: Vec::new(),
            system: System::new_with_specifics(refresh_kind),
        }
    }

    pub fn sample(&mut self) -> Result<CpuMetrics> {
        let contents =
            fs::read_to_string(&self.stat_path).map_err(|e| BarError::io(&self.stat_path, e))?;
        let current = parse_proc_stat(&contents);
        if current.is_empty() {
            return Err(BarError::parse(&self.stat_path, "no cpu lines"));
        }

        let (usage, usage_tooltip) = cpu_usage(&self.prev_times, &current);
        self.prev_times = current;

        self.system.refresh_cpu_frequency();
        let frequencies: Vec<u64> = self.system.cpus().iter().map(|cpu| cpu.frequency()).collect();
        let (max_frequency_ghz, min_frequency_ghz, avg_frequency_ghz) =
            frequency_summary(&frequencies);

        let load = System::load_average();

        Ok(CpuMetrics {
            load_average: (load.one, load.five, load.fifteen),
            usage,
            usage_tooltip,
            max_frequency_ghz,
            min_frequency_ghz,
            avg_frequency_ghz,
        })
    }
}

impl Default for CpuSampler {
    fn default() -> Self {
        Self::new()
    }
}
