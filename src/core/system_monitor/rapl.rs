//! CPU package/core power derived from RAPL energy counters.
//!
//! The powercap interface exposes cumulative energy in microjoules. Power is
//! the energy delta between two samples divided by the elapsed time. The
//! counters wrap at `max_energy_range_uj`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::metrics::PowerMetrics;
use super::sysfs::read_uint;
use crate::error::{BarError, Result};

pub const DEFAULT_RAPL_DIR: &str = "/sys/class/powercap/intel-rapl:0";

const MICROJOULES_PER_JOULE: f64 = 1_000_000.0;

/// Cumulative energy counters taken at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyReading {
    pub package_uj: u64,
    pub core_uj: u64,
    pub at: Instant,
}

/// Energy consumed between two counter values.
///
/// A delta larger than half the counter range is taken to mean the counter
/// wrapped, and the range is added back.
pub fn energy_delta(previous: u64, current: u64, max_range: Option<u64>) -> u64 {
    let delta = current.wrapping_sub(previous);
    match max_range {
        Some(max) if delta > max / 2 => delta.wrapping_add(max),
        _ => delta,
    }
}

/// Power between two readings, zero when no time has passed.
pub fn power_between(
    previous: &EnergyReading,
    current: &EnergyReading,
    max_range: Option<u64>,
) -> PowerMetrics {
    let seconds = current
        .at
        .saturating_duration_since(previous.at)
        .as_secs_f64();
    if seconds <= 0.0 {
        return PowerMetrics::default();
    }

    let package = energy_delta(previous.package_uj, current.package_uj, max_range);
    let core = energy_delta(previous.core_uj, current.core_uj, max_range);

    PowerMetrics::new(
        package as f64 / MICROJOULES_PER_JOULE / seconds,
        core as f64 / MICROJOULES_PER_JOULE / seconds,
    )
}

/// Samples package and core power, keeping the previous reading for deltas.
#[derive(Debug)]
pub struct RaplSampler {
    package_path: PathBuf,
    core_path: PathBuf,
    max_range_path: PathBuf,
    previous: Option<EnergyReading>,
}

impl RaplSampler {
    /// Fails with [`BarError::MissingResource`] unless the package energy,
    /// core energy and max energy range files all exist.
    pub fn new(sysfs_dir: &str) -> Result<Self> {
        let [package_path, core_path, max_range_path] = Self::paths_for(sysfs_dir);
        let sampler = Self {
            package_path,
            core_path,
            max_range_path,
            previous: None,
        };

        for path in sampler.required_paths() {
            if !path.exists() {
                return Err(BarError::missing_resource(format!(
                    "RAPL sysfs file not found: {}",
                    path.display()
                )));
            }
        }

        Ok(sampler)
    }

    /// Package energy, core energy and max energy range files under
    /// `sysfs_dir` (the core domain is the `:0` sibling directory).
    pub fn paths_for(sysfs_dir: &str) -> [PathBuf; 3] {
        let dir = sysfs_dir.trim_end_matches('/');
        [
            PathBuf::from(format!("{}/energy_uj", dir)),
            PathBuf::from(format!("{}:0/energy_uj", dir)),
            PathBuf::from(format!("{}:0/max_energy_range_uj", dir)),
        ]
    }

    pub fn required_paths(&self) -> [&Path; 3] {
        [&self.package_path, &self.core_path, &self.max_range_path]
    }

    pub fn sample(&mut self) -> Result<PowerMetrics> {
        self.sample_at(Instant::now())
    }

    /// Take a reading stamped with `now`.
    ///
    /// The first reading reports zero power. Failing to read the package or
    /// core counter is an error and leaves the previous reading untouched.
    pub fn sample_at(&mut self, now: Instant) -> Result<PowerMetrics> {
        let current = EnergyReading {
            package_uj: read_uint(&self.package_path)?,
            core_uj: read_uint(&self.core_path)?,
            at: now,
        };

        let power = match self.previous {
            None => PowerMetrics::default(),
            Some(previous) => {
                let max_range = match read_uint(&self.max_range_path) {
                    Ok(max) => Some(max),
                    Err(e) => {
                        log::debug!("Skipping RAPL wraparound correction: {}", e);
                        None
                    }
                };
                power_between(&previous, &current, max_range)
            }
        };

        self.previous = Some(current);
        Ok(power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fake_rapl(root: &Path) -> String {
        let dir = root.join("intel-rapl:0");
        let core = root.join("intel-rapl:0:0");
        fs::create_dir_all(&dir).unwrap();
        fs::create_dir_all(&core).unwrap();
        fs::write(dir.join("energy_uj"), "1000000\n").unwrap();
        fs::write(core.join("energy_uj"), "400000\n").unwrap();
        fs::write(core.join("max_energy_range_uj"), "262143328850\n").unwrap();
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_energy_delta_plain() {
        assert_eq!(energy_delta(100, 350, Some(1000)), 250);
        assert_eq!(energy_delta(100, 350, None), 250);
    }

    #[test]
    fn test_energy_delta_wraparound() {
        assert_eq!(energy_delta(900, 50, Some(1000)), 150);
        // Without a range the unsigned difference is used as-is.
        assert_eq!(energy_delta(900, 50, None), 50u64.wrapping_sub(900));
    }

    #[test]
    fn test_power_between_wraparound() {
        let start = Instant::now();
        let prev = EnergyReading {
            package_uj: 900,
            core_uj: 100,
            at: start,
        };
        let curr = EnergyReading {
            package_uj: 50,
            core_uj: 150,
            at: start + Duration::from_secs(1),
        };
        let power = power_between(&prev, &curr, Some(1000));
        assert!((power.package_watts - 0.00015).abs() < 1e-12);
        assert!((power.core_watts - 0.00005).abs() < 1e-12);
        assert!((power.other_watts - 0.0001).abs() < 1e-12);
    }

    #[test]
    fn test_power_between_zero_elapsed() {
        let at = Instant::now();
        let reading = EnergyReading {
            package_uj: 10,
            core_uj: 5,
            at,
        };
        let later = EnergyReading {
            package_uj: 5_000_000,
            ..reading
        };
        assert_eq!(power_between(&reading, &later, None), PowerMetrics::default());
    }

    #[test]
    fn test_new_requires_all_files() {
        let root = TempDir::new().unwrap();
        let dir = fake_rapl(root.path());
        assert!(RaplSampler::new(&dir).is_ok());

        fs::remove_file(root.path().join("intel-rapl:0:0/max_energy_range_uj")).unwrap();
        let err = RaplSampler::new(&dir).unwrap_err();
        assert!(matches!(err, BarError::MissingResource(_)));
    }

    #[test]
    fn test_first_sample_is_zero_then_delta() {
        let root = TempDir::new().unwrap();
        let dir = fake_rapl(root.path());
        let mut sampler = RaplSampler::new(&dir).unwrap();

        let start = Instant::now();
        assert_eq!(sampler.sample_at(start).unwrap(), PowerMetrics::default());

        fs::write(root.path().join("intel-rapl:0/energy_uj"), "21000000\n").unwrap();
        fs::write(root.path().join("intel-rapl:0:0/energy_uj"), "8400000\n").unwrap();
        let power = sampler.sample_at(start + Duration::from_secs(2)).unwrap();
        assert!((power.package_watts - 10.0).abs() < 1e-9);
        assert!((power.core_watts - 4.0).abs() < 1e-9);
        assert!((power.other_watts - 6.0).abs() < 1e-9);
        assert_eq!(power.state_input(), 10);
    }

    #[test]
    fn test_unreadable_counter_is_an_error() {
        let root = TempDir::new().unwrap();
        let dir = fake_rapl(root.path());
        let mut sampler = RaplSampler::new(&dir).unwrap();
        fs::write(root.path().join("intel-rapl:0/energy_uj"), "garbage\n").unwrap();
        assert!(sampler.sample().is_err());
    }

    #[test]
    fn test_state_input_is_clamped() {
        assert_eq!(PowerMetrics::new(1000.0, 0.0).state_input(), 255);
        assert_eq!(PowerMetrics::new(-4.0, 0.0).state_input(), 0);
        assert_eq!(PowerMetrics::new(42.9, 0.0).state_input(), 42);
    }
}
