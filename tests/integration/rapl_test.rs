use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use barmon::core::display::MemorySurface;
use barmon::core::modules::RaplModule;
use barmon::core::system_monitor::RaplSampler;
use barmon::{BarConfig, BarError, BarModule};
use tempfile::TempDir;

fn write_counters(root: &Path, package: u64, core: u64) {
    fs::write(root.join("intel-rapl:0/energy_uj"), format!("{}\n", package)).unwrap();
    fs::write(root.join("intel-rapl:0:0/energy_uj"), format!("{}\n", core)).unwrap();
}

fn fake_rapl(root: &Path, max_range: u64) -> String {
    fs::create_dir_all(root.join("intel-rapl:0")).unwrap();
    fs::create_dir_all(root.join("intel-rapl:0:0")).unwrap();
    write_counters(root, 0, 0);
    fs::write(
        root.join("intel-rapl:0:0/max_energy_range_uj"),
        format!("{}\n", max_range),
    )
    .unwrap();
    root.join("intel-rapl:0").to_string_lossy().into_owned()
}

#[test]
fn test_rapl_wraparound() {
    let root = TempDir::new().unwrap();
    let dir = fake_rapl(root.path(), 1000);
    write_counters(root.path(), 900, 100);

    let mut sampler = RaplSampler::new(&dir).unwrap();
    let start = Instant::now();
    sampler.sample_at(start).unwrap();

    write_counters(root.path(), 50, 150);
    let power = sampler.sample_at(start + Duration::from_secs(1)).unwrap();
    assert!((power.package_watts - 0.00015).abs() < 1e-12);
    assert!((power.core_watts - 0.00005).abs() < 1e-12);
}

#[test]
fn test_rapl_without_max_range_skips_correction() {
    let root = TempDir::new().unwrap();
    let dir = fake_rapl(root.path(), 1000);
    let mut sampler = RaplSampler::new(&dir).unwrap();

    fs::write(root.path().join("intel-rapl:0:0/max_energy_range_uj"), "n/a\n").unwrap();

    let start = Instant::now();
    sampler.sample_at(start).unwrap();
    write_counters(root.path(), 2_000_000, 1_000_000);
    let power = sampler.sample_at(start + Duration::from_secs(2)).unwrap();
    assert!((power.package_watts - 1.0).abs() < 1e-9);
    assert!((power.other_watts - 0.5).abs() < 1e-9);
}

#[test]
fn test_rapl_construction_fails_without_sysfs() {
    let root = TempDir::new().unwrap();
    let json = format!(
        r#"{{"rapl": {{"sysfs-dir": {:?}}}}}"#,
        root.path().join("intel-rapl:0").to_string_lossy()
    );
    let config = BarConfig::from_json(&json).unwrap();
    let err = BarModule::construct(
        "rapl",
        config.module_config("rapl"),
        Box::new(MemorySurface::new()),
    )
    .err()
    .unwrap();
    assert!(matches!(err, BarError::MissingResource(_)));
}

#[test]
fn test_rapl_module_renders_power() {
    let root = TempDir::new().unwrap();
    let dir = fake_rapl(root.path(), 262_143_328_850);
    let json = format!(
        r#"{{"rapl": {{"sysfs-dir": {:?}, "format": "{{power}}W ({{core_power}}+{{other_power}})", "tooltip": false}}}}"#,
        dir
    );
    let config = BarConfig::from_json(&json).unwrap();
    let surface = MemorySurface::new();
    let mut module = RaplModule::new("rapl", config.module_config("rapl"), Box::new(surface.clone()))
        .unwrap();

    let start = Instant::now();
    module.on_tick_at(start).unwrap();
    assert_eq!(surface.snapshot().text, "0.00W (0.00+0.00)");

    write_counters(root.path(), 250_000_000, 50_000_000);
    module.on_tick_at(start + Duration::from_secs(2)).unwrap();
    let state = surface.snapshot();
    assert_eq!(state.text, " 125W (25.0+ 100)");
    assert_eq!(state.tooltip, None);
}
