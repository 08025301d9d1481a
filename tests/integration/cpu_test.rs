use std::fs;

use barmon::core::display::MemorySurface;
use barmon::{BarConfig, BarModule};
use tempfile::TempDir;

const STAT_BEFORE: &str = "\
cpu  100 0 100 1000 0 0 0 0 0 0
cpu0 50 0 50 500 0 0 0 0 0 0
cpu1 50 0 50 500 0 0 0 0 0 0
intr 1 2 3
";

const STAT_AFTER: &str = "\
cpu  300 0 272 1628 0 0 0 0 0 0
cpu0 75 0 75 950 0 0 0 0 0 0
cpu1 400 0 345 855 0 0 0 0 0 0
intr 4 5 6
";

fn cpu_module(dir: &TempDir, extra: &str) -> (BarModule, MemorySurface) {
    let json = format!(
        r#"{{"cpu": {{"stat-path": {:?} {}}}}}"#,
        dir.path().join("stat").to_string_lossy(),
        extra
    );
    let config = BarConfig::from_json(&json).unwrap();
    let surface = MemorySurface::new();
    let module =
        BarModule::construct("cpu", config.module_config("cpu"), Box::new(surface.clone()))
            .unwrap();
    (module, surface)
}

#[test]
fn test_cpu_usage_per_core() {
    let dir = TempDir::new().unwrap();
    let stat = dir.path().join("stat");
    fs::write(&stat, STAT_BEFORE).unwrap();

    let (mut module, surface) = cpu_module(&dir, r#", "format": "{usage}% {usage0} {usage1}""#);

    module.on_tick().unwrap();
    assert_eq!(surface.snapshot().text, "0.00% 0.00 0.00");

    fs::write(&stat, STAT_AFTER).unwrap();
    module.on_tick().unwrap();
    let state = surface.snapshot();
    assert_eq!(state.text, "37.2% 10.0 64.5");
    assert_eq!(
        state.tooltip.as_deref(),
        Some("Total: 37.2%\nCore0: 10.0%\nCore1: 64.5%")
    );
}

#[test]
fn test_cpu_state_follows_total_usage() {
    let dir = TempDir::new().unwrap();
    let stat = dir.path().join("stat");
    fs::write(&stat, STAT_BEFORE).unwrap();

    let (mut module, surface) = cpu_module(
        &dir,
        r#", "states": {"warning": 30, "critical": 90}, "format-warning": "W {usage}%""#,
    );

    module.on_tick().unwrap();
    assert_eq!(surface.snapshot().class, "");

    fs::write(&stat, STAT_AFTER).unwrap();
    module.on_tick().unwrap();
    let state = surface.snapshot();
    assert_eq!(state.class, "warning");
    assert_eq!(state.text, "W 37.2%");
}

#[test]
fn test_cpu_unbound_core_token_hides() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stat"), STAT_BEFORE).unwrap();

    let (mut module, surface) = cpu_module(&dir, r#", "format": "{usage7}""#);
    assert!(module.on_tick().is_err());
    assert!(!surface.snapshot().visible);
}
