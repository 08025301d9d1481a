use std::fs;

use barmon::core::display::MemorySurface;
use barmon::{BarConfig, BarModule};
use tempfile::TempDir;

fn gpu_config(dir: &TempDir, extra: &str) -> BarConfig {
    let json = format!(
        r#"{{"gpu": {{"gpu-usage-path": {:?}, "vram-used-path": {:?} {}}}}}"#,
        dir.path().join("gpu_busy_percent").to_string_lossy(),
        dir.path().join("mem_info_vram_used").to_string_lossy(),
        extra
    );
    BarConfig::from_json(&json).unwrap()
}

#[test]
fn test_gpu_end_to_end() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("gpu_busy_percent"), "42\n").unwrap();
    fs::write(dir.path().join("mem_info_vram_used"), "1073741824\n").unwrap();

    let config = gpu_config(&dir, r#", "format": "{gpuUsage}% {vramUsed:.2f}GB""#);
    let surface = MemorySurface::new();
    let mut module =
        BarModule::construct("gpu", config.module_config("gpu"), Box::new(surface.clone()))
            .unwrap();

    module.on_tick().unwrap();
    let state = surface.snapshot();
    assert!(state.visible);
    assert_eq!(state.text, "42% 1.00GB");
    assert_eq!(state.tooltip.as_deref(), Some("GPU: 42% VRAM: 1.00GB"));
}

#[test]
fn test_gpu_updates_follow_sysfs() {
    let dir = TempDir::new().unwrap();
    let usage = dir.path().join("gpu_busy_percent");
    fs::write(&usage, "5\n").unwrap();

    let config = gpu_config(&dir, r#", "states": {"busy": 50}, "format-busy": """#);
    let surface = MemorySurface::new();
    let mut module =
        BarModule::construct("gpu", config.module_config("gpu"), Box::new(surface.clone()))
            .unwrap();

    module.on_tick().unwrap();
    assert_eq!(surface.snapshot().text, "5%");

    // An empty state format hides the module.
    fs::write(&usage, "80\n").unwrap();
    module.on_tick().unwrap();
    assert!(!surface.snapshot().visible);

    fs::write(&usage, "20\n").unwrap();
    module.on_tick().unwrap();
    assert!(surface.snapshot().visible);
    assert_eq!(surface.snapshot().text, "20%");
}
