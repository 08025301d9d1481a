use std::fs;

use barmon::core::ModuleKind;
use barmon::BarConfig;
use tempfile::TempDir;

#[test]
fn test_config_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "modules": ["cpu", "rapl#pkg"],
            "cpu": {"format": "{usage}%", "interval": 2},
            "rapl#pkg": {"sysfs-dir": "/tmp/rapl", "states": {"hot": 40}}
        }"#,
    )
    .unwrap();

    let config = BarConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.module_names(), vec!["cpu", "rapl#pkg"]);
    assert_eq!(config.module_config("cpu").interval, Some(2));

    let rapl = config.module_config("rapl#pkg");
    assert_eq!(rapl.sysfs_dir.as_deref(), Some("/tmp/rapl"));
    assert_eq!(rapl.states.get("hot"), Some(&40.0));
    assert_eq!("rapl#pkg".parse::<ModuleKind>().unwrap(), ModuleKind::Rapl);
}

#[test]
fn test_config_missing_explicit_file_is_error() {
    let dir = TempDir::new().unwrap();
    assert!(BarConfig::load(Some(dir.path().join("nope.json").as_path())).is_err());
}

#[test]
fn test_config_invalid_json_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(BarConfig::load(Some(path.as_path())).is_err());
}

#[test]
fn test_config_absent_section_defaults() {
    let config = BarConfig::from_json(r#"{"cpu": {}}"#).unwrap();
    let gpu = config.module_config("gpu");
    assert!(gpu.format.is_none());
    assert!(gpu.tooltip);
    assert!(!gpu.binary);
}
