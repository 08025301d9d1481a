use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Modules started when the config does not name any.
pub const DEFAULT_MODULES: [&str; 3] = ["cpu", "gpu", "rapl"];

fn default_true() -> bool {
    true
}

/// Icons picked by percentage (list) or by state name (map).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatIcons {
    List(Vec<String>),
    Map(BTreeMap<String, IconEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconEntry {
    One(String),
    Many(Vec<String>),
}

fn pick_by_percentage(icons: &[String], percentage: u16) -> String {
    if icons.is_empty() {
        return String::new();
    }
    let step = (100 / icons.len()).max(1);
    let idx = (usize::from(percentage) / step).min(icons.len() - 1);
    icons[idx].clone()
}

impl FormatIcons {
    /// Icon for `percentage`; a map is keyed by the first matching `alts`
    /// entry, falling back to `"default"`.
    pub fn icon(&self, percentage: u16, alts: &[&str]) -> String {
        match self {
            FormatIcons::List(icons) => pick_by_percentage(icons, percentage),
            FormatIcons::Map(map) => {
                let entry = alts
                    .iter()
                    .filter(|alt| !alt.is_empty())
                    .find_map(|alt| map.get(*alt))
                    .or_else(|| map.get("default"));
                match entry {
                    Some(IconEntry::One(icon)) => icon.clone(),
                    Some(IconEntry::Many(icons)) => pick_by_percentage(icons, percentage),
                    None => String::new(),
                }
            }
        }
    }
}

/// Options for one module section, e.g. `"cpu"` or `"gpu#card0"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleConfig {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub format_alt: Option<String>,
    #[serde(default)]
    pub tooltip_format: Option<String>,
    /// Seconds between updates
    #[serde(default)]
    pub interval: Option<u64>,
    #[serde(default = "default_true")]
    pub tooltip: bool,
    /// Use 1024-based units for byte values
    #[serde(default)]
    pub binary: bool,
    /// Start in alternate display mode
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub states: BTreeMap<String, f64>,
    #[serde(default)]
    pub format_icons: Option<FormatIcons>,
    #[serde(default)]
    pub sysfs_dir: Option<String>,
    #[serde(default)]
    pub gpu_usage_path: Option<String>,
    #[serde(default)]
    pub vram_used_path: Option<String>,
    #[serde(default)]
    pub stat_path: Option<String>,
    /// `format-<state>` and `format-alt-<state>` entries
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            format: None,
            format_alt: None,
            tooltip_format: None,
            interval: None,
            tooltip: true,
            binary: false,
            alt: false,
            states: BTreeMap::new(),
            format_icons: None,
            sysfs_dir: None,
            gpu_usage_path: None,
            vram_used_path: None,
            stat_path: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ModuleConfig {
    /// String value of an arbitrary key such as `format-critical`.
    /// Non-string values are ignored.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarConfig {
    /// Module sections to start, in order
    #[serde(default)]
    pub modules: Option<Vec<String>>,
    #[serde(flatten)]
    pub sections: BTreeMap<String, ModuleConfig>,
}

impl BarConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::get_config_path()?;
                if !default_path.exists() {
                    log::debug!("No config at {:?}, using defaults", default_path);
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let data = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        Self::from_json(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(data).with_context(|| "Invalid configuration JSON")
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("barmon").join("config.json"))
    }

    /// Section names to start: `modules` if given, else every section,
    /// else [`DEFAULT_MODULES`].
    pub fn module_names(&self) -> Vec<String> {
        if let Some(ref modules) = self.modules {
            return modules.clone();
        }
        if !self.sections.is_empty() {
            return self.sections.keys().cloned().collect();
        }
        DEFAULT_MODULES.iter().map(|m| m.to_string()).collect()
    }

    /// Options for `name`, defaulted when the section is absent.
    pub fn module_config(&self, name: &str) -> ModuleConfig {
        self.sections.get(name).cloned().unwrap_or_default()
    }
}
