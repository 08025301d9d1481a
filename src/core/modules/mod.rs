//! Bar modules: one controller per metric, all sharing [`Label`].

pub mod cpu;
pub mod gpu;
pub mod label;
pub mod rapl;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::core::config::ModuleConfig;
use crate::core::display::DisplaySurface;
use crate::core::system_monitor::{
    RaplSampler, DEFAULT_GPU_USAGE_PATH, DEFAULT_PROC_STAT, DEFAULT_RAPL_DIR,
    DEFAULT_VRAM_USED_PATH,
};
use crate::error::{BarError, Result};

pub use cpu::CpuModule;
pub use gpu::GpuModule;
pub use label::Label;
pub use rapl::RaplModule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Cpu,
    Gpu,
    Rapl,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 3] = [ModuleKind::Cpu, ModuleKind::Gpu, ModuleKind::Rapl];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Cpu => "cpu",
            ModuleKind::Gpu => "gpu",
            ModuleKind::Rapl => "rapl",
        }
    }

    /// Files the module reads with `config` applied.
    pub fn resource_paths(&self, config: &ModuleConfig) -> Vec<PathBuf> {
        match self {
            ModuleKind::Cpu => vec![PathBuf::from(
                config.stat_path.as_deref().unwrap_or(DEFAULT_PROC_STAT),
            )],
            ModuleKind::Gpu => vec![
                PathBuf::from(
                    config
                        .gpu_usage_path
                        .as_deref()
                        .unwrap_or(DEFAULT_GPU_USAGE_PATH),
                ),
                PathBuf::from(
                    config
                        .vram_used_path
                        .as_deref()
                        .unwrap_or(DEFAULT_VRAM_USED_PATH),
                ),
            ],
            ModuleKind::Rapl => {
                RaplSampler::paths_for(config.sysfs_dir.as_deref().unwrap_or(DEFAULT_RAPL_DIR))
                    .to_vec()
            }
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts instance names such as `cpu#left`; the part after `#` is ignored.
impl FromStr for ModuleKind {
    type Err = BarError;

    fn from_str(name: &str) -> Result<Self> {
        let base = name.split('#').next().unwrap_or(name);
        match base {
            "cpu" => Ok(ModuleKind::Cpu),
            "gpu" => Ok(ModuleKind::Gpu),
            "rapl" => Ok(ModuleKind::Rapl),
            _ => Err(BarError::unknown_module(name)),
        }
    }
}

pub enum BarModule {
    Cpu(CpuModule),
    Gpu(GpuModule),
    Rapl(RaplModule),
}

impl BarModule {
    /// Build the module named `name` (`cpu`, `gpu`, `rapl`, optionally with a
    /// `#instance` suffix).
    pub fn construct(
        name: &str,
        config: ModuleConfig,
        surface: Box<dyn DisplaySurface>,
    ) -> Result<Self> {
        let module = match name.parse::<ModuleKind>()? {
            ModuleKind::Cpu => BarModule::Cpu(CpuModule::new(name, config, surface)?),
            ModuleKind::Gpu => BarModule::Gpu(GpuModule::new(name, config, surface)?),
            ModuleKind::Rapl => BarModule::Rapl(RaplModule::new(name, config, surface)?),
        };
        log::debug!("Constructed module {} ({})", name, module.kind());
        Ok(module)
    }

    pub fn kind(&self) -> ModuleKind {
        match self {
            BarModule::Cpu(_) => ModuleKind::Cpu,
            BarModule::Gpu(_) => ModuleKind::Gpu,
            BarModule::Rapl(_) => ModuleKind::Rapl,
        }
    }

    pub fn label(&self) -> &Label {
        match self {
            BarModule::Cpu(m) => m.label(),
            BarModule::Gpu(m) => m.label(),
            BarModule::Rapl(m) => m.label(),
        }
    }

    pub fn label_mut(&mut self) -> &mut Label {
        match self {
            BarModule::Cpu(m) => m.label_mut(),
            BarModule::Gpu(m) => m.label_mut(),
            BarModule::Rapl(m) => m.label_mut(),
        }
    }

    pub fn name(&self) -> &str {
        self.label().name()
    }

    pub fn interval(&self) -> Duration {
        match self {
            BarModule::Cpu(m) => m.interval(),
            BarModule::Gpu(m) => m.interval(),
            BarModule::Rapl(m) => m.interval(),
        }
    }

    /// Sample and publish once.
    pub fn on_tick(&mut self) -> Result<()> {
        match self {
            BarModule::Cpu(m) => m.on_tick(),
            BarModule::Gpu(m) => m.on_tick(),
            BarModule::Rapl(m) => m.on_tick(),
        }
    }

    pub fn toggle_alt(&mut self) {
        self.label_mut().toggle_alt();
    }
}
