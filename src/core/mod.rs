// Core logic: configuration, rendering, samplers and module controllers

pub mod config;
pub mod display;
pub mod modules;
pub mod runtime;
pub mod state;
pub mod system_monitor;
pub mod template;

// Re-export commonly used items
pub use config::{BarConfig, ModuleConfig};
pub use display::{DisplaySurface, JsonLineSurface, MemorySurface, SurfaceState};
pub use modules::{BarModule, ModuleKind};
pub use runtime::BarRuntime;
pub use state::StateTable;
pub use template::{render, TemplateArgs, TemplateError, TemplateValue};
