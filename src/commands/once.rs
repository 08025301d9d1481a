use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::display::MemorySurface;
use crate::core::modules::{BarModule, ModuleKind};
use crate::core::BarConfig;

/// Pause between the two ticks of modules that report deltas.
const DELTA_PAUSE: Duration = Duration::from_millis(500);

/// Construct one module, tick it and print what it would display.
pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("module")
        .context("Missing module name")?;
    let config = BarConfig::load(matches.get_one::<String>("config").map(Path::new))?;

    let surface = MemorySurface::new();
    let mut module = BarModule::construct(name, config.module_config(name), Box::new(surface.clone()))
        .with_context(|| format!("Failed to construct module {}", name))?;

    module.on_tick()?;
    if matches!(module.kind(), ModuleKind::Cpu | ModuleKind::Rapl) {
        std::thread::sleep(DELTA_PAUSE);
        module.on_tick()?;
    }

    let state = surface.snapshot();
    if !state.visible {
        println!("{}", "(hidden)".dimmed());
        return Ok(());
    }

    println!("{}", state.text);
    if !state.class.is_empty() {
        println!("{} {}", "state:".dimmed(), state.class.yellow());
    }
    if let Some(tooltip) = state.tooltip {
        println!("{}", "tooltip:".dimmed());
        for line in tooltip.lines() {
            println!("  {}", line);
        }
    }
    Ok(())
}
