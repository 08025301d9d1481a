use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc;

use anyhow::Result;

use crate::core::display::JsonLineSurface;
use crate::core::modules::BarModule;
use crate::core::runtime::BarRuntime;
use crate::core::BarConfig;

enum Control {
    Toggle(String),
    Stop,
}

/// Run every configured module until Ctrl+C.
///
/// Each update is written to stdout as one JSON line. A line on stdin naming
/// a module toggles its alt mode.
pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let config = BarConfig::load(matches.get_one::<String>("config").map(Path::new))?;

    let mut modules = Vec::new();
    for name in config.module_names() {
        let surface = JsonLineSurface::stdout(name.as_str());
        match BarModule::construct(&name, config.module_config(&name), Box::new(surface)) {
            Ok(module) => modules.push(module),
            Err(e) => log::error!("Skipping module {}: {}", name, e),
        }
    }

    if modules.is_empty() {
        anyhow::bail!("No module could be started");
    }

    let runtime = BarRuntime::start(modules)?;

    let (control_tx, control_rx) = mpsc::channel::<Control>();

    let stop_tx = control_tx.clone();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(Control::Stop);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let name = line.trim();
            if name.is_empty() {
                continue;
            }
            if control_tx.send(Control::Toggle(name.to_string())).is_err() {
                break;
            }
        }
    });

    while let Ok(control) = control_rx.recv() {
        match control {
            Control::Toggle(name) => {
                if let Err(e) = runtime.toggle_alt(&name) {
                    log::warn!("{}", e);
                }
            }
            Control::Stop => break,
        }
    }

    runtime.shutdown();
    Ok(())
}
