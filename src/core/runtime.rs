//! Tokio runtime driving the modules.
//!
//! Every module gets its own task ticking at the module's interval. Tasks stop
//! on the broadcast shutdown signal; alt-mode toggles reach a task through its
//! own mpsc channel.

use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};

use super::modules::BarModule;
use crate::error::{BarError, Result};

const TOGGLE_QUEUE: usize = 8;

pub struct BarRuntime {
    shutdown_tx: broadcast::Sender<()>,
    toggles: HashMap<String, mpsc::Sender<()>>,
    runtime: tokio::runtime::Runtime,
}

impl BarRuntime {
    /// Spawn one ticking task per module.
    pub fn start(modules: Vec<BarModule>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("barmon-worker")
            .build()
            .map_err(|e| BarError::runtime(format!("Failed to build tokio runtime: {}", e)))?;

        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        let mut toggles = HashMap::new();

        for module in modules {
            let (toggle_tx, toggle_rx) = mpsc::channel::<()>(TOGGLE_QUEUE);
            toggles.insert(module.name().to_string(), toggle_tx);
            runtime.spawn(module_task(module, toggle_rx, shutdown_tx.subscribe()));
        }

        log::debug!("Started {} module task(s)", toggles.len());

        Ok(Self {
            shutdown_tx,
            toggles,
            runtime,
        })
    }

    /// Names of the running modules.
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.toggles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Flip alt mode of `name`. The module re-renders right away.
    pub fn toggle_alt(&self, name: &str) -> Result<()> {
        let tx = self
            .toggles
            .get(name)
            .ok_or_else(|| BarError::unknown_module(name))?;
        tx.try_send(())
            .map_err(|e| BarError::runtime(format!("Cannot toggle {}: {}", name, e)))
    }

    /// Signal every task to stop and wait for the runtime to wind down.
    pub fn shutdown(self) {
        log::debug!("Shutting down module tasks");
        let _ = self.shutdown_tx.send(());
        self.runtime
            .shutdown_timeout(std::time::Duration::from_secs(1));
    }
}

async fn module_task(
    mut module: BarModule,
    mut toggle_rx: mpsc::Receiver<()>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(module.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => tick(&mut module),
            Some(()) = toggle_rx.recv() => {
                module.toggle_alt();
                tick(&mut module);
            }
            _ = shutdown.recv() => break,
        }
    }

    log::debug!("{}: task stopped after {} tick(s)", module.name(), module.label().ticks());
}

fn tick(module: &mut BarModule) {
    if let Err(e) = module.on_tick() {
        log::warn!("{}: update failed: {}", module.name(), e);
    }
}
