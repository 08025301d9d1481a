//! Presentation sinks that receive rendered module output.

use std::io::Write;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;

/// Where a module publishes its rendered text.
///
/// Implementations must be usable from the thread the module ticks on.
pub trait DisplaySurface: Send {
    fn show(&mut self, text: &str);

    fn hide(&mut self);

    fn set_tooltip(&mut self, text: &str);

    /// Current state bucket, for styling. Empty when no state matched.
    fn set_class(&mut self, _state: &str) {}
}

/// Last published output of a surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurfaceState {
    pub text: String,
    pub tooltip: Option<String>,
    pub class: String,
    pub visible: bool,
}

/// Keeps the latest state in memory, shared through [`MemorySurface::handle`].
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Arc<Mutex<SurfaceState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> SurfaceState {
        self.state.lock().clone()
    }
}

impl DisplaySurface for MemorySurface {
    fn show(&mut self, text: &str) {
        let mut state = self.state.lock();
        state.text = text.to_string();
        state.visible = true;
    }

    fn hide(&mut self) {
        let mut state = self.state.lock();
        state.text.clear();
        state.tooltip = None;
        state.visible = false;
    }

    fn set_tooltip(&mut self, text: &str) {
        self.state.lock().tooltip = Some(text.to_string());
    }

    fn set_class(&mut self, state: &str) {
        self.state.lock().class = state.to_string();
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    module: &'a str,
    #[serde(flatten)]
    state: &'a SurfaceState,
}

/// Writes one JSON object per update, e.g.
/// `{"module":"cpu","text":"12%","tooltip":null,"class":"","visible":true}`.
///
/// Text and class are buffered until `show`/`hide`, which emit the line.
pub struct JsonLineSurface {
    module: String,
    state: SurfaceState,
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl JsonLineSurface {
    pub fn new<S: Into<String>>(module: S, out: Arc<Mutex<Box<dyn Write + Send>>>) -> Self {
        Self {
            module: module.into(),
            state: SurfaceState::default(),
            out,
        }
    }

    /// Surface writing to stdout.
    pub fn stdout<S: Into<String>>(module: S) -> Self {
        Self::new(module, shared_stdout())
    }

    fn emit(&self) {
        let line = JsonLine {
            module: &self.module,
            state: &self.state,
        };
        let json = match serde_json::to_string(&line) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize output for {}: {}", self.module, e);
                return;
            }
        };
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", json).and_then(|_| out.flush()) {
            log::error!("Failed to write output for {}: {}", self.module, e);
        }
    }
}

impl DisplaySurface for JsonLineSurface {
    fn show(&mut self, text: &str) {
        self.state.text = text.to_string();
        self.state.visible = true;
        self.emit();
    }

    fn hide(&mut self) {
        self.state.text.clear();
        self.state.tooltip = None;
        self.state.visible = false;
        self.emit();
    }

    fn set_tooltip(&mut self, text: &str) {
        self.state.tooltip = Some(text.to_string());
    }

    fn set_class(&mut self, state: &str) {
        self.state.class = state.to_string();
    }
}

static STDOUT: Lazy<Arc<Mutex<Box<dyn Write + Send>>>> =
    Lazy::new(|| Arc::new(Mutex::new(Box::new(std::io::stdout()))));

/// Process-wide stdout handle shared by every [`JsonLineSurface`].
pub fn shared_stdout() -> Arc<Mutex<Box<dyn Write + Send>>> {
    Arc::clone(&STDOUT)
}
