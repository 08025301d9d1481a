//! Controller state shared by every module: template selection, state
//! lookup, icons, tooltip handling and publishing to the display surface.

use std::time::Duration;

use crate::core::config::ModuleConfig;
use crate::core::display::DisplaySurface;
use crate::core::state::StateTable;
use crate::core::template::{self, TemplateArgs};
use crate::error::Result;

pub struct Label {
    name: String,
    config: ModuleConfig,
    format: String,
    states: StateTable,
    interval: Duration,
    alt: bool,
    surface: Box<dyn DisplaySurface>,
    ticks: u64,
}

impl Label {
    pub fn new(
        name: &str,
        config: ModuleConfig,
        default_format: &str,
        default_interval_secs: u64,
        surface: Box<dyn DisplaySurface>,
    ) -> Self {
        let format = config
            .format
            .clone()
            .unwrap_or_else(|| default_format.to_string());
        let interval = Duration::from_secs(config.interval.unwrap_or(default_interval_secs).max(1));
        let states = StateTable::from_map(&config.states);
        let alt = config.alt;

        Self {
            name: name.to_string(),
            config,
            format,
            states,
            interval,
            alt,
            surface,
            ticks: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn binary(&self) -> bool {
        self.config.binary
    }

    pub fn tooltip_enabled(&self) -> bool {
        self.config.tooltip
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_alt(&self) -> bool {
        self.alt
    }

    pub fn set_alt(&mut self, alt: bool) {
        self.alt = alt;
    }

    pub fn toggle_alt(&mut self) {
        self.alt = !self.alt;
        log::debug!("{}: alt mode {}", self.name, if self.alt { "on" } else { "off" });
    }

    /// State bucket for `value`, `""` when none matches.
    pub fn state(&self, value: f64) -> String {
        self.states.resolve(value).to_string()
    }

    /// Active template for `state`.
    ///
    /// In alt mode `format-alt-<state>` then `format-alt` are tried first;
    /// then `format-<state>`, then the base format. `None` means the module
    /// should be hidden.
    pub fn select_format(&self, state: &str) -> Option<&str> {
        if self.alt {
            if !state.is_empty() {
                if let Some(f) = self.config.string(&format!("format-alt-{}", state)) {
                    return Some(f).filter(|f| !f.is_empty());
                }
            }
            if let Some(f) = self.config.format_alt.as_deref() {
                return Some(f).filter(|f| !f.is_empty());
            }
        }

        if !state.is_empty() {
            if let Some(f) = self.config.string(&format!("format-{}", state)) {
                return Some(f).filter(|f| !f.is_empty());
            }
        }

        Some(self.format.as_str()).filter(|f| !f.is_empty())
    }

    /// Icon from `format-icons`, or `""` when none are configured.
    pub fn icon(&self, percentage: u16, state: &str) -> String {
        match self.config.format_icons {
            Some(ref icons) => icons.icon(percentage, &[state]),
            None => String::new(),
        }
    }

    /// Tooltip text: `tooltip-format` rendered with `args` when configured,
    /// otherwise `fallback()`. `None` when tooltips are disabled.
    pub fn tooltip_text<F>(&self, args: &TemplateArgs, fallback: F) -> Option<String>
    where
        F: FnOnce() -> String,
    {
        if !self.tooltip_enabled() {
            return None;
        }
        match self.config.tooltip_format.as_deref() {
            Some(format) => match template::render(format, args) {
                Ok(text) => Some(text),
                Err(e) => {
                    log::warn!("{}: invalid tooltip-format {:?}: {}", self.name, format, e);
                    Some(fallback())
                }
            },
            None => Some(fallback()),
        }
    }

    /// Select the template for `state`, render it and publish the result.
    ///
    /// A template that fails to render hides the module and returns the error.
    pub fn render(&mut self, state: &str, args: &TemplateArgs, tooltip: Option<&str>) -> Result<()> {
        let format = match self.select_format(state) {
            Some(f) => f.to_string(),
            None => {
                self.surface.hide();
                return Ok(());
            }
        };

        match template::render(&format, args) {
            Ok(text) => {
                self.surface.set_class(state);
                if let Some(tooltip) = tooltip {
                    self.surface.set_tooltip(tooltip);
                }
                self.surface.show(&text);
                Ok(())
            }
            Err(e) => {
                log::warn!("{}: cannot render {:?}: {}", self.name, format, e);
                self.surface.hide();
                Err(e.into())
            }
        }
    }

    pub fn hide(&mut self) {
        self.surface.hide();
    }

    /// Shared bookkeeping after every tick.
    pub fn after_update(&mut self) {
        self.ticks += 1;
        log::trace!("{}: tick {} done", self.name, self.ticks);
    }
}
