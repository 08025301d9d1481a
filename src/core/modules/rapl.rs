use std::time::{Duration, Instant};

use super::label::Label;
use crate::core::config::ModuleConfig;
use crate::core::display::DisplaySurface;
use crate::core::system_monitor::{PowerMetrics, RaplSampler, DEFAULT_RAPL_DIR};
use crate::core::template::{TemplateArgs, TemplateValue};
use crate::error::Result;

pub const DEFAULT_FORMAT: &str = "{power}W";
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// CPU package, core and uncore ("other") power from RAPL energy counters.
pub struct RaplModule {
    label: Label,
    sampler: RaplSampler,
}

impl RaplModule {
    /// Fails when the RAPL sysfs files are missing.
    pub fn new(name: &str, config: ModuleConfig, surface: Box<dyn DisplaySurface>) -> Result<Self> {
        let sampler = RaplSampler::new(config.sysfs_dir.as_deref().unwrap_or(DEFAULT_RAPL_DIR))?;
        let label = Label::new(name, config, DEFAULT_FORMAT, DEFAULT_INTERVAL_SECS, surface);
        Ok(Self { label, sampler })
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn interval(&self) -> Duration {
        self.label.interval()
    }

    pub fn template_args(&self, power: &PowerMetrics, state: &str) -> TemplateArgs {
        let mut args = TemplateArgs::new();
        args.insert("power", TemplateValue::Fixed4(power.package_watts))
            .insert("core_power", TemplateValue::Fixed4(power.core_watts))
            .insert("other_power", TemplateValue::Fixed4(power.other_watts))
            .insert("icon", self.label.icon(u16::from(power.state_input()), state));
        args
    }

    pub fn on_tick(&mut self) -> Result<()> {
        self.on_tick_at(Instant::now())
    }

    /// Tick using `now` as the sample timestamp.
    pub fn on_tick_at(&mut self, now: Instant) -> Result<()> {
        let power = match self.sampler.sample_at(now) {
            Ok(power) => power,
            Err(e) => {
                self.label.hide();
                self.label.after_update();
                return Err(e);
            }
        };

        let state = self.label.state(f64::from(power.state_input()));
        let args = self.template_args(&power, &state);
        let tooltip = self.label.tooltip_text(&args, || {
            format!(
                "Package: {:.2}W\nCore: {:.2}W\nOther: {:.2}W",
                power.package_watts, power.core_watts, power.other_watts
            )
        });
        let result = self.label.render(&state, &args, tooltip.as_deref());
        self.label.after_update();
        result
    }
}
