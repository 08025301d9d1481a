use std::time::Duration;

use super::label::Label;
use crate::core::config::ModuleConfig;
use crate::core::display::DisplaySurface;
use crate::core::system_monitor::{CpuMetrics, CpuSampler};
use crate::core::template::{TemplateArgs, TemplateValue};
use crate::error::Result;

pub const DEFAULT_FORMAT: &str = "{usage}%";
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Load, usage (aggregate and per core) and frequency.
pub struct CpuModule {
    label: Label,
    sampler: CpuSampler,
}

impl CpuModule {
    pub fn new(name: &str, config: ModuleConfig, surface: Box<dyn DisplaySurface>) -> Result<Self> {
        let sampler = match config.stat_path {
            Some(ref path) => CpuSampler::with_stat_path(path),
            None => CpuSampler::new(),
        };
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

    /// Tokens: `load`, `usage`, `icon`, `{max,min,avg}_frequency`, and
    /// `usageN`/`iconN` for every sampled core.
    pub fn template_args(&self, metrics: &CpuMetrics, state: &str) -> TemplateArgs {
        let total = metrics.total_usage();
        let mut args = TemplateArgs::new();
        args.insert("load", metrics.load_average.0)
            .insert("usage", TemplateValue::Fixed4(f64::from(total)))
            .insert("icon", self.label.icon(percent(total), state))
            .insert("max_frequency", metrics.max_frequency_ghz)
            .insert("min_frequency", metrics.min_frequency_ghz)
            .insert("avg_frequency", metrics.avg_frequency_ghz);

        for (core, usage) in metrics.per_core_usage().iter().enumerate() {
            args.insert(format!("usage{}", core), TemplateValue::Fixed4(f64::from(*usage)))
                .insert(format!("icon{}", core), self.label.icon(percent(*usage), state));
        }
        args
    }

    pub fn on_tick(&mut self) -> Result<()> {
        let metrics = match self.sampler.sample() {
            Ok(metrics) => metrics,
            Err(e) => {
                self.label.hide();
                self.label.after_update();
                return Err(e);
            }
        };

        let state = self.label.state(f64::from(percent(metrics.total_usage())));
        let args = self.template_args(&metrics, &state);
        let tooltip = self
            .label
            .tooltip_text(&args, || metrics.usage_tooltip.clone());
        let result = self.label.render(&state, &args, tooltip.as_deref());
        self.label.after_update();
        result
    }
}

fn percent(usage: f32) -> u16 {
    usage.round().clamp(0.0, f32::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BarConfig;
    use crate::core::display::MemorySurface;
    use crate::core::template::render;

    fn module(json: &str) -> (CpuModule, MemorySurface) {
        let config = BarConfig::from_json(json).unwrap().module_config("cpu");
        let surface = MemorySurface::new();
        let module = CpuModule::new("cpu", config, Box::new(surface.clone())).unwrap();
        (module, surface)
    }

    fn metrics() -> CpuMetrics {
        CpuMetrics {
            load_average: (0.5, 0.4, 0.3),
            usage: vec![37.2, 10.0, 64.5],
            usage_tooltip: "Total: 37.2%".to_string(),
            max_frequency_ghz: 3.6,
            min_frequency_ghz: 0.8,
            avg_frequency_ghz: 2.2,
        }
    }

    #[test]
    fn test_per_core_tokens() {
        let (cpu, _) = module(r#"{"cpu": {}}"#);
        let args = cpu.template_args(&metrics(), "");
        assert_eq!(
            render("{usage}% {usage0} {usage1}", &args).unwrap(),
            "37.2% 10.0 64.5"
        );
        assert!(render("{usage2}", &args).is_err());
        assert_eq!(render("{load} {max_frequency}GHz", &args).unwrap(), "0.5 3.6GHz");
    }

    #[test]
    fn test_core_icons() {
        let (cpu, _) = module(r#"{"cpu": {"format-icons": ["▁", "▄", "█"]}}"#);
        let args = cpu.template_args(&metrics(), "");
        assert_eq!(render("{icon}{icon0}{icon1}", &args).unwrap(), "▄▁▄");
    }

    #[test]
    fn test_on_tick_with_unreadable_stat_hides() {
        let (mut cpu, surface) = module(r#"{"cpu": {"stat-path": "/nonexistent/stat"}}"#);
        assert!(cpu.on_tick().is_err());
        assert!(!surface.snapshot().visible);
        assert_eq!(cpu.label().ticks(), 1);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(37.5), 38);
        assert_eq!(percent(-1.0), 0);
    }
}
