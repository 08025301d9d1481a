use std::time::Duration;

use super::label::Label;
use crate::core::config::ModuleConfig;
use crate::core::display::DisplaySurface;
use crate::core::system_monitor::{
    GpuMetrics, GpuSampler, DEFAULT_GPU_USAGE_PATH, DEFAULT_VRAM_USED_PATH,
};
use crate::core::template::{TemplateArgs, TemplateValue};
use crate::error::Result;
use crate::ui::formatters::PowFormat;

pub const DEFAULT_FORMAT: &str = "{}%";
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// GPU busy percent and VRAM usage.
pub struct GpuModule {
    label: Label,
    sampler: GpuSampler,
}

impl GpuModule {
    pub fn new(name: &str, config: ModuleConfig, surface: Box<dyn DisplaySurface>) -> Result<Self> {
        let sampler = GpuSampler::new(
            config
                .gpu_usage_path
                .as_deref()
                .unwrap_or(DEFAULT_GPU_USAGE_PATH),
            config
                .vram_used_path
                .as_deref()
                .unwrap_or(DEFAULT_VRAM_USED_PATH),
        );
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

    /// Positional usage plus `icon`, `gpuUsage`, `vramUsed` (GiB),
    /// `vramUsedRaw`, `vramUsedSize` and `vramUsedBytes`.
    pub fn template_args(&self, metrics: &GpuMetrics, state: &str) -> TemplateArgs {
        let binary = self.label.binary();
        let percentage = metrics.utilization_percent.clamp(0, i64::from(u16::MAX)) as u16;
        let mut args = TemplateArgs::new();
        args.push(metrics.utilization_percent)
            .insert("icon", self.label.icon(percentage, state))
            .insert("gpuUsage", metrics.utilization_percent)
            .insert("vramUsed", metrics.vram_used_gb)
            .insert("vramUsedRaw", metrics.vram_used_raw.clone())
            .insert(
                "vramUsedSize",
                TemplateValue::Bytes5 {
                    bytes: metrics.vram_used_bytes,
                    binary,
                },
            )
            .insert(
                "vramUsedBytes",
                PowFormat::new(
                    i64::try_from(metrics.vram_used_bytes).unwrap_or(i64::MAX),
                    "B",
                    binary,
                ),
            );
        args
    }

    pub fn on_tick(&mut self) -> Result<()> {
        let metrics = self.sampler.sample();
        let state = self.label.state(metrics.utilization_percent as f64);
        let args = self.template_args(&metrics, &state);
        let tooltip = self.label.tooltip_text(&args, || {
            format!(
                "GPU: {}% VRAM: {:.2}GB",
                metrics.utilization_percent, metrics.vram_used_gb
            )
        });
        let result = self.label.render(&state, &args, tooltip.as_deref());
        self.label.after_update();
        result
    }
}
