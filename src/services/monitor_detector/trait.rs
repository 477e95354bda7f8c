use crate::config::Config;
use crate::error::Result;
use crate::events::Monitor;
use std::sync::Arc;
use tracing::info;

use super::dry_run::DryRunMonitorSource;
use super::sway::SwayMonitorSource;
use super::xrandr::XrandrMonitorSource;

/// Источник списка подключённых мониторов. Каждый вызов перечисляет их заново.
pub trait MonitorSource: Send + Sync {
    fn enumerate(&self) -> Result<Vec<Monitor>>;
}

/// Factory function to create a monitor source based on the config and the dry_run flag
pub fn create_monitor_source(config: &Config, dry_run: bool) -> Result<Arc<dyn MonitorSource>> {
    if dry_run {
        return Ok(Arc::new(DryRunMonitorSource::new()));
    }

    let mode = match config.monitors.detection_mode.as_str() {
        "auto" if std::env::var_os("SWAYSOCK").is_some() => "sway",
        "auto" => "xrandr",
        other => other,
    };
    info!("Источник мониторов: {}", mode);

    match mode {
        "sway" => Ok(Arc::new(SwayMonitorSource::new())),
        "xrandr" => Ok(Arc::new(XrandrMonitorSource::new())),
        other => Err(crate::lead_error!(internal, "Неизвестный режим детекции мониторов: {}", other)),
    }
}
