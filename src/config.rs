use crate::zones::{LeftZoneMode, ZoneGeometry};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Файл триггеров по умолчанию: `<config_dir>/lead/lead.toml`
static DEFAULT_SETTINGS_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lead");
    path.push("lead.toml");
    path
});

/// Конфигурация самого демона. Триггеры зон хранятся отдельно, в файле
/// настроек (`settings.path`), который пользователь правит на лету.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub settings: SettingsConfig,
    pub sensors: SensorsConfig,
    pub monitors: MonitorsConfig,
    pub pointer: PointerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorsConfig {
    /// Толщина краевых полос и сторона угловых квадратов
    pub thickness: u32,
    #[serde(default)]
    pub left_zone: LeftZoneMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorsConfig {
    pub detection_mode: String,
    pub polling_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PointerConfig {
    pub polling_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            settings: SettingsConfig::default(),
            sensors: SensorsConfig {
                thickness: 5,
                left_zone: LeftZoneMode::Symmetric,
            },
            monitors: MonitorsConfig {
                detection_mode: "auto".to_string(),
                polling_interval_ms: 2000,
            },
            pointer: PointerConfig {
                polling_interval_ms: 50,
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("LEAD_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "full" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.sensors.thickness == 0 {
            anyhow::bail!("sensors.thickness должно быть больше 0");
        }

        match self.monitors.detection_mode.as_str() {
            "auto" | "xrandr" | "sway" => {}
            _ => anyhow::bail!(
                "Неверный режим детекции мониторов: {}",
                self.monitors.detection_mode
            ),
        }

        if self.monitors.polling_interval_ms < 100 {
            anyhow::bail!("monitors.polling_interval_ms должно быть минимум 100");
        }

        if self.pointer.polling_interval_ms < 10 {
            anyhow::bail!("pointer.polling_interval_ms должно быть минимум 10");
        }

        Ok(())
    }

    /// Путь к файлу триггеров с учётом значения по умолчанию
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.clone())
    }

    pub fn zone_geometry(&self) -> ZoneGeometry {
        ZoneGeometry::new(self.sensors.thickness, self.sensors.left_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.settings_path().ends_with("lead/lead.toml"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lead-daemon.toml");
        fs::write(
            &path,
            "[sensors]\nthickness = 8\nleft_zone = \"legacy\"\n\n[settings]\npath = \"/tmp/triggers.toml\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.sensors.thickness, 8);
        assert_eq!(config.sensors.left_zone, LeftZoneMode::Legacy);
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/triggers.toml"));
        assert_eq!(config.pointer.polling_interval_ms, 50);
        assert_eq!(config.zone_geometry(), ZoneGeometry::new(8, LeftZoneMode::Legacy));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.sensors.thickness, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.sensors.thickness = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.monitors.detection_mode = "wayland-magic".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pointer.polling_interval_ms = 1;
        assert!(config.validate().is_err());
    }
}
