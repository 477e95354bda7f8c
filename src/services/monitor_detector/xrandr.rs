use crate::error::{LeadError, Result};
use crate::events::{Monitor, Rect};
use std::process::Command;
use tracing::{debug, warn};

use super::r#trait::MonitorSource;

/// Мониторы X11 через `xrandr --listmonitors`
pub struct XrandrMonitorSource;

impl XrandrMonitorSource {
    pub fn new() -> Self {
        Self
    }

    /// Разбор вывода вида:
    ///
    /// ```text
    /// Monitors: 2
    ///  0: +*DP-1 1920/527x1080/296+0+0  DP-1
    ///  1: +HDMI-1 1280/338x1024/270+1920+0  HDMI-1
    /// ```
    pub fn parse_listmonitors(output: &str) -> Result<Vec<Monitor>> {
        let mut lines = output.lines();

        match lines.next() {
            Some(header) if header.trim_start().starts_with("Monitors:") => {}
            _ => return LeadError::monitor_enumeration("неожиданный вывод xrandr"),
        }

        let mut monitors = Vec::new();
        for line in lines.filter(|line| !line.trim().is_empty()) {
            match Self::parse_line(line) {
                Some(monitor) => monitors.push(monitor),
                None => warn!("Не удалось разобрать строку xrandr: '{}'", line),
            }
        }

        Ok(monitors)
    }

    fn parse_line(line: &str) -> Option<Monitor> {
        let mut tokens = line.split_whitespace().skip(1);
        let name = tokens.next()?.trim_start_matches(['+', '*']);
        let geometry = Self::parse_geometry(tokens.next()?)?;

        if name.is_empty() {
            return None;
        }
        Some(Monitor::new(name, geometry))
    }

    /// `1920/527x1080/296+0+0` -> 1920x1080 в точке (0, 0)
    fn parse_geometry(token: &str) -> Option<Rect> {
        let (width_part, rest) = token.split_once('x')?;
        let offsets_at = rest.find(['+', '-'])?;
        let (height_part, offsets) = rest.split_at(offsets_at);

        let width = width_part.split('/').next()?.parse().ok()?;
        let height = height_part.split('/').next()?.parse().ok()?;
        let (x, y) = Self::parse_offsets(offsets)?;

        Some(Rect::new(x, y, width, height))
    }

    fn parse_offsets(offsets: &str) -> Option<(i32, i32)> {
        let offsets = offsets.strip_prefix('+').unwrap_or(offsets);
        let split = offsets
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '+' || *c == '-')?
            .0;
        let (x, y) = offsets.split_at(split);
        let y = y.strip_prefix('+').unwrap_or(y);

        Some((x.parse().ok()?, y.parse().ok()?))
    }
}

impl MonitorSource for XrandrMonitorSource {
    fn enumerate(&self) -> Result<Vec<Monitor>> {
        let output = Command::new("xrandr")
            .arg("--listmonitors")
            .output()
            .map_err(|e| LeadError::MonitorEnumeration(format!("xrandr не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return LeadError::monitor_enumeration(format!("xrandr вернул ошибку: {}", stderr.trim()));
        }

        let monitors = Self::parse_listmonitors(&String::from_utf8_lossy(&output.stdout))?;
        debug!("xrandr: найдено {} мониторов", monitors.len());
        Ok(monitors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listmonitors() {
        let output = "Monitors: 2\n 0: +*DP-1 1920/527x1080/296+0+0  DP-1\n 1: +HDMI-1 1280/338x1024/270+1920+0  HDMI-1\n";
        let monitors = XrandrMonitorSource::parse_listmonitors(output).unwrap();

        assert_eq!(
            monitors,
            vec![
                Monitor::new("DP-1", Rect::new(0, 0, 1920, 1080)),
                Monitor::new("HDMI-1", Rect::new(1920, 0, 1280, 1024)),
            ]
        );
    }

    #[test]
    fn test_parse_negative_offsets_and_garbage() {
        let output = "Monitors: 3\n 0: +*eDP-1 2560/344x1600/215+-2560+-100  eDP-1\n 1: broken\n 2: +DP-2 800/1x600/1+0-50  DP-2\n";
        let monitors = XrandrMonitorSource::parse_listmonitors(output).unwrap();

        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[0].geometry, Rect::new(-2560, -100, 2560, 1600));
        assert_eq!(monitors[1].geometry, Rect::new(0, -50, 800, 600));
    }

    #[test]
    fn test_unexpected_header_is_an_error() {
        assert!(matches!(
            XrandrMonitorSource::parse_listmonitors("Can't open display"),
            Err(LeadError::MonitorEnumeration(_))
        ));
    }
}
