use crate::error::{LeadError, Result};
use crate::events::{PointerPosition, PointerSender};
use crate::trace_if_enabled;
use tokio::process::Command;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tracing::{info, warn};

use super::r#trait::PointerTrackerTrait;

/// Пауза после серии неудачных опросов
const FAILURE_BACKOFF: Duration = Duration::from_secs(5);
const MAX_FAILURES_BEFORE_BACKOFF: u32 = 3;

/// Опрос положения курсора через `xdotool getmouselocation --shell`
pub struct XdotoolPointerTracker {
    sender: PointerSender,
    polling_interval: Duration,
}

impl XdotoolPointerTracker {
    pub fn new(sender: PointerSender, polling_interval: Duration) -> Self {
        Self {
            sender,
            polling_interval,
        }
    }

    /// Разбор вывода `X=...`, `Y=...`, `SCREEN=...`, `WINDOW=...`
    pub fn parse_location(output: &str) -> Option<PointerPosition> {
        let mut x = None;
        let mut y = None;

        for line in output.lines() {
            match line.trim().split_once('=') {
                Some(("X", value)) => x = value.parse().ok(),
                Some(("Y", value)) => y = value.parse().ok(),
                _ => {}
            }
        }

        Some(PointerPosition::new(x?, y?))
    }

    async fn query(&self) -> Result<PointerPosition> {
        let output = Command::new("xdotool")
            .args(["getmouselocation", "--shell"])
            .output()
            .await
            .map_err(|e| LeadError::ServiceUnavailable(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LeadError::ServiceUnavailable(format!("xdotool вернул ошибку: {}", stderr.trim())));
        }

        Self::parse_location(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| LeadError::Internal("неожиданный вывод xdotool getmouselocation".to_string()))
    }

    async fn run_impl(self) -> Result<()> {
        info!("XdotoolPointerTracker запущен (интервал: {:?})", self.polling_interval);

        let mut ticker = interval(self.polling_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut failures = 0u32;

        loop {
            ticker.tick().await;

            match self.query().await {
                Ok(position) => {
                    if failures > 0 {
                        info!("Положение курсора снова доступно");
                        failures = 0;
                    }
                    self.sender.send_if_modified(|current| {
                        if *current == Some(position) {
                            return false;
                        }
                        trace_if_enabled!("Курсор: {}", position);
                        *current = Some(position);
                        true
                    });
                }
                Err(e) => {
                    failures += 1;
                    if failures >= MAX_FAILURES_BEFORE_BACKOFF {
                        warn!("Не удалось получить положение курсора: {}. Пауза {:?}", e, FAILURE_BACKOFF);
                        // Позиция неизвестна - сенсоры не должны срабатывать по устаревшей
                        self.sender.send_replace(None);
                        sleep(FAILURE_BACKOFF).await;
                        failures = 0;
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl PointerTrackerTrait for XdotoolPointerTracker {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
