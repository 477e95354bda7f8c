use crate::error::Result;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Исполнитель действий сенсоров. Строка действия для ядра непрозрачна.
pub trait ActionExecutor: Send + Sync {
    fn execute(&self, zone_key: &str, action: &str) -> Result<()>;
}

/// Factory function to create an action executor based on the dry_run flag
pub fn create_action_executor(dry_run: bool) -> Box<dyn ActionExecutor> {
    if dry_run {
        Box::new(DryRunExecutor)
    } else {
        Box::new(ShellExecutor::default())
    }
}

/// Запускает действие через `sh -c` без ожидания завершения
pub struct ShellExecutor {
    shell: String,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }
}

impl ActionExecutor for ShellExecutor {
    fn execute(&self, zone_key: &str, action: &str) -> Result<()> {
        info!("Зона {}: выполняем '{}'", zone_key, action);

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(action)
            .stdin(Stdio::null())
            .spawn()?;

        // Забираем статус завершения, чтобы не оставлять зомби
        let action = action.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!("Действие '{}' завершилось успешно", action),
                Ok(status) => warn!("Действие '{}' завершилось с кодом {}", action, status),
                Err(e) => warn!("Не удалось дождаться действия '{}': {}", action, e),
            }
        });

        Ok(())
    }
}

pub struct DryRunExecutor;

impl ActionExecutor for DryRunExecutor {
    fn execute(&self, zone_key: &str, action: &str) -> Result<()> {
        info!("[DRY RUN] Зона {}: действие '{}'", zone_key, action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_executor_runs_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("fired");
        let executor = ShellExecutor::default();

        executor
            .execute("DP-1/topLeft", &format!("touch {}", marker.display()))
            .unwrap();

        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
    }

    #[test]
    fn test_dry_run_executor_never_fails() {
        assert!(DryRunExecutor.execute("DP-1/top", "rm -rf /nonexistent").is_ok());
    }
}
