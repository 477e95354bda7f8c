use crate::error::Result;
use crate::events::ControlEvent;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

/// Сколько раз пытаться заново поставить наблюдение, пока редактор
/// пересоздаёт файл
const REARM_ATTEMPTS: u32 = 10;
const REARM_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Наблюдает за файлом настроек и сообщает об изменениях управляющему потоку.
///
/// Некоторые редакторы не изменяют файл, а удаляют и создают его заново,
/// после чего наблюдение теряется. Поэтому после каждого уведомления
/// наблюдение ставится заново (`rearm`), безусловно.
pub struct SettingsWatcher {
    path: PathBuf,
    watcher: RecommendedWatcher,
}

impl SettingsWatcher {
    pub fn new(path: &Path, events: UnboundedSender<ControlEvent>) -> Result<Self> {
        let watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| match result {
                Ok(event) if Self::is_relevant(&event) => {
                    debug!("Событие файла настроек: {:?}", event.kind);
                    let _ = events.send(ControlEvent::SettingsChanged);
                }
                Ok(_) => {}
                Err(e) => error!("Ошибка наблюдения за файлом настроек: {}", e),
            },
            notify::Config::default(),
        )?;

        let mut settings_watcher = Self {
            path: path.to_path_buf(),
            watcher,
        };
        settings_watcher
            .watcher
            .watch(&settings_watcher.path, RecursiveMode::NonRecursive)?;

        info!("Наблюдение за файлом настроек: {:?}", settings_watcher.path);
        Ok(settings_watcher)
    }

    /// Чтение файла (в том числе нашим `sync`) не считается изменением
    fn is_relevant(event: &Event) -> bool {
        !matches!(event.kind, EventKind::Access(_))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Снять и заново поставить наблюдение за файлом
    pub async fn rearm(&mut self) -> Result<()> {
        // Старое наблюдение могло уже исчезнуть вместе с файлом
        let _ = self.watcher.unwatch(&self.path);

        let mut attempt = 1;
        loop {
            match self.watcher.watch(&self.path, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    debug!("Наблюдение за {:?} восстановлено (попытка {})", self.path, attempt);
                    return Ok(());
                }
                Err(e) if attempt < REARM_ATTEMPTS => {
                    debug!("Файл {:?} ещё недоступен: {}", self.path, e);
                    attempt += 1;
                    sleep(REARM_RETRY_DELAY).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::timeout;

    async fn expect_change(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ControlEvent>) {
        let event = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert_eq!(event, Some(ControlEvent::SettingsChanged));
        while rx.try_recv().is_ok() {}
    }

    #[tokio::test]
    async fn test_notifies_after_file_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lead.toml");
        fs::write(&path, "[lock]\naction = \"a\"\n").unwrap();

        let (tx, mut rx) = unbounded_channel();
        let mut watcher = SettingsWatcher::new(&path, tx).unwrap();
        assert_eq!(watcher.path(), path.as_path());

        fs::write(&path, "[lock]\naction = \"b\"\n").unwrap();
        expect_change(&mut rx).await;
        watcher.rearm().await.unwrap();

        // Редактор удаляет файл и создаёт новый
        fs::remove_file(&path).unwrap();
        fs::write(&path, "[lock]\naction = \"c\"\n").unwrap();
        expect_change(&mut rx).await;
        sleep(Duration::from_millis(100)).await;
        while rx.try_recv().is_ok() {}
        watcher.rearm().await.unwrap();

        fs::write(&path, "[lock]\naction = \"d\"\n").unwrap();
        expect_change(&mut rx).await;
    }

    #[tokio::test]
    async fn test_rearm_fails_when_file_never_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lead.toml");
        fs::write(&path, "").unwrap();

        let (tx, _rx) = unbounded_channel();
        let mut watcher = SettingsWatcher::new(&path, tx).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(watcher.rearm().await.is_err());
    }
}
