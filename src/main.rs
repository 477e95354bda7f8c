use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::Duration;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod store;
mod utils;
mod zones;

use config::Config;
use events::pointer_channel;
use services::{
    create_monitor_source,
    create_pointer_tracker,
    create_sensor_factory,
    ControlLoop,
    MonitorWatcher,
    SettingsWatcher,
    TopologyManager,
};
use store::{ConfigStore, TomlSettingsStore};

#[derive(Parser, Debug)]
#[command(name = "lead-rust")]
#[command(about = "Горячие зоны по краям и углам мониторов")]
struct Args {
    /// Путь к файлу конфигурации демона
    #[arg(short, long, default_value = "lead.toml")]
    config: String,

    /// Путь к файлу триггеров (перекрывает settings.path)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Построить сенсоры один раз, вывести их и выйти
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let mut config = Config::load(&args.config)?;
    if let Some(settings) = args.settings.clone() {
        config.settings.path = Some(settings);
    }

    // Инициализация системы логирования
    let level = args.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level, &config.logging.format)?;

    info!("Запуск Lead Rust v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - действия не выполняются, настройки не изменяются");
    }

    // Хранилище триггеров
    let settings_path = config.settings_path();
    let file_store = Arc::new(TomlSettingsStore::open(&settings_path));
    let store: Arc<dyn ConfigStore> = if args.dry_run {
        Arc::new(file_store.snapshot())
    } else {
        if let Err(e) = file_store.create_if_missing() {
            warn!("Не удалось создать файл настроек {:?}: {}", settings_path, e);
        }
        file_store
    };

    // Инициализация компонентов
    let monitor_source = create_monitor_source(&config, args.dry_run)?;
    let (pointer_tx, pointer_rx) = pointer_channel();
    let sensor_factory = create_sensor_factory(pointer_rx, args.dry_run);
    let mut manager = TopologyManager::new(
        store.clone(),
        monitor_source.clone(),
        sensor_factory,
        config.zone_geometry(),
    );

    if args.check {
        for sensor in manager.sensors() {
            println!("{}", sensor);
        }
        info!("Проверка завершена: {} сенсоров", manager.sensor_count());
        manager.shutdown();
        return Ok(());
    }

    let (events_tx, events_rx) = unbounded_channel();

    // Снимок в памяти (dry-run) файла не имеет, наблюдать не за чем
    let settings_watcher = match store.file_name() {
        Some(path) => match SettingsWatcher::new(path, events_tx.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("Изменения {:?} не будут отслеживаться: {}", path, e);
                None
            }
        },
        None => None,
    };

    let monitor_watcher = MonitorWatcher::new(
        monitor_source,
        Duration::from_millis(config.monitors.polling_interval_ms),
        manager.monitors().to_vec(),
        events_tx,
    );
    let pointer_tracker = create_pointer_tracker(&config, pointer_tx, args.dry_run);

    info!("Все компоненты инициализированы");

    // Запуск сервисов параллельно с управляющим циклом
    let monitor_handle = tokio::spawn(async move {
        if let Err(e) = monitor_watcher.run().await {
            error!("Ошибка в MonitorWatcher: {}", e);
        }
    });
    let pointer_handle = tokio::spawn(async move {
        if let Err(e) = pointer_tracker.run().await {
            error!("Ошибка в PointerTracker: {}", e);
        }
    });

    info!("Все сервисы запущены");

    let control = ControlLoop::new(manager, store, settings_watcher, events_rx);
    control
        .run(async {
            if let Err(err) = signal::ctrl_c().await {
                error!("Ошибка при ожидании сигнала завершения: {}", err);
            }
        })
        .await?;

    info!("Завершение работы...");

    monitor_handle.abort();
    pointer_handle.abort();

    // Ожидаем завершения задач (с таймаутом)
    let shutdown_timeout = Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = monitor_handle.await;
        let _ = pointer_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("Lead Rust завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry.with(tracing_subscriber::fmt::layer()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }

    Ok(())
}
