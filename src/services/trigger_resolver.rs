use crate::debug_if_enabled;
use crate::store::{ConfigStore, StoreValue};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Разделитель имён в списке триггеров зоны
const TRIGGER_LIST_SEPARATOR: char = ';';

/// Задержка, записываемая для триггера без `delay`
pub const DEFAULT_DELAY_MS: u64 = 0;

/// Проверенное определение триггера
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerSpec {
    pub name: String,
    pub action: String,
    pub delay_ms: u64,
}

/// На зону обычно приходится один-два триггера
pub type ResolvedTriggers = SmallVec<[TriggerSpec; 4]>;

/// Читает, проверяет и дополняет значениями по умолчанию триггеры зоны.
///
/// Проблемные триггеры пропускаются с диагностикой, перестройка никогда
/// не прерывается из-за них.
pub struct TriggerResolver {
    store: Arc<dyn ConfigStore>,
}

impl TriggerResolver {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Имена триггеров из списка зоны в исходном порядке, без пустых сегментов
    pub fn trigger_names(list: &str) -> impl Iterator<Item = &str> {
        list.split(TRIGGER_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn resolve(&self, zone_key: &str) -> ResolvedTriggers {
        let mut resolved = ResolvedTriggers::new();

        if !self.store.contains(zone_key) {
            return resolved;
        }

        let Some(list) = self.store.read(zone_key) else {
            return resolved;
        };

        for name in Self::trigger_names(&list) {
            if let Some(trigger) = self.resolve_trigger(zone_key, name) {
                resolved.push(trigger);
            }
        }

        resolved
    }

    fn resolve_trigger(&self, zone_key: &str, name: &str) -> Option<TriggerSpec> {
        let action_key = format!("{}/action", name);
        let delay_key = format!("{}/delay", name);

        let action = match self.read_present(&action_key) {
            Some(action) if !action.trim().is_empty() => action,
            Some(_) => {
                warn!("Триггер '{}' ({}) имеет пустой action; пропускаем", name, zone_key);
                return None;
            }
            None => {
                warn!("Триггер '{}' ({}) не имеет action; пропускаем", name, zone_key);
                return None;
            }
        };

        let delay_ms = match self.read_present(&delay_key) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(delay_ms) => delay_ms,
                Err(_) => {
                    warn!(
                        "Триггер '{}' ({}) имеет некорректный delay '{}'; пропускаем",
                        name, zone_key, raw
                    );
                    return None;
                }
            },
            None => {
                info!(
                    "Триггер '{}' ({}) не имеет delay; устанавливаем {}",
                    name, zone_key, DEFAULT_DELAY_MS
                );
                if let Err(e) = self
                    .store
                    .write(&delay_key, StoreValue::Integer(DEFAULT_DELAY_MS as i64))
                {
                    error!("Не удалось записать delay по умолчанию для '{}': {}", name, e);
                }
                DEFAULT_DELAY_MS
            }
        };

        debug_if_enabled!(
            "Триггер '{}' для {}: action='{}', delay={}мс",
            name, zone_key, action, delay_ms
        );

        Some(TriggerSpec {
            name: name.to_string(),
            action,
            delay_ms,
        })
    }

    fn read_present(&self, key: &str) -> Option<String> {
        if self.store.contains(key) {
            self.store.read(key)
        } else {
            None
        }
    }
}
