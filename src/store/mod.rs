//! Хранилище определений триггеров.
//!
//! Ключи иерархические, через `/`:
//!
//! ```text
//! <монитор>/<зона>   = "<триггер1>;<триггер2>;..."
//! <триггер>/action   = "<команда>"
//! <триггер>/delay    = <миллисекунды>
//! ```

mod memory;
mod toml_store;

pub use memory::MemoryConfigStore;
pub use toml_store::TomlSettingsStore;

use crate::error::Result;
use std::fmt;
use std::path::Path;

/// Значение, записываемое в хранилище
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Text(text) => f.write_str(text),
            StoreValue::Integer(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::Text(value.to_string())
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Integer(value)
    }
}

/// Контракт долговременного key/value хранилища настроек
pub trait ConfigStore: Send + Sync {
    fn contains(&self, key: &str) -> bool;

    /// Строковое представление значения. Вызывающий сначала проверяет `contains`.
    fn read(&self, key: &str) -> Option<String>;

    /// Синхронная запись, изменение сохраняется до возврата
    fn write(&self, key: &str, value: StoreValue) -> Result<()>;

    /// Путь к файлу хранилища для регистрации наблюдателя
    fn file_name(&self) -> Option<&Path>;

    /// Перечитать содержимое из файла
    fn sync(&self) -> Result<()>;
}
