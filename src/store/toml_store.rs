use super::{ConfigStore, MemoryConfigStore, StoreValue};
use crate::error::{LeadError, Result};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{debug, error, info};

/// Файловое хранилище: ключ `a/b` соответствует ключу `b` в таблице `[a]`.
pub struct TomlSettingsStore {
    path: PathBuf,
    table: RwLock<Table>,
}

impl TomlSettingsStore {
    /// Открыть хранилище. Отсутствующий файл - пустое хранилище, ошибка
    /// разбора логируется и тоже даёт пустое хранилище до следующего `sync`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: path.into(),
            table: RwLock::new(Table::new()),
        };

        match store.sync() {
            Ok(()) => info!("Файл настроек загружен: {:?}", store.path),
            Err(e) => error!("Не удалось загрузить {:?}: {}", store.path, e),
        }

        store
    }

    fn load_table(path: &Path) -> Result<Table> {
        if !path.exists() {
            debug!("Файл настроек {:?} не существует, хранилище пустое", path);
            return Ok(Table::new());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str::<Table>(&content)?)
    }

    fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
        let mut segments = key.split('/');
        let mut current = table.get(segments.next()?)?;

        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }

        Some(current)
    }

    /// Строковое представление значения; таблицы значениями не являются
    fn render(value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Integer(number) => Some(number.to_string()),
            Value::Float(number) => Some(number.to_string()),
            Value::Boolean(flag) => Some(flag.to_string()),
            Value::Datetime(datetime) => Some(datetime.to_string()),
            // Список триггеров можно задать массивом вместо строки через `;`
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Array(_) | Value::Table(_) => None,
                    scalar => Self::render(scalar),
                })
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.join(";")),
            Value::Table(_) => None,
        }
    }

    fn insert(table: &mut Table, key: &str, value: Value) -> Result<()> {
        let segments: Vec<&str> = key.split('/').collect();
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| LeadError::Internal("пустой ключ".to_string()))?;

        let mut current = table;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert(Value::Table(Table::new()));
            current = entry.as_table_mut().ok_or_else(|| {
                LeadError::Internal(format!("ключ '{}' конфликтует со значением '{}'", key, segment))
            })?;
        }

        current.insert(last.to_string(), value);
        Ok(())
    }

    fn persist(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(table)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Создать пустой файл, чтобы за ним можно было наблюдать с самого старта
    pub fn create_if_missing(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        self.persist(&self.table.read())?;
        info!("Создан пустой файл настроек {:?}", self.path);
        Ok(true)
    }

    fn flatten(prefix: &str, table: &Table, out: &mut Vec<(String, StoreValue)>) {
        for (name, value) in table {
            let key = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };

            match value {
                Value::Table(nested) => Self::flatten(&key, nested, out),
                Value::Integer(number) => out.push((key, StoreValue::Integer(*number))),
                other => {
                    if let Some(text) = Self::render(other) {
                        out.push((key, StoreValue::Text(text)));
                    }
                }
            }
        }
    }

    /// Копия текущего содержимого в памяти; записи в неё на диск не попадают
    pub fn snapshot(&self) -> MemoryConfigStore {
        let mut entries = Vec::new();
        Self::flatten("", &self.table.read(), &mut entries);
        MemoryConfigStore::with_entries(entries.iter().map(|(key, value)| (key.as_str(), value.clone())))
    }
}

impl ConfigStore for TomlSettingsStore {
    fn contains(&self, key: &str) -> bool {
        let table = self.table.read();
        Self::lookup(&table, key).and_then(Self::render).is_some()
    }

    fn read(&self, key: &str) -> Option<String> {
        let table = self.table.read();
        Self::lookup(&table, key).and_then(Self::render)
    }

    fn write(&self, key: &str, value: StoreValue) -> Result<()> {
        let value = match value {
            StoreValue::Text(text) => Value::String(text),
            StoreValue::Integer(number) => Value::Integer(number),
        };

        let mut table = self.table.write();
        Self::insert(&mut table, key, value)?;
        self.persist(&table)?;

        debug!("Записан ключ '{}' в {:?}", key, self.path);
        Ok(())
    }

    fn file_name(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn sync(&self) -> Result<()> {
        // При ошибке разбора остаётся предыдущее содержимое
        let table = Self::load_table(&self.path)?;
        *self.table.write() = table;
        Ok(())
    }
}
