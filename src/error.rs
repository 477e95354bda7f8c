use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка отслеживания файла: {0}")]
    Notify(#[from] notify::Error),

    #[error("Не удалось разобрать файл настроек: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Не удалось сохранить файл настроек: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),

    #[error("Не удалось получить список мониторов: {0}")]
    MonitorEnumeration(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl LeadError {
    pub fn monitor_enumeration<T>(msg: impl Into<String>) -> Result<T> {
        Err(LeadError::MonitorEnumeration(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! lead_error {
    (monitor_enumeration, $($arg:tt)*) => {
        $crate::error::LeadError::MonitorEnumeration(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::LeadError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::LeadError::Internal(format!($($arg)*))
    };
}
