//! Ошибки конструирования агента и загрузки конфигурации
//!
//! Рантайм поведения ошибок не имеет (закрытая модель над доверенными входами),
//! всё что может сломаться, ловим на Init.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShinobiError {
    /// Имя состояния не входит в {follow, chase, zigzag, idle, sweep}
    #[error("unknown shinobi state: {0:?}")]
    UnknownState(String),

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("failed to parse shinobi config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read shinobi config: {0}")]
    ConfigIo(#[from] std::io::Error),
}

pub type ShinobiResult<T> = Result<T, ShinobiError>;
