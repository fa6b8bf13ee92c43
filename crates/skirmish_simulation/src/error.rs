//! Error types
//!
//! Внутри tick ошибки НЕ пробрасываются наверх: policy reject и stale
//! references обрабатываются на месте (no-op + log). Эти типы нужны
//! только для границ: загрузка config и encode/decode remote calls.

use crate::net::NetId;

/// Ошибка загрузки combat config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse combat config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid combat config: {0}")]
    Invalid(String),
}

/// Ошибка remote-invocation слоя
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("failed to encode remote call: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode remote call: {0}")]
    Decode(#[source] bincode::Error),

    #[error("no replicated object with {0:?}")]
    UnknownNetId(NetId),
}
