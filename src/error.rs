// Errores de la capa de almacenamiento y de configuración.
use std::borrow::Cow;

/// Fallos "fatales" del store. Las reglas de negocio de la inscripción
/// nunca llegan aquí: se reportan como `CheckOutcome::Rejected`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Una fila existe pero su contenido viola el modelo (p.ej. day code inválido).
    #[error("malformed row in `{table}`: {detail}")]
    MalformedRow { table: &'static str, detail: Cow<'static, str> },

    #[error("not found: {what}")]
    NotFound { what: Cow<'static, str> },

    #[error("request deadline exceeded before {stage}")]
    DeadlineExceeded { stage: &'static str },
}

impl StoreError {
    pub fn malformed(table: &'static str, detail: impl Into<Cow<'static, str>>) -> Self {
        StoreError::MalformedRow { table, detail: detail.into() }
    }

    pub fn not_found(what: impl Into<Cow<'static, str>>) -> Self {
        StoreError::NotFound { what: what.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{key} uses unsupported scheme: {value}")]
    UnsupportedScheme { key: &'static str, value: String },
}
