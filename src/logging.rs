//! Inicialización del subscriber global de `tracing`.
//!
//! El filtro acepta la sintaxis de `EnvFilter` (p.ej. `"yourplan=debug,actix_web=info"`).

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Instala el subscriber de consola. Devuelve `false` si ya había uno
/// instalado (p.ej. al correr varios tests en el mismo proceso).
pub fn init(filter: &str) -> bool {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
