// Biblioteca raíz del crate `yourplan`.
// Backend de inscripción de cursos: catálogo, carro, inscripción atómica,
// historial y auditoría de carrera sobre SQLite.
pub mod audit;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod registration;
pub mod server;
pub mod server_handlers;
pub mod store;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
