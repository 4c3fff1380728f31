pub mod audit;
pub mod cart;
pub mod catalog;
pub mod register;
pub mod session;

pub use audit::*;
pub use cart::*;
pub use catalog::*;
pub use register::*;
pub use session::*;

use actix_web::{Either, HttpResponse, web};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

use crate::error::StoreError;
use crate::server::AppState;
use crate::store::open_connection;

pub const SERVER_SIDE_ERROR_MESSAGE: &str = "An error occurred on the server. Try again later.";

/// Cuerpo POST aceptado como JSON o como formulario urlencoded. Si no hay
/// cuerpo o el content-type no calza, el extractor da `None` y el handler
/// responde con su propio mensaje de validación.
pub type Body<T> = Option<Either<web::Json<T>, web::Form<T>>>;

pub fn body_inner<T: Default>(body: Body<T>) -> T {
    match body {
        Some(Either::Left(json)) => json.into_inner(),
        Some(Either::Right(form)) => form.into_inner(),
        None => T::default(),
    }
}

/// netid válido = sólo dígitos ASCII y cabe en i64.
pub fn parse_netid(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok()
}

pub fn bad_request(msg: &'static str) -> HttpResponse {
    HttpResponse::BadRequest().content_type("text/plain").body(msg)
}

pub fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/plain")
        .body(SERVER_SIDE_ERROR_MESSAGE)
}

/// Corre `f` con una conexión nueva en el pool de bloqueo de actix.
/// Cualquier falla de store se registra y se traduce a un 500.
pub async fn with_conn<T, F>(state: &AppState, f: F) -> Result<T, HttpResponse>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
{
    let db_path: PathBuf = state.config.db_path.clone();
    let res = web::block(move || {
        let mut conn = open_connection(&db_path)?;
        f(&mut conn)
    })
    .await;
    match res {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "store failure");
            Err(server_error())
        }
        Err(e) => {
            tracing::error!(error = %e, "blocking task failed");
            Err(server_error())
        }
    }
}

/// Acepta `"123"` o `123` en JSON; en formularios todo llega como texto.
pub fn string_or_number<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }
    Ok(Option::<Raw>::deserialize(d)?.map(|r| match r {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct NetidBody {
    #[serde(default, deserialize_with = "string_or_number")]
    pub netid: Option<String>,
}
