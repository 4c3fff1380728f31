use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::registration::{Deadline, register};
use crate::server::AppState;
use crate::server_handlers::{Body, NetidBody, bad_request, body_inner, parse_netid, with_conn};
use crate::store;

/// POST /yourplan/register {netid}
/// Envía todo el carro ("added") a inscripción. Cualquier regla que falle
/// deja el carro tal cual y devuelve `ifSuccess: false` con la nota.
pub async fn register_handler(state: web::Data<AppState>, body: Body<NetidBody>) -> impl Responder {
    let Some(netid) = body_inner(body).netid.as_deref().and_then(parse_netid) else {
        return bad_request("Invalid netid Or Is Not Signed In");
    };
    let deadline = Deadline::after(state.config.request_deadline);

    let res = with_conn(&state, move |conn| {
        if !store::is_signed_in(conn, netid)? {
            return Ok(None);
        }
        register(conn, netid, &deadline).map(Some)
    })
    .await;

    match res {
        Ok(Some(outcome)) => HttpResponse::Ok().json(json!({
            "ifSuccess": outcome.is_possible,
            "confirmationCode": outcome.confirmation_code,
            "note": outcome.note,
            "code": outcome.code,
        })),
        Ok(None) => bad_request("Invalid netid Or Is Not Signed In"),
        Err(resp) => resp,
    }
}
