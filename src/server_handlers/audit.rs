use actix_web::{HttpResponse, Responder, web};

use crate::audit::degree_audit;
use crate::server::AppState;
use crate::server_handlers::{bad_request, parse_netid, with_conn};
use crate::store::{self, queries};

/// GET /yourplan/degreeaudit/{netid}/{majorname}/{ismajor}
pub async fn degree_audit_handler(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> impl Responder {
    const INVALID: &str = "Invalid Major, ID, or Action Attempted";
    let (netid_raw, major_name, is_major_raw) = path.into_inner();
    let is_major = match is_major_raw.as_str() {
        "true" => true,
        "false" => false,
        _ => return bad_request(INVALID),
    };
    let Some(netid) = parse_netid(&netid_raw) else { return bad_request(INVALID) };

    let res = with_conn(&state, move |conn| {
        let Some(major) = queries::major_id_by_name(conn, &major_name)? else { return Ok(None) };
        if !store::is_signed_in(conn, netid)? {
            return Ok(None);
        }
        degree_audit(conn, netid, major, is_major)
    })
    .await;

    match res {
        Ok(Some(audit)) => HttpResponse::Ok().json(audit),
        Ok(None) => bad_request(INVALID),
        Err(resp) => resp,
    }
}

/// GET /yourplan/history/{netid}
/// Cursos de los años configurados, agrupados por año y trimestre.
pub async fn history_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let Some(netid) = parse_netid(&path.into_inner()) else {
        return bad_request("Invalid netid Or Is Not Signed In");
    };
    let years = state.config.history_years.clone();
    let res = with_conn(&state, move |conn| {
        if !store::is_signed_in(conn, netid)? {
            return Ok(None);
        }
        queries::history_by_term(conn, netid, &years).map(Some)
    })
    .await;
    match res {
        Ok(Some(history)) => HttpResponse::Ok().json(history),
        Ok(None) => bad_request("Invalid netid Or Is Not Signed In"),
        Err(resp) => resp,
    }
}
