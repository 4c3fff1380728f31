use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;

use crate::server::AppState;
use crate::server_handlers::{Body, NetidBody, bad_request, body_inner, parse_netid, string_or_number, with_conn};
use crate::store;

#[derive(Debug, Default, Deserialize)]
pub struct SignInBody {
    #[serde(default, deserialize_with = "string_or_number")]
    pub netid: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /yourplan/signin {netid, password}
pub async fn signin_handler(state: web::Data<AppState>, body: Body<SignInBody>) -> impl Responder {
    let body = body_inner(body);
    let netid = body.netid.as_deref().and_then(parse_netid);
    let password = body.password.filter(|p| !p.is_empty());
    let (Some(netid), Some(password)) = (netid, password) else {
        return bad_request("Enter both netid and password");
    };

    let res = with_conn(&state, move |conn| {
        if !store::verify_credentials(conn, netid, &password)? {
            return Ok(false);
        }
        store::sign_in(conn, netid)?;
        Ok(true)
    })
    .await;

    match res {
        Ok(true) => {
            tracing::info!(netid, "signed in");
            HttpResponse::Ok().json(json!({"ifSuccess": true}))
        }
        Ok(false) => bad_request("netid or password incorrect"),
        Err(resp) => resp,
    }
}

/// POST /yourplan/logout {netid}
pub async fn logout_handler(state: web::Data<AppState>, body: Body<NetidBody>) -> impl Responder {
    let Some(netid) = body_inner(body).netid.as_deref().and_then(parse_netid) else {
        return bad_request("Please Enter valid netid to log out");
    };
    match with_conn(&state, move |conn| store::sign_out(conn, netid)).await {
        Ok(()) => HttpResponse::Ok().json(json!({"ifSuccess": true})),
        Err(resp) => resp,
    }
}

/// GET /yourplan/checksignin/{netid}
pub async fn check_signin_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let Some(netid) = parse_netid(&path.into_inner()) else {
        return HttpResponse::Ok().json(json!({"isAlreadySignedIn": false}));
    };
    match with_conn(&state, move |conn| store::is_signed_in(conn, netid)).await {
        Ok(signed) => HttpResponse::Ok().json(json!({"isAlreadySignedIn": signed})),
        Err(resp) => resp,
    }
}
