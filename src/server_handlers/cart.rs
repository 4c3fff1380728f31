use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;

use crate::server::AppState;
use crate::server_handlers::{Body, bad_request, body_inner, parse_netid, string_or_number, with_conn};
use crate::store::{self, queries};

#[derive(Debug, Default, Deserialize)]
pub struct CartBody {
    #[serde(default, deserialize_with = "string_or_number")]
    pub netid: Option<String>,
    #[serde(default, rename = "courseName")]
    pub course_name: Option<String>,
    #[serde(default)]
    pub lecture: Option<String>,
    #[serde(default)]
    pub quiz: Option<String>,
}

enum CartUpdate {
    NotSignedIn,
    Done { success: bool, is_full: bool },
}

/// POST /yourplan/updatecart/{isadd}
/// Agrega (`true`) o quita (`false`) un par cátedra+quiz del carro.
pub async fn update_cart_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Body<CartBody>,
) -> impl Responder {
    let is_add = match path.into_inner().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    };
    let body = body_inner(body);
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let netid = body.netid.as_deref().and_then(parse_netid);
    let (Some(is_add), Some(netid), Some(course), Some(lecture), Some(quiz)) = (
        is_add,
        netid,
        non_empty(body.course_name),
        non_empty(body.lecture),
        non_empty(body.quiz),
    ) else {
        return bad_request("Invalid netid/Course Info");
    };

    let res = with_conn(&state, move |conn| {
        if !store::is_signed_in(conn, netid)? {
            return Ok(CartUpdate::NotSignedIn);
        }
        let success = if is_add {
            store::add_to_cart(conn, netid, &course, &lecture, &quiz)?
        } else {
            store::remove_from_cart(conn, netid, &course, &lecture, &quiz)?;
            true
        };
        let is_full = queries::is_section_full(conn, &course, &lecture, &quiz)?;
        Ok(CartUpdate::Done { success, is_full })
    })
    .await;

    match res {
        Ok(CartUpdate::Done { success, is_full }) => {
            tracing::debug!(netid, is_add, success, "cart updated");
            HttpResponse::Ok().json(json!({"ifSuccess": success, "isSectionFull": is_full}))
        }
        Ok(CartUpdate::NotSignedIn) => bad_request("Please Sign-In First"),
        Err(resp) => resp,
    }
}

/// GET /yourplan/cart/{netid}
pub async fn cart_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let Some(netid) = parse_netid(&path.into_inner()) else {
        return bad_request("Invalid netid Or Is Not Signed In");
    };
    let res = with_conn(&state, move |conn| {
        if !store::is_signed_in(conn, netid)? {
            return Ok(None);
        }
        queries::cart(conn, netid).map(Some)
    })
    .await;
    match res {
        Ok(Some(cart)) => HttpResponse::Ok().json(cart),
        Ok(None) => bad_request("Invalid netid Or Is Not Signed In"),
        Err(resp) => resp,
    }
}
