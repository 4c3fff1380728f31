use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::collections::HashMap;

use crate::models::views::CourseFilter;
use crate::server::AppState;
use crate::server_handlers::{bad_request, with_conn};
use crate::store::queries;

/// GET /yourplan/allcourses?keyword=&category=&credit=
/// Lista los cursos ofrecidos el próximo trimestre. Un `credit` no numérico
/// no coincide con ningún curso.
pub async fn all_courses_handler(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let qm = query.into_inner();
    let non_empty = |k: &str| qm.get(k).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let credit = match non_empty("credit") {
        Some(c) => match c.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => return HttpResponse::Ok().json(json!({"courses": []})),
        },
        None => None,
    };
    let filter = CourseFilter { keyword: non_empty("keyword"), category: non_empty("category"), credit };

    match with_conn(&state, move |conn| queries::search_courses(conn, &filter)).await {
        Ok(courses) => HttpResponse::Ok().json(json!({"courses": courses})),
        Err(resp) => resp,
    }
}

/// GET /yourplan/coursedetail/{coursename}
/// El nombre llega con guion en lugar del espacio ("CSE-142").
pub async fn course_detail_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let course_name = path.into_inner().replacen('-', " ", 1);
    match with_conn(&state, move |conn| queries::course_detail(conn, &course_name)).await {
        Ok(Some(detail)) => HttpResponse::Ok().json(detail),
        Ok(None) => bad_request("Course Does Not Exist"),
        Err(resp) => resp,
    }
}
