use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

use crate::config::AppConfig;
use crate::server_handlers::{
    all_courses_handler, cart_handler, check_signin_handler, course_detail_handler, degree_audit_handler,
    history_handler, logout_handler, register_handler, signin_handler, update_cart_handler,
};

/// Estado compartido por los workers. Cada request abre su propia conexión
/// a partir de `config.db_path`.
pub struct AppState {
    pub config: AppConfig,
}

/// Registra todas las rutas bajo `/yourplan`. Se usa tanto en `run_server`
/// como en los tests con `test::init_service`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/yourplan")
            .route("/allcourses", web::get().to(all_courses_handler))
            .route("/signin", web::post().to(signin_handler))
            .route("/logout", web::post().to(logout_handler))
            .route("/checksignin/{netid}", web::get().to(check_signin_handler))
            .route("/coursedetail/{coursename}", web::get().to(course_detail_handler))
            .route("/updatecart/{isadd}", web::post().to(update_cart_handler))
            .route("/degreeaudit/{netid}/{majorname}/{ismajor}", web::get().to(degree_audit_handler))
            .route("/register", web::post().to(register_handler))
            .route("/cart/{netid}", web::get().to(cart_handler))
            .route("/history/{netid}", web::get().to(history_handler)),
    );
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr();
    let workers = config.workers.max(1);
    let cors_permissive = config.cors_permissive;
    let state = web::Data::new(AppState { config });

    tracing::info!(%bind_addr, workers, "starting yourplan server");

    HttpServer::new(move || {
        let cors = if cors_permissive { Cors::permissive() } else { Cors::default() };
        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .workers(workers)
    .bind(bind_addr)?
    .run()
    .await
}
