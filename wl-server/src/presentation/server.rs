use crate::application::post_service::PostService;
use crate::application::simulation_service::SimulationService;
use crate::data::post_repository::SqlitePostRepository;
use crate::infrastructure::config::AppConfig;
use crate::presentation::dto::HealthResponse;
use crate::presentation::handlers;
use crate::presentation::middleware::RequestContext;
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::Utc;
use tracing::info;

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .service(handlers::post::get_posts)
            .service(handlers::post::get_post)
            .service(handlers::simulation::run_simulation),
    );
}

pub async fn start_rest_server(
    config: AppConfig,
    post_service: PostService<SqlitePostRepository>,
    simulation_service: SimulationService,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    let post_service = web::Data::new(post_service);
    let simulation_service = web::Data::new(simulation_service);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        environment = ?config.environment,
        "HTTP server starting"
    );

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(Logger::default())
            .wrap(RequestContext)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(post_service.clone())
            .app_data(simulation_service.clone())
            .configure(configure_api)
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET"])
        .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
