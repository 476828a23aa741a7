use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use actix_web_httpauth::middleware::HttpAuthentication;

use quizdeck::{app_state::AppState, auth::validate_bearer, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config).expect("failed to build gateway client");

    match state.gateway.health_check().await {
        Ok(()) => log::info!("gateway reachable at {}", state.config.gateway_url),
        Err(err) => log::warn!("gateway not reachable at startup: {}", err),
    }

    log::info!("starting quizdeck on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = match &state.config.cors_allowed_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(handlers::health)
            .service(handlers::signup)
            .service(handlers::login)
            .service(
                web::scope("")
                    .wrap(HttpAuthentication::bearer(validate_bearer))
                    .service(handlers::logout)
                    .service(handlers::current_user)
                    .service(handlers::start_quiz)
                    .service(handlers::get_quiz)
                    .service(handlers::submit_answer)
                    .service(handlers::save_result)
                    .service(handlers::recent_results),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
