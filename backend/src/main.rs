mod config;
mod errors;
mod frame;
mod inference;
mod routes;
mod upload;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::Config;
use inference::{Predictor, build_predictor};
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    std::fs::create_dir_all(&config.upload_dir)?;
    log::info!("Temporary uploads go to {}", config.upload_dir.display());
    log::info!("Serving frontend from {}", config.frontend_dir.display());
    log::info!("Demo variant: {}", config.variant);

    let predictor = build_predictor(&config).map_err(|e| {
        log::error!("Failed to set up the predictor: {}", e);
        std::io::Error::other(e)
    })?;
    let predictor: web::Data<dyn Predictor> = web::Data::from(predictor);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(config.clone())
            .app_data(predictor.clone())
            .configure(|cfg| configure_routes(cfg, config.frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
