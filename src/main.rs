use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use taskboard::{
    auth::{AuthMiddleware, TokenService},
    config::Config,
    error::AppError,
    routes,
    store::{MemoryStore, PgStore, Store},
};

/// Picks Postgres when `DATABASE_URL` is set, otherwise the in-memory store.
async fn open_store(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            store.migrate().await?;
            log::info!("Connected to Postgres, migrations applied");
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL not set, data is kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config =
        Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = open_store(&config)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let store: web::Data<dyn Store> = web::Data::from(store);
    let tokens = web::Data::new(TokenService::from_config(&config));

    log::info!("Starting Taskboard server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(tokens.clone())
            .wrap(AuthMiddleware::new(tokens.get_ref().clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
