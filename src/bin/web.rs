//! League organizer server: mounts the JSON API under /api and keeps events in
//! memory, or in the JSON snapshot named by DATA_FILE.
//! Bind address comes from HOST and PORT (see `ServerConfig`).

use actix_web::{web::Data, App, HttpResponse, HttpServer};
use league_standings_web::{api, EventStore, InMemoryStatsStore, ServerConfig};
use std::sync::Arc;

/// Browsers ask for a favicon; answer with an empty response.
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let events = match &config.data_file {
        Some(path) => EventStore::open(path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?,
        None => {
            log::warn!("DATA_FILE not set; events are kept in memory only");
            EventStore::in_memory()
        }
    };

    let state = Data::new(api::AppContext {
        events,
        stats: Arc::new(InMemoryStatsStore::new()),
    });

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/favicon.ico", actix_web::web::get().to(favicon))
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
