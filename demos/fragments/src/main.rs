use demo_fragments::routes::*;
use demo_fragments::state::AppState;

use actix_htmx_fragments::{extension_script, FragmentsConfig, HtmxMiddleware};
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use log::info;

use std::env;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let state = Data::new(AppState::default());

    info!("Listening on http://0.0.0.0:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(HtmxMiddleware::with_config(config.clone()))
            .route("/static/htmx-ext-fragments.js", web::get().to(extension_script))
            .route("/", web::get().to(home))
            .route("/counter", web::post().to(increment_counter))
            .route("/tasks", web::post().to(create_task))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}

/// Reads `FRAGMENTS_CONFIG` as JSON, falling back to the defaults when unset.
fn load_config() -> io::Result<FragmentsConfig> {
    match env::var("FRAGMENTS_CONFIG") {
        Ok(json) => FragmentsConfig::from_json_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e)),
        Err(_) => Ok(FragmentsConfig::default()),
    }
}
