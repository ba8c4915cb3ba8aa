use std::{fs, path::Path};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use tokio::sync::RwLock;
use tracing::info;

mod config;
mod directory;
mod error;
mod ledger;
mod routes;
mod schemas;
mod telemetry;

use config::Config;
use directory::Directory;
use schemas::UsersJson;

fn load_seed(path: &Path) -> anyhow::Result<Directory> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let seed: UsersJson = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse seed file {}", path.display()))?;
    let directory = Directory::from_users(seed.users)
        .with_context(|| format!("seed file {} is not a valid ledger", path.display()))?;
    Ok(directory)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = Config::from_env()?;
    let directory = match &config.seed {
        Some(path) => load_seed(path)?,
        None => Directory::new(),
    };
    info!(users = directory.len(), "directory ready");

    let directory = web::Data::new(RwLock::new(directory));
    let cors_origin = config.cors_origin.clone();

    info!(host = %config.host, port = config.port, "starting server");
    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };
        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(directory.clone())
            .configure(routes::configure)
            .default_service(web::to(routes::unknown_route))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
