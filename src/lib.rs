pub mod application;
pub mod config;
pub mod db;
pub mod docs;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod infrastructure;
pub mod pages;
pub mod schema;
pub mod state;
pub mod validation;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::ApiSettings;
pub use db::{create_pool, DbPool};
pub use state::Repositories;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type MigrationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Registers the order pages, the product API and its documentation.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(handlers::orders::configure)
        .configure(handlers::products::configure)
        .service(
            SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", docs::ApiDoc::openapi()),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    repos: Repositories,
    settings: ApiSettings,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let repos = web::Data::new(repos);
    let settings = web::Data::new(settings);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(repos.clone())
            .app_data(settings.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
