use std::io;

use cafe_orders::application::seed::{self, PRODUCTS_TRANSCRIPT, TABLES_TRANSCRIPT};
use cafe_orders::config::{Cli, Command};
use cafe_orders::{build_server, create_pool, run_migrations, ApiSettings, Repositories};
use clap::Parser;
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let pool = create_pool(&cli.database_url).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;
    let repos = Repositories::diesel(pool);

    match cli.command() {
        Command::Serve => {
            log::info!("Starting server at http://{}:{}", cli.host, cli.port);
            build_server(repos, ApiSettings::from(&cli), &cli.host, cli.port)?.await
        }
        Command::LoadTables => {
            println!("{}", TABLES_TRANSCRIPT.start);
            let tables = repos.tables.clone();
            let outcomes = actix_web::web::block(move || seed::load_tables(tables.as_ref()))
                .await
                .map_err(io::Error::other)?
                .map_err(io::Error::other)?;
            for line in TABLES_TRANSCRIPT.report(&outcomes) {
                println!("{}", line);
            }
            Ok(())
        }
        Command::LoadProducts => {
            println!("{}", PRODUCTS_TRANSCRIPT.start);
            let products = repos.products.clone();
            let outcomes = actix_web::web::block(move || seed::load_products(products.as_ref()))
                .await
                .map_err(io::Error::other)?
                .map_err(io::Error::other)?;
            for line in PRODUCTS_TRANSCRIPT.report(&outcomes) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}
