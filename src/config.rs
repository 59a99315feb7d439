use clap::{Parser, Subcommand};

/// Restaurant order management: server-rendered order pages and a product API.
#[derive(Debug, Parser)]
#[command(name = "cafe_orders", version, about)]
pub struct Cli {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Products per page on the list endpoint.
    #[arg(
        long,
        env = "PAGE_SIZE",
        default_value_t = 10,
        value_parser = clap::value_parser!(i64).range(1..=1000)
    )]
    pub page_size: i64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Insert tables 1 to 20 unless they already exist.
    LoadTables,
    /// Insert the starter menu unless it already exists.
    LoadProducts,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

/// Settings the HTTP layer reads at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSettings {
    pub page_size: i64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl From<&Cli> for ApiSettings {
    fn from(cli: &Cli) -> Self {
        Self {
            page_size: cli.page_size,
        }
    }
}
