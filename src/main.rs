use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use todo_agenda::{config::Config, db::Database};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db = match open_database(&config) {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("DB Error: {err:#}");
            std::process::exit(1);
        }
    };

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server Running at http://{addr}/");

    todo_agenda::run(listener, Arc::new(db)).await?;

    Ok(())
}

fn open_database(config: &Config) -> Result<Database> {
    let db = Database::connect(&config.db_path)?;
    if config.init_schema {
        db.create_schema()?;
    }
    Ok(db)
}
