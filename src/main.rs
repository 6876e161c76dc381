mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use kanban::notify::TracingNotifier;
use kanban::store::{LeadStore, MemoryLeadStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();

    let store: Arc<dyn LeadStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::init_pool(database_url, config.db_max_connections).await?;
            tracing::info!(max_connections = config.db_max_connections, "postgres lead store ready");
            Arc::new(db::lead_store::PgLeadStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; leads are kept in memory and lost on exit");
            Arc::new(MemoryLeadStore::new())
        }
    };

    let state = state::AppState::new(store, Arc::new(TracingNotifier), config.board_sort);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, sort = ?config.board_sort, "pipeline listening");
    axum::serve(listener, app).await?;
    Ok(())
}
