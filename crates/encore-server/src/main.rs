use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use encore_api::state::{AppState, AppStateInner};
use encore_core::chats::ChatAuthority;
use encore_core::matching::MatchEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("ENCORE_DB_PATH").unwrap_or_else(|_| "encore.db".into());
    let host = std::env::var("ENCORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("ENCORE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database — one handle for the whole process, shared by reference
    let db = Arc::new(encore_db::Database::open(&PathBuf::from(&db_path))?);

    // Shared state
    let engine = MatchEngine::new(db.clone());
    let chats = ChatAuthority::new(engine.clone(), db);
    let state: AppState = Arc::new(AppStateInner { engine, chats });

    // Routes
    let app = encore_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Encore server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
