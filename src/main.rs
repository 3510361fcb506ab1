use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod controllers;
mod db_ops;
mod errors;
mod extractors;
mod models;
mod routes;
mod service;
mod validation;

use config::{Config, StoreBackend};
use db_ops::{memory::MemoryStore, postgres::PgStore, NoteStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    if let Err(err) = run().await {
        error!(error = ?err, "notes-api exited with an error");
        std::process::exit(1);
    }
}

fn init_logging() {
    // RUST_LOG is a standard env filter; default: "notes_api=debug,tower_http=debug"
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notes_api=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let store = create_store(&config.store).await?;
    let state = models::AppState {
        notes: service::NoteService::new(store),
    };
    let app = routes::get_routes()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    info!(addr = %config.bind_addr, "listening");
    axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

async fn create_store(backend: &StoreBackend) -> Result<Arc<dyn NoteStore>> {
    let store: Arc<dyn NoteStore> = match backend {
        StoreBackend::Memory => {
            info!("using in-memory note store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres(pg) => {
            let store = PgStore::connect(pg).await?;
            store.init_schema().await?;
            Arc::new(store)
        }
    };

    Ok(store)
}
