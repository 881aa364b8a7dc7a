mod auth;
mod config;
mod middleware;

mod db;
mod doctors;
mod error;
mod geo;
mod journal;
mod medreport;
mod models;
mod report;
mod routes;
mod sos;
mod store;

use std::sync::Arc;

use crate::{config::Config, medreport::MedreportClient, models::AppState, store::DocumentStore};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let pool = db::connect_pg(&cfg.database_url).await?;

    let generator = MedreportClient::new(
        &cfg.ollama_url,
        &cfg.medreport_model,
        cfg.generate_timeout_secs,
    )?;

    let state = AppState {
        store: DocumentStore::new(pool.clone()),
        db: pool,
        generator: Arc::new(generator),
        session_ttl_hours: cfg.session_ttl_hours,
    };

    // Allow the browser front-end (journal/report/booking screens) to call
    // the API; without this the OPTIONS preflight fails with 405.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
