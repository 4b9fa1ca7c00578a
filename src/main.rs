mod client;
mod config;
mod error;
mod forwarder;
mod handlers;
mod logger;
mod metrics;
mod models;
#[cfg(test)]
mod test_support;

use std::sync::Arc;
use axum::http::{HeaderName, Method};
use axum::routing::{get, post, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use reqwest::Client;
use config::Config;
use metrics::Metrics;
use models::ALLOW_HEADERS;

// shared by every invocation: the pooled http client is
// built once, config and counters are behind Arcs
#[derive(Clone)]
pub struct AppState {
    pub http_client: Client,
    pub config: Arc<Config>,
    pub metrics: Arc<Metrics>
}

pub fn app(state: AppState) -> Router {

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/invoke", post(handlers::invoke))
        .route("/generate", post(handlers::generate).layer(cors_layer()))
        .with_state(state)

}

// answers browser preflights on /generate
fn cors_layer() -> CorsLayer {

    let allowed_headers: Vec<HeaderName> = ALLOW_HEADERS
        .split(',')
        .filter_map(|name| HeaderName::from_bytes(name.as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::OPTIONS, Method::POST])
        .allow_headers(allowed_headers)

}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "generate_forwarder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let http_client = client::build_client(&config)?;

    info!(
        "Forwarding to {} (timeout {:?}, connect timeout {:?})",
        config.generate_url(), config.upstream_timeout, config.connect_timeout
    );

    let bind_addr = config.bind_addr;
    let state = AppState {
        http_client,
        config: Arc::new(config),
        metrics: Arc::new(Metrics::new())
    };

    let listener = TcpListener::bind(bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())

}
