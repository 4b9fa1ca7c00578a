// shared helpers for the async tests: in-process downstream servers and state
use std::sync::Arc;
use axum::Router;
use tokio::net::TcpListener;
use crate::AppState;
use crate::client::build_client;
use crate::config::Config;
use crate::metrics::Metrics;

pub async fn spawn_downstream(app: Router) -> String {

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)

}

// bind then drop a listener, the port is then very likely refused
pub async fn unreachable_base_url() -> String {

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)

}

pub fn state_for(base_url: &str) -> AppState {

    state_with(Config::new(base_url))

}

pub fn state_with(config: Config) -> AppState {

    AppState {
        http_client: build_client(&config).unwrap(),
        config: Arc::new(config),
        metrics: Arc::new(Metrics::new())
    }

}
