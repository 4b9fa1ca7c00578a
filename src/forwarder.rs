use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use crate::AppState;
use crate::client::call_generate;
use crate::error::ForwardError;
use crate::logger::log_request;
use crate::models::{GenerationResult, InboundEvent, InboundRequest, ProxyResponse};

/// Runs one invocation end to end. Every failure is turned into a
/// well-formed [`ProxyResponse`], so this never returns an error.
pub async fn handle_event(state: &AppState, event: InboundEvent) -> ProxyResponse {

    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let outcome = forward(state, event.body.as_deref()).await;

    finish(state, request_id, started, outcome)

}

/// Answers a request whose body could not even be turned into an event.
pub fn reject(state: &AppState, err: ForwardError) -> ProxyResponse {

    finish(state, Uuid::new_v4(), Instant::now(), Err(err))

}

fn finish(
    state: &AppState,
    request_id: Uuid,
    started: Instant,
    outcome: Result<GenerationResult, ForwardError>
) -> ProxyResponse {

    let response = match outcome {
        Ok(result) => {
            state.metrics.record_success();
            ProxyResponse::success(&result)
        }
        Err(err) => {
            record_failure(state, &err);
            warn!(%request_id, status = err.status_code(), "Forwarding failed: {}", err);
            ProxyResponse::failure(err.status_code(), err.detail())
        }
    };

    let elapsed_ms = started.elapsed().as_millis();
    info!(%request_id, status = response.status_code, elapsed_ms = elapsed_ms as u64, "Handled invocation");

    if let Some(path) = &state.config.log_path {
        log_request(path, response.status_code, &request_id, elapsed_ms);
    }

    response

}

async fn forward(state: &AppState, body: Option<&str>) -> Result<GenerationResult, ForwardError> {

    let payload = InboundRequest::parse(body)?.into_payload()?;

    call_generate(&state.http_client, &state.config, &payload).await

}

fn record_failure(state: &AppState, err: &ForwardError) {

    match err {
        e if e.is_client_error() => state.metrics.record_client_error(),
        ForwardError::Upstream { .. } => state.metrics.record_upstream_error(),
        _ => state.metrics.record_internal_error()
    }

}
