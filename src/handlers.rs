use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use crate::AppState;
use crate::error::ForwardError;
use crate::forwarder::{handle_event, reject};
use crate::metrics::MetricsSnapshot;
use crate::models::{InboundEvent, ProxyResponse};

pub async fn health_check() -> &'static str {

    "OK"

}

// event in, response contract out, both as JSON.
// the body is decoded here so a bad event still gets the normal error shape
pub async fn invoke(State(state): State<AppState>, body: Bytes) -> Json<ProxyResponse> {

    if body.is_empty() {
        return Json(handle_event(&state, InboundEvent::default()).await);
    }

    match serde_json::from_slice::<InboundEvent>(&body) {
        Ok(event) => Json(handle_event(&state, event).await),
        Err(e) => Json(reject(&state, ForwardError::InvalidBody(format!("invalid event: {}", e))))
    }

}

// the raw request body is the event body, the response contract becomes a real HTTP response
pub async fn generate(State(state): State<AppState>, body: Bytes) -> Response {

    let text = match String::from_utf8(body.to_vec()) {
        Ok(text) => text,
        Err(e) => {
            let err = ForwardError::InvalidBody(format!("request body is not valid UTF-8: {}", e));
            return render(reject(&state, err));
        }
    };

    let event = InboundEvent {
        body: (!text.is_empty()).then_some(text)
    };

    render(handle_event(&state, event).await)

}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {

    Json(state.metrics.snapshot())

}

fn render(proxy: ProxyResponse) -> Response {

    let status = StatusCode::from_u16(proxy.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = (status, proxy.body).into_response();
    let headers = response.headers_mut();
    for (name, value) in &proxy.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!("Dropping invalid response header {}", name)
        }
    }
    response

}
