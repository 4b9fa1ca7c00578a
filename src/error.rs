//! Failures that can happen while forwarding one request.
//!
//! Every variant maps to an HTTP status through [`ForwardError::status_code`]
//! and to the `error` field of the response body through
//! [`ForwardError::detail`], so nothing escapes the forwarder unhandled.

use std::error::Error as _;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForwardError {
    /// Required inbound field absent or null
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Inbound body is not a JSON object of the expected shape
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    /// Downstream answered with a non-2xx status
    #[error("Downstream service returned status {status}")]
    Upstream { status: u16, body: Value },

    /// Downstream answered 2xx without `generated_text`
    #[error("Missing 'generated_text' in response")]
    MalformedUpstreamResponse,

    /// Connect, timeout or transport failure
    #[error("Request to downstream service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Downstream 2xx body that is not valid JSON
    #[error("Invalid JSON in downstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ForwardError {

    pub fn status_code(&self) -> u16 {
        match self {
            ForwardError::MissingParameter(_) | ForwardError::InvalidBody(_) => 400,
            ForwardError::Upstream { status, .. } => *status,
            ForwardError::MalformedUpstreamResponse
            | ForwardError::Http(_)
            | ForwardError::Decode(_) => 500,
        }
    }

    /// Value placed under `error` in the response body.
    pub fn detail(&self) -> Value {
        match self {
            ForwardError::Upstream { body, .. } => body.clone(),
            ForwardError::Http(err) => {
                // reqwest keeps the useful part (refused, dns, timed out) in the source chain
                let mut message = self.to_string();
                let mut source = err.source();
                while let Some(cause) = source {
                    message.push_str(": ");
                    message.push_str(&cause.to_string());
                    source = cause.source();
                }
                Value::String(message)
            }
            other => Value::String(other.to_string()),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, ForwardError::MissingParameter(_) | ForwardError::InvalidBody(_))
    }

}

/// Downstream error bodies are surfaced as JSON when they parse, raw text otherwise.
pub fn parse_error_body(text: String) -> Value {

    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_mapping() {

        assert_eq!(ForwardError::MissingParameter("prompt").status_code(), 400);
        assert_eq!(ForwardError::InvalidBody("eof".into()).status_code(), 400);
        assert_eq!(ForwardError::Upstream { status: 422, body: Value::Null }.status_code(), 422);
        assert_eq!(ForwardError::MalformedUpstreamResponse.status_code(), 500);

        let decode = serde_json::from_str::<Value>("nope").unwrap_err();
        assert_eq!(ForwardError::from(decode).status_code(), 500);

    }

    #[test]
    fn detail_is_string_except_for_upstream() {

        assert_eq!(
            ForwardError::MissingParameter("top_p").detail(),
            json!("Missing parameter: top_p")
        );
        assert_eq!(
            ForwardError::MalformedUpstreamResponse.detail(),
            json!("Missing 'generated_text' in response")
        );

        let upstream = ForwardError::Upstream { status: 422, body: json!({"detail": "invalid top_p"}) };
        assert_eq!(upstream.detail(), json!({"detail": "invalid top_p"}));

    }

    #[test]
    fn error_body_falls_back_to_raw_text() {

        assert_eq!(parse_error_body(r#"{"detail": "x"}"#.to_string()), json!({"detail": "x"}));
        assert_eq!(parse_error_body("Bad Gateway".to_string()), json!("Bad Gateway"));
        assert_eq!(parse_error_body(String::new()), json!(""));

    }

    #[test]
    fn only_input_errors_are_client_errors() {

        assert!(ForwardError::MissingParameter("prompt").is_client_error());
        assert!(!ForwardError::Upstream { status: 404, body: Value::Null }.is_client_error());
        assert!(!ForwardError::MalformedUpstreamResponse.is_client_error());

    }

}
