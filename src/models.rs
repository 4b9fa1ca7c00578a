use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};
use crate::error::ForwardError;

pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;
pub const DEFAULT_DO_SAMPLE: bool = true;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub const ALLOW_HEADERS: &str = "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
pub const ALLOW_METHODS: &str = "OPTIONS,POST";

// the HTTP-triggered event, only the raw body is read
#[derive(Debug, Default, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub body: Option<String>
}

// absent and null fields both land on None here, the
// required ones are checked in into_payload.
// numbers are not range checked, the generation service owns that
#[derive(Debug, Default, Deserialize)]
pub struct InboundRequest {
    pub prompt: Option<String>,
    pub top_p: Option<f64>,
    pub max_new_tokens: Option<Number>,
    pub do_sample: Option<bool>,
    pub temperature: Option<f64>
}

impl InboundRequest {

    /// Parses the raw event body. A missing or blank body counts as `{}`
    /// so the required field checks report it instead of the parser.
    pub fn parse(body: Option<&str>) -> Result<Self, ForwardError> {

        let raw = match body.map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => "{}"
        };

        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ForwardError::InvalidBody(e.to_string()))?;

        if !value.is_object() {
            return Err(ForwardError::InvalidBody("expected a JSON object".to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| ForwardError::InvalidBody(e.to_string()))

    }

    pub fn into_payload(self) -> Result<OutboundPayload, ForwardError> {

        let prompt = self.prompt
            .ok_or(ForwardError::MissingParameter("prompt"))?;

        let top_p = self.top_p
            .ok_or(ForwardError::MissingParameter("top_p"))?;

        Ok(OutboundPayload {
            prompt,
            max_new_tokens: self.max_new_tokens
                .unwrap_or_else(|| Number::from(DEFAULT_MAX_NEW_TOKENS)),
            do_sample: self.do_sample.unwrap_or(DEFAULT_DO_SAMPLE),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            top_p
        })

    }

}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundPayload {
    pub prompt: String,
    pub max_new_tokens: Number,
    pub do_sample: bool,
    pub temperature: f64,
    pub top_p: f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub generated_text: String,
    /// Passed through as the service sent it
    pub response_time: Option<Value>
}

/// What every invocation returns: status, headers and a JSON encoded body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String
}

impl ProxyResponse {

    pub fn success(result: &GenerationResult) -> Self {

        let body = json!({
            "success": true,
            "generated_text": result.generated_text,
            "response_time": result.response_time
        });

        ProxyResponse {
            status_code: 200,
            headers: cors_headers(),
            body: body.to_string()
        }

    }

    pub fn failure(status_code: u16, error: Value) -> Self {

        let body = json!({
            "success": false,
            "error": error
        });

        ProxyResponse {
            status_code,
            headers: error_headers(),
            body: body.to_string()
        }

    }

}

pub fn error_headers() -> BTreeMap<String, String> {

    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string())
    ])

}

// success responses also advertise the allowed headers and methods
pub fn cors_headers() -> BTreeMap<String, String> {

    let mut headers = error_headers();
    headers.insert("Access-Control-Allow-Headers".to_string(), ALLOW_HEADERS.to_string());
    headers.insert("Access-Control-Allow-Methods".to_string(), ALLOW_METHODS.to_string());
    headers

}
