use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use crate::config::Config;
use crate::error::{ForwardError, parse_error_body};
use crate::models::{GenerationResult, OutboundPayload};

// what the generation service sends back on 2xx, before validation
#[derive(Debug, Deserialize)]
struct GenerateReply {
    generated_text: Option<String>,
    response_time: Option<Value>
}

// one client for the whole process so connections are pooled across invocations
pub fn build_client(config: &Config) -> Result<Client, reqwest::Error> {

    Client::builder()
        .timeout(config.upstream_timeout)
        .connect_timeout(config.connect_timeout)
        .build()

}

pub async fn call_generate(
    client: &Client,
    config: &Config,
    payload: &OutboundPayload
) -> Result<GenerationResult, ForwardError> {

    // .json() sets Content-Type: application/json
    let response = client
        .post(config.generate_url())
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ForwardError::Upstream {
            status: status.as_u16(),
            body: parse_error_body(text)
        });
    }

    let reply: GenerateReply = serde_json::from_str(&text)?;

    let generated_text = reply.generated_text
        .ok_or(ForwardError::MalformedUpstreamResponse)?;

    Ok(GenerationResult {
        generated_text,
        response_time: reply.response_time
    })

}
