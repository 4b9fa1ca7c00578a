use std::fs::OpenOptions;
use std::io::Write;
use chrono::Utc;
use uuid::Uuid;

pub fn format_entry(status: u16, request_id: &Uuid, elapsed_ms: u128) -> String {

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "{} | {:3} | {} | {:6} ms\n",
        timestamp, status, request_id, elapsed_ms
    )

}

// append one line per invocation, a failed write never affects the response
pub fn log_request(
    log_path: &str,
    status: u16,
    request_id: &Uuid,
    elapsed_ms: u128,
) {
    let log_entry = format_entry(status, request_id, elapsed_ms);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        if let Err(e) = file.write_all(log_entry.as_bytes()) {
            tracing::warn!("Failed to write to log file {}: {}", log_path, e);
        }
    } else {
        tracing::warn!("Failed to open log file: {}", log_path);
    }
}
