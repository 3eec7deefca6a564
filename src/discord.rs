use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Default base URL of the Discord API.
pub const DEFAULT_BASE_URL: &str = "https://discord.com";

/// Embed accent colors: red while firing, green once resolved.
pub const COLOR_FIRING: i32 = 0xFF0000;
pub const COLOR_RESOLVED: i32 = 0x00FF00;

/// Payload for executing a Discord webhook.
#[derive(Debug, Deserialize, Serialize)]
pub struct WebhookMessage {
    pub content: String,
    pub embeds: Vec<RichEmbed>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RichEmbed {
    pub title: String,
    pub description: String,
    pub color: i32,
}

#[derive(Debug)]
pub enum Error {
    /// The outbound payload could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// Transport-level failure reaching the webhook endpoint (connection
    /// refused, DNS, timeout, cancelled request).
    Dispatch(reqwest::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Serialize(e) => write!(f, "failed to encode webhook payload: {}", e),
            Error::Dispatch(e) => write!(f, "failed to reach webhook endpoint: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialize(e) => Some(e),
            Error::Dispatch(e) => Some(e),
        }
    }
}

/// Only `resolved` (exact match) flips the color; Alertmanager sends
/// lowercase statuses, anything unrecognized is shown as still firing.
pub fn color_for_status(status: &str) -> i32 {
    if status == "resolved" {
        COLOR_RESOLVED
    } else {
        COLOR_FIRING
    }
}

/// Builds the webhook execution URL from the id/token pair taken off the
/// inbound request path. The segments are interpolated verbatim, without
/// re-encoding, exactly as they arrived.
pub fn webhook_url(base_url: &str, id: &str, token: &str) -> String {
    format!(
        "{}/api/webhooks/{}/{}",
        base_url.trim_end_matches('/'),
        id,
        token
    )
}

/// POSTs the message to the webhook URL and returns whatever status the
/// endpoint answered with; interpreting non-2xx answers is left to the
/// caller. The response body is never read.
pub async fn execute_webhook(
    client: &reqwest::Client,
    url: &str,
    message: &WebhookMessage,
) -> Result<StatusCode, Error> {
    let body = serde_json::to_vec(message).map_err(Error::Serialize)?;

    let response = client
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(Error::Dispatch)?;

    Ok(response.status())
}
