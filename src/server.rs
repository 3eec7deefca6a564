use crate::alertmanager::{self, AlertManagerWebhook};
use crate::buildinfo;
use crate::discord::{self, RichEmbed, WebhookMessage};
use axum::http::StatusCode;
use axum::response::Html;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub struct ServerConfig {
    /// Base URL of the Discord API, without the webhook path.
    pub discord_url: String,
    /// Name of the query parameter copied into the message `content`.
    pub content_param: String,
    pub prometheus_handle: PrometheusHandle,
}

#[derive(Clone)]
struct AppState {
    http: reqwest::Client,
    discord_url: String,
    content_param: String,
    prometheus_handle: PrometheusHandle,
    start_time: Instant,
}

pub async fn start_server(
    listener: TcpListener,
    shutdown_signal: oneshot::Receiver<()>,
    config: ServerConfig,
) {
    let start_time = Instant::now();
    let start_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();

    gauge!("alertcord_start_time_seconds").set(start_timestamp);
    gauge!("alertcord_version_info", "version" => buildinfo::version(), "git_hash" => buildinfo::git_hash()).set(1.0);

    let app_state = AppState {
        http: reqwest::Client::new(),
        discord_url: config.discord_url,
        content_param: config.content_param,
        prometheus_handle: config.prometheus_handle,
        start_time,
    };

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/status", get(status_handler))
        .route("/statusz", get(status_handler))
        .route("/:id/:token", post(relay_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
        .layer(CatchPanicLayer::new())
        .with_state(app_state);

    let addr = listener.local_addr().unwrap();
    println!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal.await.ok();
        })
        .await
        .unwrap();
}

/// Accepts one Alertmanager batch, renders it as a Discord message and
/// forwards it to the webhook addressed by the path. Answers 400 when the
/// body cannot be decoded or carries no `alertname` grouping label, 500 when
/// Discord cannot be reached, and otherwise whatever status Discord
/// answered with, always with an empty body.
async fn relay_handler(
    State(state): State<AppState>,
    Path((id, token)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    payload: Result<Json<AlertManagerWebhook>, JsonRejection>,
) -> StatusCode {
    counter!("alertcord_http_requests_total", "endpoint" => "/:id/:token").increment(1);

    let Json(webhook) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug!("failed to decode alert batch: {}", rejection);
            return StatusCode::BAD_REQUEST;
        }
    };

    // the token is sensitive; log lines only ever carry the webhook id
    let Some(title) = alertmanager::format_title(&webhook) else {
        debug!(
            "alert batch for webhook {} has no alertname grouping label",
            id
        );
        return StatusCode::BAD_REQUEST;
    };

    info!(
        "relaying {} batch with {} alerts to webhook {}",
        webhook.status,
        webhook.alerts.len(),
        id
    );

    let embed = RichEmbed {
        title,
        description: alertmanager::format_description(&webhook),
        color: discord::color_for_status(&webhook.status),
    };

    let message = WebhookMessage {
        content: params
            .get(&state.content_param)
            .cloned()
            .unwrap_or_default(),
        embeds: vec![embed],
    };

    let url = discord::webhook_url(&state.discord_url, &id, &token);

    // the outbound call lives inside this handler future: if the caller
    // disconnects or times out, the future is dropped and the in-flight
    // request to Discord is cancelled with it
    match discord::execute_webhook(&state.http, &url, &message).await {
        Ok(status) => {
            counter!("alertcord_relays_total", "code" => status.as_u16().to_string()).increment(1);
            status
        }
        Err(e) => {
            error!("failed to relay alert batch to webhook {}: {}", id, e);
            counter!("alertcord_relay_failures_total").increment(1);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn metrics_handler(State(state): State<AppState>) -> String {
    counter!("alertcord_http_requests_total", "endpoint" => "/metrics").increment(1);
    state.prometheus_handle.render()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

async fn status_handler(State(state): State<AppState>) -> Html<String> {
    counter!("alertcord_http_requests_total", "endpoint" => "/status").increment(1);
    let uptime = format_uptime(state.start_time.elapsed());

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>alertcord Status</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; background: #f5f5f5; }}
        h1 {{ color: #333; }}
        .card {{ background: white; border: 1px solid #ddd; padding: 1rem; border-radius: 4px; margin-bottom: 1rem; }}
        .stat {{ margin: 0.5rem 0; }}
        .label {{ font-weight: bold; }}
        h2 {{ margin-top: 0; color: #555; font-size: 1.1rem; }}
    </style>
</head>
<body>
    <h1>alertcord Status</h1>
    <div class="card">
        <h2>Configuration</h2>
        <div class="stat"><span class="label">Version:</span> {version}</div>
        <div class="stat"><span class="label">Discord URL:</span> {discord_url}</div>
        <div class="stat"><span class="label">Content parameter:</span> {content_param}</div>
    </div>
    <div class="card">
        <h2>Status</h2>
        <div class="stat"><span class="label">Uptime:</span> {uptime}</div>
        <div class="stat"><span class="label">Source:</span> <a href="{repository}">{repository}</a></div>
    </div>
</body>
</html>"#,
        version = html_escape(&buildinfo::version_full()),
        discord_url = html_escape(&state.discord_url),
        content_param = html_escape(&state.content_param),
        uptime = uptime,
        repository = html_escape(buildinfo::repository()),
    );
    Html(html)
}

fn format_uptime(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let days = total_secs / 86400;
    let hours = (total_secs % 86400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
