use crate::discord;
use crate::metrics::setup_metrics;
use crate::server::{ServerConfig, start_server};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Relay Prometheus Alertmanager webhook notifications to Discord
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The address to bind to
    #[arg(long, env = "ALERTCORD_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// The port to listen on
    #[arg(short, long, env = "ALERTCORD_PORT", default_value_t = 7000)]
    pub port: u16,

    /// Base URL of the Discord API the webhooks are executed against
    #[arg(long, env = "ALERTCORD_DISCORD_URL", default_value = discord::DEFAULT_BASE_URL)]
    pub discord_url: String,

    /// Name of the query parameter whose value becomes the plain-text
    /// message content
    #[arg(long, env = "ALERTCORD_CONTENT_PARAM", default_value = "pretext")]
    pub content_param: String,
}

pub async fn run() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "alertcord=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Starting server on {}:{}", args.host, args.port);

    let handle = setup_metrics();

    let addr = SocketAddr::from((args.host, args.port));
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to port");
    let (_tx, rx) = tokio::sync::oneshot::channel();
    start_server(
        listener,
        rx,
        ServerConfig {
            discord_url: args.discord_url,
            content_param: args.content_param,
            prometheus_handle: handle,
        },
    )
    .await;
}
