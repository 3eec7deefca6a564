mod alertmanager;
mod buildinfo;
mod cli;
mod discord;
mod metrics;
mod server;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run().await;
}
