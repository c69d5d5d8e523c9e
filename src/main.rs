mod eager_env;
mod render;
mod ring;
mod server;
mod utils;

use crate::{
    eager_env::check_env,
    server::{AppStateInner, start_server},
};
use log::{info, warn};
use std::{net::TcpListener, sync::Arc};

#[tokio::main]
async fn main() {
    // Before the logger, so a RUST_LOG set in .env is honored
    let dotenv = dotenvy::dotenv();

    env_logger::builder()
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .init();

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env: {e}"),
    }

    check_env();

    let state = Arc::new(AppStateInner::new(*eager_env::DEFAULT_CANVAS));
    let listener = TcpListener::bind((*eager_env::BIND_ADDRESS, *eager_env::PORT))
        .expect("Failed to bind PORT");

    info!(
        "Listening on {} (default canvas {})",
        listener.local_addr().expect("Failed to get local address"),
        *eager_env::DEFAULT_CANVAS
    );

    start_server(state, listener)
        .await
        .expect("error while running server");
}
