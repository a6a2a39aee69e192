//! main.rs
#![forbid(unsafe_code)]

mod auth;
mod configuration;
mod market;
mod stocks;
mod utils;
mod web_server;

use common_lib::init::init;

use crate::web_server::WebServer;

/// main
fn main() {
    // .env sits next to this crate's Cargo.toml
    init(env!("CARGO_MANIFEST_DIR"));

    let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .thread_name("market-pulse")
        .enable_all()
        .build()
        .expect("Tokio runtime didn't start");

    tokio_runtime.block_on(async {
        WebServer::run().await;
    });
}
