//! init.rs
//!
//! load .env and start tracing; call once at the top of main

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// `dir` is where the .env file lives, usually env!("CARGO_MANIFEST_DIR")
pub fn init(dir: &str) {
    let env_path = format!("{}/.env", dir);
    let dotenv_result = dotenvy::from_path(&env_path);

    // RUST_LOG=frontend=debug,common_lib=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    match dotenv_result {
        Ok(_) => tracing::debug!("[init] loaded {}", &env_path),
        Err(e) => tracing::debug!("[init] no .env at {}: {:?}", &env_path, &e),
    }
}
