//! configuration.rs
//!
//! configuration.yaml, overridable from the environment with APP__ variables (APP__APPLICATION_PORT=8081)

use common_lib::common_structs::ConfigLocation;
use common_lib::market_hours::TradingCalendar;
use common_lib::stock_preferences::WatchlistStock;
use serde::Deserialize;

const DEFAULT_APPLICATION_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_application_port")]
    pub application_port: u16,
    /// trading hours the clock evaluates; US equities when omitted
    #[serde(default)]
    pub market: TradingCalendar,
    #[serde(default)]
    pub watchlist: Vec<WatchlistStock>,
}

fn default_application_port() -> u16 {
    DEFAULT_APPLICATION_PORT
}

/// directory holding configuration.yaml and static/
pub fn config_dir(config_location: ConfigLocation) -> String {
    match config_location {
        ConfigLocation::Docker => ".".to_string(),
        ConfigLocation::NotDocker => env!("CARGO_MANIFEST_DIR").to_string(),
    }
}

pub fn get_yaml_configuration() -> Result<Settings, config::ConfigError> {
    let path = format!("{}/configuration.yaml", config_dir(ConfigLocation::from_env()));
    tracing::debug!("[get_yaml_configuration] reading {}", &path);
    load_configuration(&path)
}

/// a missing file is fine, everything has a default
pub fn load_configuration(path: &str) -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize::<Settings>()
}
