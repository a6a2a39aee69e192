//! common_structs.rs

use strum::{Display, EnumString};

/// set by the upstream auth provider when a user signs in
pub static SESSION_USERNAME: &str = "session_username";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigLocation {
    Docker,
    NotDocker,
}

impl ConfigLocation {
    /// CONFIG_LOCATION=docker|not_docker, anything else is not_docker
    pub fn from_env() -> ConfigLocation {
        let location = std::env::var("CONFIG_LOCATION").unwrap_or_else(|_| "not_docker".to_owned());
        location.parse().unwrap_or_else(|_| {
            tracing::debug!("[from_env] unrecognized CONFIG_LOCATION: {}", &location);
            ConfigLocation::NotDocker
        })
    }
}
