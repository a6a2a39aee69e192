//! common_lib/src/lib.rs

pub mod analytics;
pub mod common_structs;
pub mod error;
pub mod init;
pub mod market_hours;
pub mod stock_preferences;
