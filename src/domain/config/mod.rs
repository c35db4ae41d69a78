//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, DEFAULT_AUTHOR, DEFAULT_LOG_LEVEL};
