//! Configuration
//!
//! Loaded from a RON file, with the API key optionally supplied through the
//! environment.

mod settings;

pub use settings::{
    ApiConfig, Config, ConfigError, CooldownLinks, RegenRates, API_KEY_ENV, CONFIG_PATH_ENV,
    DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL,
};
