//! Barwatch - A terminal dashboard for Torn bars and cooldowns
//!
//! Polls the Torn API for energy, nerve, cooldowns and races, predicts when
//! each bar will be full, and counts everything down locally between polls.

pub mod clock;
pub mod config;
pub mod cooldowns;
pub mod dashboard;
pub mod regen;
pub mod source;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use dashboard::{Dashboard, DashboardState};
pub use source::{DataSource, TornApi};
