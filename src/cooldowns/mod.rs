//! Cooldowns module - Per-action countdowns ticked locally between polls

mod store;

pub use store::{CooldownCategory, CooldownStore};
