//! Regeneration module - Resource bars and full-time prediction

mod predictor;

pub use predictor::{predict_ready, RegenPrediction, RegenRate, ResourceKind, ResourceState};
