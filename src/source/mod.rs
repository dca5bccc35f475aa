//! Data source module - Fetching snapshots from the Torn API
//!
//! The API client runs blocking requests; the poller moves them off the
//! UI thread and hands the outcome back for the dashboard to apply.

mod poller;
mod snapshot;
mod torn;

pub use poller::SnapshotPoller;
pub use snapshot::{ApiError, Bar, Bars, CooldownValues, Race, Racing, Snapshot};
pub use torn::{DataSource, SourceError, TornApi, USER_AGENT};
