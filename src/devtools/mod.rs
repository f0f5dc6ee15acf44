//! Per-tab CPU estimation over the browser's remote-debugging endpoint.
//!
//! The endpoint's target list is fetched over HTTP; each page is then
//! measured through its own WebSocket session. Task-duration deltas are a
//! relative proxy for CPU work, so the result is a share of 100, not an
//! absolute percentage.

pub mod error;
pub mod estimator;
pub mod session;
pub mod targets;

pub use error::DevtoolsError;
pub use estimator::{TabEstimator, TabMetric, normalize_shares, task_delta};
