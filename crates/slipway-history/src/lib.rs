//! slipway-history — the release history for one deployment target.
//!
//! Every deployment attempt against a release name is recorded as a
//! [`Release`]; the [`ReleaseHistory`] keeps them most-recent-first,
//! assigns monotonically increasing numbers, and answers the queries the
//! rollout engine needs (latest attempt, last success, last blue/green
//! success).
//!
//! # Persistence
//!
//! The history lives in the cluster as one opaque YAML blob per release
//! name. [`codec::encode`]/[`codec::decode`] are a lossless round trip
//! over the full ordered sequence; the in-memory history is a working
//! copy that is re-encoded and rewritten whole after every mutation that
//! must survive a crash.

pub mod codec;
pub mod error;
pub mod history;
pub mod types;

pub use error::{HistoryError, HistoryResult};
pub use history::ReleaseHistory;
pub use types::{Color, ColorTag, Release, ReleaseStatus};
