//! Request authentication for Slack Events API deliveries.
//!
//! Two checks, always run in this order before a body is interpreted:
//! the replay-window [`FreshnessGate`] and the `v0` HMAC-SHA256 signature.

pub mod freshness;
pub mod signature;

pub use freshness::{FreshnessGate, REPLAY_WINDOW_SECS};
pub use signature::{constant_time_eq, sign, verify, SIGNATURE_VERSION};
