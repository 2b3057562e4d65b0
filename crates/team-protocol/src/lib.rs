//! Team Protocol - data model shared by the dashboard crates
//!
//! Mirrors the JSON shapes returned by the remote team service
//! (referral code, downline structure and the `{success, data, message}`
//! response envelope) and the display constants both views agree on.

pub mod constants;
pub mod level;
pub mod types;

pub use constants::*;
pub use level::{accent_for_level, LevelAccent, LevelTier};
pub use types::*;
