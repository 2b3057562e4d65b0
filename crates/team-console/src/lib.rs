//! Team Console - terminal host for the dashboard views
//!
//! Wires configuration, logging and the team service client to a tabbed
//! ratatui console. The selected tab is each view's activation signal.

pub mod config;
pub mod console;
pub mod dashboard;
pub mod logging;
pub mod print;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, KeyOutcome, Tab};
pub use print::{render_once, ViewKind};
