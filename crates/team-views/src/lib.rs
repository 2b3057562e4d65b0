//! Team Views - the referral-code panel and the downline hierarchy viewer
//!
//! Both views share one [`loader::ActivationLoader`]: it runs the
//! initialize-then-fetch sequence on each rising edge of the activation
//! signal and exposes a [`loader::ViewState`]. Views render to ratatui
//! lines so the console can lay them out and `print` mode can flatten them
//! to text.

pub mod clipboard;
pub mod hierarchy;
pub mod loader;
pub mod referral;
pub mod style;
pub mod tree;

pub use clipboard::{Clipboard, ClipboardError, CopyFeedback, Osc52Clipboard, RecordingClipboard};
pub use hierarchy::{DownlineSteps, TeamHierarchyView, HIERARCHY_MESSAGES};
pub use loader::{ActivationLoader, LoadMessages, LoadSteps, ViewState};
pub use referral::{ReferralCodeSteps, ReferralCodeView, REFERRAL_MESSAGES};
pub use style::{plain_text, RenderedPage};
pub use tree::{render_tree, ExpansionState, NodeKey, Toggle, TreeOptions, TreeRow};
