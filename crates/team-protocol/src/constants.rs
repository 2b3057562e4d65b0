/// Depth past which the hierarchy tree is cut off.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Nodes shallower than this start expanded.
pub const DEFAULT_EXPANDED_DEPTH: usize = 2;

/// How long the "Copied!" confirmation stays up after a successful copy.
pub const COPY_FEEDBACK_MS: u64 = 2_000;

/// Terminal columns of indent per tree level.
pub const INDENT_PER_LEVEL: usize = 2;

/// Shown when a member has no resolvable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Shown when a member has no email on record.
pub const MISSING_EMAIL: &str = "N/A";

/// Format an amount the way the dashboard shows money: `$12.50`.
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}
