//! The team service interface.

use std::future::Future;
use std::pin::Pin;

use team_protocol::{ApiResponse, HierarchySnapshot, ReferralData};

use crate::ApiError;

/// Boxed future returned by every [`TeamApi`] call.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Trait for the remote team service, abstracting transport.
///
/// Timeouts and connection reuse belong to the implementation; callers
/// neither retry nor cancel.
pub trait TeamApi: Send + Sync {
    /// Ensure the caller has a team-membership record. Idempotent.
    fn initialize_membership(&self) -> ApiFuture<'_, ()>;

    /// Fetch the caller's referral code, link, stats and sponsor.
    fn get_my_referral_code(&self) -> ApiFuture<'_, ApiResponse<ReferralData>>;

    /// Fetch the caller's downline tree.
    fn get_downline_structure(&self) -> ApiFuture<'_, ApiResponse<HierarchySnapshot>>;
}
