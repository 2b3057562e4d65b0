//! One-shot rendering for scripts: activate a view, wait for it to settle,
//! return its text.

use std::sync::Arc;

use team_api::TeamApi;
use team_views::{RecordingClipboard, ReferralCodeView, TeamHierarchyView, TreeOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewKind {
    Referral,
    Hierarchy,
}

pub async fn render_once(api: Arc<dyn TeamApi>, view: ViewKind, options: TreeOptions) -> String {
    match view {
        ViewKind::Referral => {
            let mut view = ReferralCodeView::new(api, Arc::new(RecordingClipboard::new()));
            view.set_active(true).await;
            view.settled().await;
            view.render().await.to_plain_text()
        }
        ViewKind::Hierarchy => {
            let mut view = TeamHierarchyView::new(api, options);
            view.set_active(true).await;
            view.settled().await;
            view.render().await.to_plain_text()
        }
    }
}
