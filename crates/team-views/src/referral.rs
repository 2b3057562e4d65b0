//! Referral-code panel: code, link, personal stats and sponsor.

use std::sync::Arc;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use team_api::{ApiFuture, TeamApi};
use team_protocol::{format_usd, ApiResponse, ReferralData};

use crate::clipboard::{Clipboard, CopyFeedback};
use crate::loader::{ActivationLoader, LoadMessages, LoadSteps, ViewState};
use crate::style::{self, RenderedPage};

pub const REFERRAL_MESSAGES: LoadMessages = LoadMessages {
    view: "referral-code",
    generic_failure: "Failed to load referral code",
    rejected_fallback: "Could not load referral code",
};

const LOADING_TEXT: &str = "Loading your referral code...";
const JOIN_TIP: &str =
    "Tip: You need to join a team first to get your referral code. Ask your team sponsor or administrator.";
const SHARE_STEPS: [&str; 4] = [
    "Share your code or link with others",
    "They'll join your team using this code",
    "You earn bonuses from their activity",
    "Your team grows with every referral!",
];

/// Initialize membership, then fetch the referral code.
pub struct ReferralCodeSteps {
    api: Arc<dyn TeamApi>,
}

impl ReferralCodeSteps {
    pub fn new(api: Arc<dyn TeamApi>) -> Self {
        Self { api }
    }
}

impl LoadSteps for ReferralCodeSteps {
    type Data = ReferralData;

    fn messages(&self) -> LoadMessages {
        REFERRAL_MESSAGES
    }

    fn initialize(&self) -> ApiFuture<'_, ()> {
        self.api.initialize_membership()
    }

    fn fetch(&self) -> ApiFuture<'_, ApiResponse<ReferralData>> {
        self.api.get_my_referral_code()
    }
}

/// The referral-code view. One copy confirmation is shared by the code and
/// link buttons.
pub struct ReferralCodeView {
    loader: ActivationLoader<ReferralCodeSteps>,
    clipboard: Arc<dyn Clipboard>,
    copy: CopyFeedback,
}

impl ReferralCodeView {
    pub fn new(api: Arc<dyn TeamApi>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            loader: ActivationLoader::new(ReferralCodeSteps::new(api)),
            clipboard,
            copy: CopyFeedback::new(),
        }
    }

    pub async fn set_active(&mut self, active: bool) -> bool {
        self.loader.set_active(active).await
    }

    pub async fn settled(&mut self) {
        self.loader.settled().await
    }

    pub async fn state(&self) -> ViewState<ReferralData> {
        self.loader.state().await
    }

    pub fn copy_feedback(&self) -> &CopyFeedback {
        &self.copy
    }

    /// Copy the referral code. No-op until data is loaded.
    pub async fn copy_code(&mut self) -> bool {
        match self.loader.state().await {
            ViewState::Loaded(data) => self.copy.copy(self.clipboard.as_ref(), &data.referral_code),
            _ => false,
        }
    }

    /// Copy the referral link. No-op until data is loaded.
    pub async fn copy_link(&mut self) -> bool {
        match self.loader.state().await {
            ViewState::Loaded(data) => self.copy.copy(self.clipboard.as_ref(), &data.referral_link),
            _ => false,
        }
    }

    pub async fn render(&self) -> RenderedPage {
        render_referral(&self.state().await, &self.copy)
    }
}

/// Lines for a referral-code state. `Empty` renders nothing.
pub fn render_referral(state: &ViewState<ReferralData>, copy: &CopyFeedback) -> RenderedPage {
    let lines = match state {
        ViewState::Loading => style::loading(LOADING_TEXT),
        ViewState::Error(message) => {
            let mut lines = style::error(message);
            lines.push(Line::from(""));
            lines.push(style::muted(format!("  {JOIN_TIP}")));
            lines
        }
        ViewState::Empty => Vec::new(),
        ViewState::Loaded(data) => loaded_lines(data, copy),
    };
    RenderedPage::new(lines)
}

fn copy_button(label: &'static str) -> Span<'static> {
    let style = if label == crate::clipboard::COPIED_LABEL {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green)
    };
    Span::styled(format!(" {label} "), style)
}

fn loaded_lines(data: &ReferralData, copy: &CopyFeedback) -> Vec<Line<'static>> {
    let stats = &data.stats;
    let mut lines = vec![
        style::heading("Your Referral Code"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                data.referral_code.clone(),
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            copy_button(copy.label("Copy Code")),
            Span::styled("  [c]", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        style::heading("Referral Link"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(data.referral_link.clone(), Style::default().fg(Color::White)),
            Span::raw("   "),
            copy_button(copy.label("Copy Link")),
            Span::styled("  [l]", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        style::stat("Direct Referrals", stats.direct_count.unwrap_or(0).to_string()),
        style::stat("Total Downline", stats.total_downline.unwrap_or(0).to_string()),
        style::stat("Your Level", format!("Level {}", stats.level.unwrap_or(0))),
        style::stat("Total Earnings", format_usd(stats.total_earnings.unwrap_or(0.0))),
    ];

    if let Some(sponsor) = &data.sponsor {
        lines.push(Line::from(""));
        lines.push(style::heading("Your Sponsor"));
        lines.push(Line::from(Span::styled(
            format!("  {}", sponsor.name.as_deref().unwrap_or("")),
            Style::default().fg(Color::White),
        )));
    }

    lines.push(Line::from(""));
    lines.push(style::heading("How to Share:"));
    lines.extend(SHARE_STEPS.iter().map(|step| style::bullet(step)));
    lines
}
