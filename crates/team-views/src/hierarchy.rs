//! Downline hierarchy viewer: team stats, level legend and the member tree.

use std::sync::Arc;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use team_api::{ApiFuture, TeamApi};
use team_protocol::{format_usd, ApiResponse, HierarchySnapshot, LevelTier};

use crate::loader::{ActivationLoader, LoadMessages, LoadSteps, ViewState};
use crate::style::{self, level_badge, level_color, RenderedPage};
use crate::tree::{render_tree, ExpansionState, Toggle, TreeOptions, TreeRow};

pub const HIERARCHY_MESSAGES: LoadMessages = LoadMessages {
    view: "team-hierarchy",
    generic_failure: "Failed to load team hierarchy",
    rejected_fallback: "Could not load team hierarchy",
};

const LOADING_TEXT: &str = "Loading your team hierarchy...";
const NO_MEMBERS: &str = "No team members yet. Share your referral code to build your network!";
const GUIDE: [(&str, &str); 5] = [
    ("Levels", "Your position based on direct referrals and team structure"),
    ("Direct Count", "People you directly referred"),
    ("Total Downline", "Everyone below you in the network"),
    ("Earnings", "Total commissions from your network"),
    ("Level Qualification", "Reach 10 direct referrals to unlock Level 1 benefits"),
];

/// Initialize membership, then fetch the downline structure.
pub struct DownlineSteps {
    api: Arc<dyn TeamApi>,
}

impl DownlineSteps {
    pub fn new(api: Arc<dyn TeamApi>) -> Self {
        Self { api }
    }
}

impl LoadSteps for DownlineSteps {
    type Data = HierarchySnapshot;

    fn messages(&self) -> LoadMessages {
        HIERARCHY_MESSAGES
    }

    fn initialize(&self) -> ApiFuture<'_, ()> {
        self.api.initialize_membership()
    }

    fn fetch(&self) -> ApiFuture<'_, ApiResponse<HierarchySnapshot>> {
        self.api.get_downline_structure()
    }
}

/// The hierarchy view. Owns its expansion state and a row cursor.
pub struct TeamHierarchyView {
    loader: ActivationLoader<DownlineSteps>,
    options: TreeOptions,
    expansion: ExpansionState,
    rows: Vec<TreeRow>,
    selected: usize,
}

impl TeamHierarchyView {
    pub fn new(api: Arc<dyn TeamApi>, options: TreeOptions) -> Self {
        Self {
            loader: ActivationLoader::new(DownlineSteps::new(api)),
            options,
            expansion: ExpansionState::new(),
            rows: Vec::new(),
            selected: 0,
        }
    }

    pub async fn set_active(&mut self, active: bool) -> bool {
        self.loader.set_active(active).await
    }

    pub async fn settled(&mut self) {
        self.loader.settled().await
    }

    pub async fn state(&self) -> ViewState<HierarchySnapshot> {
        self.loader.state().await
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Rows as of the last [`refresh`](Self::refresh) or render.
    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Re-derive the visible rows from the current state.
    pub async fn refresh(&mut self) -> ViewState<HierarchySnapshot> {
        let state = self.loader.state().await;
        self.rebuild_rows(&state);
        state
    }

    fn rebuild_rows(&mut self, state: &ViewState<HierarchySnapshot>) {
        self.rows = match state {
            ViewState::Loaded(HierarchySnapshot { member: Some(root), .. }) => {
                render_tree(root, &mut self.expansion, &self.options)
            }
            _ => Vec::new(),
        };
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    /// Toggle the selected row. Rows without children have no toggle.
    pub fn toggle_selected(&mut self) -> bool {
        let Some(row) = self.rows.get(self.selected) else {
            return false;
        };
        if !row.has_children() {
            return false;
        }
        let key = row.key.clone();
        let toggled = self.expansion.toggle(&key).is_some();
        if toggled {
            tracing::debug!(node = key.as_str(), "Toggled hierarchy node");
        }
        toggled
    }

    pub async fn render(&mut self) -> RenderedPage {
        let state = self.refresh().await;
        render_hierarchy(&state, &self.rows, Some(self.selected))
    }
}

/// Lines for a hierarchy state, given the already-rendered tree rows.
pub fn render_hierarchy(
    state: &ViewState<HierarchySnapshot>,
    rows: &[TreeRow],
    selected: Option<usize>,
) -> RenderedPage {
    match state {
        ViewState::Loading => RenderedPage::new(style::loading(LOADING_TEXT)),
        ViewState::Error(message) => RenderedPage::new(style::error(message)),
        ViewState::Empty => RenderedPage::default(),
        ViewState::Loaded(snapshot) => loaded_page(snapshot, rows, selected),
    }
}

fn loaded_page(snapshot: &HierarchySnapshot, rows: &[TreeRow], selected: Option<usize>) -> RenderedPage {
    let root = snapshot.member.as_ref();
    let mut lines = vec![
        style::stat("Total Team Members", snapshot.total_members().to_string()),
        style::stat("Direct Referrals", root.map_or(0, |m| m.direct_count()).to_string()),
        style::stat("Your Level", format!("L{}", root.map_or(0, |m| m.level()))),
        style::stat("Total Earnings", format_usd(root.map_or(0.0, |m| m.total_earnings()))),
        Line::from(""),
        style::heading("Level Legend"),
    ];
    lines.extend(LevelTier::ALL.iter().map(|tier| {
        Line::from(vec![
            Span::raw("  "),
            Span::styled("  ", Style::default().bg(level_color(tier.first_level()))),
            Span::styled(format!(" {}", tier.legend()), Style::default().fg(Color::Gray)),
        ])
    }));

    lines.push(Line::from(""));
    lines.push(style::heading("Your Team Network"));

    let mut focus_line = None;
    if root.is_none() {
        lines.push(style::muted(format!("  {NO_MEMBERS}")));
    } else {
        for (index, row) in rows.iter().enumerate() {
            let is_selected = selected == Some(index);
            if is_selected {
                focus_line = Some(lines.len());
            }
            lines.push(tree_row_line(row, is_selected));
        }
    }

    lines.push(Line::from(""));
    lines.push(style::heading("Understanding Your Hierarchy"));
    lines.extend(GUIDE.iter().map(|(term, meaning)| {
        Line::from(vec![
            Span::styled("  • ", Style::default().fg(Color::DarkGray)),
            Span::styled(term.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" - {meaning}"), Style::default().fg(Color::Gray)),
        ])
    }));

    RenderedPage { lines, focus_line }
}

fn tree_row_line(row: &TreeRow, selected: bool) -> Line<'static> {
    let cursor = if selected { "› " } else { "  " };
    let toggle = match row.toggle {
        Toggle::Expanded => "▾ ",
        Toggle::Collapsed => "▸ ",
        Toggle::Leaf => "  ",
    };
    let name_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let detail = Style::default().fg(Color::Gray);

    let mut spans = vec![
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
        Span::raw(" ".repeat(row.indent)),
        Span::styled(toggle, Style::default().fg(Color::DarkGray)),
        Span::styled("│", Style::default().fg(level_color(row.level))),
        Span::styled(row.name.clone(), name_style),
        Span::raw(" "),
        Span::styled(format!("L{}", row.level), level_badge(row.level)),
        Span::styled(format!("  {}", row.email), detail),
        Span::styled(format!("  · {}", row.direct_label()), detail),
        Span::styled(format!("  · {}", row.total_label()), detail),
    ];
    if let Some(earnings) = &row.earnings {
        spans.push(Span::styled(format!("  · {earnings}"), Style::default().fg(Color::LightGreen)));
    }
    Line::from(spans)
}
