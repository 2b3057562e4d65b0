//! Tab state and key handling, independent of the terminal.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};

use team_api::TeamApi;
use team_views::{Clipboard, ReferralCodeView, RenderedPage, TeamHierarchyView, TreeOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    ReferralCode,
    TeamHierarchy,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::ReferralCode, Tab::TeamHierarchy];

    pub fn title(&self) -> &'static str {
        match self {
            Self::ReferralCode => "Referral Code",
            Self::TeamHierarchy => "Team Hierarchy",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::ReferralCode => 0,
            Self::TeamHierarchy => 1,
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Self::ReferralCode => Self::TeamHierarchy,
            Self::TeamHierarchy => Self::ReferralCode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Both views plus which one is showing. Only the selected view is active.
pub struct Dashboard {
    tab: Tab,
    started: bool,
    referral: ReferralCodeView,
    hierarchy: TeamHierarchyView,
}

impl Dashboard {
    pub fn new(api: Arc<dyn TeamApi>, clipboard: Arc<dyn Clipboard>, options: TreeOptions) -> Self {
        Self {
            tab: Tab::ReferralCode,
            started: false,
            referral: ReferralCodeView::new(Arc::clone(&api), clipboard),
            hierarchy: TeamHierarchyView::new(api, options),
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn referral(&self) -> &ReferralCodeView {
        &self.referral
    }

    pub fn hierarchy(&self) -> &TeamHierarchyView {
        &self.hierarchy
    }

    /// Activate the initially selected tab.
    pub async fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.set_tab_active(self.tab, true).await;
        }
    }

    /// Switch tabs: the old view goes inactive, the new one active.
    pub async fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab && self.started {
            return;
        }
        if self.started {
            self.set_tab_active(self.tab, false).await;
        }
        tracing::debug!(tab = tab.title(), "Tab selected");
        self.tab = tab;
        self.started = true;
        self.set_tab_active(tab, true).await;
    }

    /// Wait for the selected view's in-flight loads.
    pub async fn settled(&mut self) {
        match self.tab {
            Tab::ReferralCode => self.referral.settled().await,
            Tab::TeamHierarchy => self.hierarchy.settled().await,
        }
    }

    async fn set_tab_active(&mut self, tab: Tab, active: bool) {
        match tab {
            Tab::ReferralCode => self.referral.set_active(active).await,
            Tab::TeamHierarchy => self.hierarchy.set_active(active).await,
        };
    }

    /// Handle one key press.
    pub async fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return KeyOutcome::Quit,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return KeyOutcome::Quit,
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) | (KeyCode::Left, _) | (KeyCode::Right, _) => {
                self.select_tab(self.tab.next()).await;
            }
            (KeyCode::Char('1'), _) => self.select_tab(Tab::ReferralCode).await,
            (KeyCode::Char('2'), _) => self.select_tab(Tab::TeamHierarchy).await,
            _ => match self.tab {
                Tab::ReferralCode => self.handle_referral_key(code).await,
                Tab::TeamHierarchy => self.handle_hierarchy_key(code).await,
            },
        }
        KeyOutcome::Continue
    }

    async fn handle_referral_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('c') => {
                self.referral.copy_code().await;
            }
            KeyCode::Char('l') => {
                self.referral.copy_link().await;
            }
            _ => {}
        }
    }

    async fn handle_hierarchy_key(&mut self, code: KeyCode) {
        // Keys act on the rows the user is looking at.
        self.hierarchy.refresh().await;
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.hierarchy.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.hierarchy.move_selection(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.hierarchy.toggle_selected();
            }
            _ => {}
        }
    }

    /// Render the selected view.
    pub async fn render(&mut self) -> RenderedPage {
        match self.tab {
            Tab::ReferralCode => self.referral.render().await,
            Tab::TeamHierarchy => self.hierarchy.render().await,
        }
    }
}
