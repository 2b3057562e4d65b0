//! Dashboard tests: tab activation, key bindings and copy buttons, driven
//! against the in-memory team service.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};

use team_api::{MockTeamApi, TeamApi};
use team_console::{Dashboard, KeyOutcome, Tab};
use team_views::{plain_text, RecordingClipboard, TreeOptions, ViewState};

fn dashboard(api: &Arc<MockTeamApi>, clipboard: &Arc<RecordingClipboard>) -> Dashboard {
    let api: Arc<dyn TeamApi> = api.clone();
    Dashboard::new(api, clipboard.clone(), TreeOptions::default())
}

async fn press(dashboard: &mut Dashboard, code: KeyCode) -> KeyOutcome {
    dashboard.handle_key(code, KeyModifiers::NONE).await
}

async fn page_text(dashboard: &mut Dashboard) -> String {
    plain_text(&dashboard.render().await.lines)
}

#[tokio::test(start_paused = true)]
async fn start_activates_only_the_referral_tab() {
    let api = Arc::new(MockTeamApi::demo());
    let clipboard = Arc::new(RecordingClipboard::new());
    let mut dashboard = dashboard(&api, &clipboard);

    dashboard.start().await;
    dashboard.start().await;
    dashboard.settled().await;

    assert_eq!(dashboard.tab(), Tab::ReferralCode);
    assert_eq!(api.initialize_calls(), 1);
    assert_eq!(api.referral_calls(), 1);
    assert_eq!(api.downline_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn every_tab_switch_reloads_the_selected_view() {
    let api = Arc::new(MockTeamApi::demo());
    let clipboard = Arc::new(RecordingClipboard::new());
    let mut dashboard = dashboard(&api, &clipboard);
    dashboard.start().await;
    dashboard.settled().await;

    press(&mut dashboard, KeyCode::Tab).await;
    dashboard.settled().await;
    assert_eq!(dashboard.tab(), Tab::TeamHierarchy);
    assert_eq!(api.downline_calls(), 1);

    press(&mut dashboard, KeyCode::Char('1')).await;
    dashboard.settled().await;
    assert_eq!(dashboard.tab(), Tab::ReferralCode);
    assert_eq!(api.referral_calls(), 2);

    // Selecting the tab that is already showing is not a new activation.
    press(&mut dashboard, KeyCode::Char('1')).await;
    dashboard.settled().await;
    assert_eq!(api.referral_calls(), 2);
    assert_eq!(api.initialize_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn referral_keys_copy_code_and_link() {
    let api = Arc::new(MockTeamApi::demo());
    let clipboard = Arc::new(RecordingClipboard::new());
    let mut dashboard = dashboard(&api, &clipboard);
    dashboard.start().await;

    // Nothing to copy while loading.
    press(&mut dashboard, KeyCode::Char('c')).await;
    assert!(clipboard.writes().is_empty());

    dashboard.settled().await;
    press(&mut dashboard, KeyCode::Char('c')).await;
    press(&mut dashboard, KeyCode::Char('l')).await;
    assert_eq!(
        clipboard.writes(),
        vec!["TEAM-7Q2K9".to_string(), "https://dashboard.example.com/join?ref=TEAM-7Q2K9".to_string()]
    );
    assert!(page_text(&mut dashboard).await.contains("Copied!"));

    tokio::time::sleep(Duration::from_millis(2001)).await;
    let text = page_text(&mut dashboard).await;
    assert!(!text.contains("Copied!"));
    assert!(text.contains("Copy Code"));
}

#[tokio::test(start_paused = true)]
async fn hierarchy_keys_move_and_toggle() {
    let api = Arc::new(MockTeamApi::demo());
    let clipboard = Arc::new(RecordingClipboard::new());
    let mut dashboard = dashboard(&api, &clipboard);
    dashboard.start().await;
    dashboard.select_tab(Tab::TeamHierarchy).await;
    dashboard.settled().await;

    let text = page_text(&mut dashboard).await;
    assert!(text.contains("Edsger Dijkstra"));
    assert!(!text.contains("Barbara Liskov"));

    // Rows: You, Ada, Alan, Edsger, ...
    for _ in 0..3 {
        press(&mut dashboard, KeyCode::Down).await;
    }
    assert_eq!(dashboard.hierarchy().selected(), 3);
    press(&mut dashboard, KeyCode::Enter).await;
    assert!(page_text(&mut dashboard).await.contains("Barbara Liskov"));

    press(&mut dashboard, KeyCode::Char(' ')).await;
    assert!(!page_text(&mut dashboard).await.contains("Barbara Liskov"));

    press(&mut dashboard, KeyCode::Char('k')).await;
    assert_eq!(dashboard.hierarchy().selected(), 2);
}

#[tokio::test(start_paused = true)]
async fn copy_keys_do_nothing_on_the_hierarchy_tab() {
    let api = Arc::new(MockTeamApi::demo());
    let clipboard = Arc::new(RecordingClipboard::new());
    let mut dashboard = dashboard(&api, &clipboard);
    dashboard.select_tab(Tab::TeamHierarchy).await;
    dashboard.settled().await;

    press(&mut dashboard, KeyCode::Char('c')).await;
    assert!(clipboard.writes().is_empty());
    assert_eq!(api.referral_calls(), 0);
}

#[tokio::test]
async fn quit_keys() {
    let api = Arc::new(MockTeamApi::new());
    let clipboard = Arc::new(RecordingClipboard::new());
    let mut dashboard = dashboard(&api, &clipboard);

    assert_eq!(press(&mut dashboard, KeyCode::Char('q')).await, KeyOutcome::Quit);
    assert_eq!(press(&mut dashboard, KeyCode::Esc).await, KeyOutcome::Quit);
    assert_eq!(
        dashboard.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL).await,
        KeyOutcome::Quit
    );
    assert_eq!(press(&mut dashboard, KeyCode::Char('x')).await, KeyOutcome::Continue);
}

#[tokio::test]
async fn empty_service_renders_nothing() {
    let api = Arc::new(MockTeamApi::new());
    let clipboard = Arc::new(RecordingClipboard::new());
    let mut dashboard = dashboard(&api, &clipboard);
    dashboard.start().await;
    dashboard.settled().await;

    assert!(matches!(dashboard.referral().state().await, ViewState::Empty));
    assert!(dashboard.render().await.lines.is_empty());
}
