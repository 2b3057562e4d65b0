//! Interactive terminal console.
//!
//! Two tabs, one per view. Switching tabs is the activation signal: the
//! newly selected view loads, the other goes inactive. Launch with
//! `team-dashboard` (or `team-dashboard console`).

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use team_api::TeamApi;
use team_views::{Clipboard, RenderedPage, TreeOptions};

use crate::dashboard::{Dashboard, KeyOutcome, Tab};

struct Console {
    dashboard: Dashboard,
    /// Shown in the status bar: service URL or "demo".
    source: String,
    /// First visible body line.
    scroll: u16,
    /// Cleared by PgUp/PgDn so a manual scroll is not pulled back to the
    /// selected row; any other key sets it again.
    follow_focus: bool,
    last_tab: Tab,
}

impl Console {
    fn new(dashboard: Dashboard, source: String) -> Self {
        let last_tab = dashboard.tab();
        Self { dashboard, source, scroll: 0, follow_focus: true, last_tab }
    }

    fn render(&mut self, frame: &mut Frame, page: &RenderedPage) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(3), // Tabs
                Constraint::Min(6),    // View
                Constraint::Length(3), // Key help
            ])
            .split(frame.area());

        self.render_status_bar(frame, outer[0]);
        self.render_tabs(frame, outer[1]);
        self.render_body(frame, outer[2], page);
        self.render_help(frame, outer[3]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Team Dashboard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let status_line = Line::from(vec![
            Span::styled("  Service: ", Style::default().fg(Color::Gray)),
            Span::styled(self.source.clone(), Style::default().fg(Color::White)),
            Span::styled("  |  View: ", Style::default().fg(Color::Gray)),
            Span::styled(self.dashboard.tab().title(), Style::default().fg(Color::Cyan)),
            Span::styled("  |  ", Style::default().fg(Color::Gray)),
            Span::styled(
                chrono::Local::now().format("%H:%M:%S").to_string(),
                Style::default().fg(Color::Magenta),
            ),
        ]);

        frame.render_widget(Paragraph::new(status_line).block(block), area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL))
            .select(self.dashboard.tab().index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect, page: &RenderedPage) {
        let block = Block::default()
            .title(format!(" {} ", self.dashboard.tab().title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        self.update_scroll(page, area.height.saturating_sub(2));

        let paragraph = Paragraph::new(page.lines.clone())
            .block(block)
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn update_scroll(&mut self, page: &RenderedPage, visible_height: u16) {
        let focus = if self.follow_focus { page.focus_line } else { None };
        self.scroll = keep_in_view(self.scroll, focus, visible_height, page.lines.len());
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let keys = match self.dashboard.tab() {
            Tab::ReferralCode => "c copy code  |  l copy link",
            Tab::TeamHierarchy => "Up/Down select  |  Enter/Space expand or collapse",
        };
        let line = Line::from(vec![
            Span::styled(format!("  {keys}"), Style::default().fg(Color::White)),
            Span::styled(
                "  |  Tab switch view  |  PgUp/PgDn scroll  |  q quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    async fn handle_key(&mut self, key: event::KeyEvent) -> KeyOutcome {
        match key.code {
            event::KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(5);
                self.follow_focus = false;
                KeyOutcome::Continue
            }
            event::KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(5);
                self.follow_focus = false;
                KeyOutcome::Continue
            }
            _ => {
                self.follow_focus = true;
                let outcome = self.dashboard.handle_key(key.code, key.modifiers).await;
                if self.dashboard.tab() != self.last_tab {
                    self.last_tab = self.dashboard.tab();
                    self.scroll = 0;
                }
                outcome
            }
        }
    }
}

/// Scroll offset that keeps `focus` visible and does not run past the end.
fn keep_in_view(scroll: u16, focus: Option<usize>, height: u16, total: usize) -> u16 {
    let height = usize::from(height.max(1));
    let mut scroll = usize::from(scroll);
    if let Some(focus) = focus {
        if focus < scroll {
            scroll = focus;
        } else if focus >= scroll + height {
            scroll = focus + 1 - height;
        }
    }
    let max_scroll = total.saturating_sub(height);
    u16::try_from(scroll.min(max_scroll)).unwrap_or(u16::MAX)
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the console event loop until the user quits.
pub async fn run_console(
    api: Arc<dyn TeamApi>,
    clipboard: Arc<dyn Clipboard>,
    options: TreeOptions,
    source: String,
) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!(
            "The console requires a terminal (TTY). Use `team-dashboard print <view>` instead."
        ));
    }

    // Restore the terminal on panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut console = Console::new(Dashboard::new(api, clipboard, options), source);
    console.dashboard.start().await;
    tracing::info!(source = %console.source, "Console started");

    let tick_rate = Duration::from_millis(100);

    let result: Result<(), anyhow::Error> = loop {
        let page = console.dashboard.render().await;
        if let Err(e) = terminal.draw(|frame| console.render(frame, &page)) {
            break Err(e.into());
        }

        match event::poll(tick_rate) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => break Err(e.into()),
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if console.handle_key(key).await == KeyOutcome::Quit {
                    break Ok(());
                }
            }
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
    };

    restore_terminal(&mut terminal)?;
    tracing::info!("Console stopped");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use team_api::MockTeamApi;
    use team_views::RecordingClipboard;

    fn console() -> Console {
        let dashboard = Dashboard::new(
            Arc::new(MockTeamApi::new()),
            Arc::new(RecordingClipboard::new()),
            TreeOptions::default(),
        );
        Console::new(dashboard, "test".to_string())
    }

    fn page(total: usize, focus: usize) -> RenderedPage {
        RenderedPage {
            lines: (0..total).map(|i| Line::from(i.to_string())).collect(),
            focus_line: Some(focus),
        }
    }

    #[tokio::test]
    async fn page_down_is_not_pulled_back_to_the_selection() {
        let mut console = console();
        let page = page(40, 2);
        console.update_scroll(&page, 10);
        assert_eq!(console.scroll, 0);

        console.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE)).await;
        console.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE)).await;
        console.update_scroll(&page, 10);
        assert_eq!(console.scroll, 10);

        // Moving the selection brings it back into view.
        console.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)).await;
        console.update_scroll(&page, 10);
        assert_eq!(console.scroll, 2);
    }

    #[test]
    fn focus_below_viewport_scrolls_down() {
        assert_eq!(keep_in_view(0, Some(12), 10, 40), 3);
    }

    #[test]
    fn focus_above_viewport_scrolls_up() {
        assert_eq!(keep_in_view(8, Some(2), 10, 40), 2);
    }

    #[test]
    fn scroll_never_passes_the_end() {
        assert_eq!(keep_in_view(100, None, 10, 25), 15);
        assert_eq!(keep_in_view(3, None, 10, 5), 0);
    }
}
