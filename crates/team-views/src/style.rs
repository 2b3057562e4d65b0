//! Shared line-building helpers for both views.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use team_protocol::accent_for_level;

/// A rendered view: its lines plus the line that should stay in view
/// (the selected tree row, if any).
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub lines: Vec<Line<'static>>,
    pub focus_line: Option<usize>,
}

impl RenderedPage {
    pub fn new(lines: Vec<Line<'static>>) -> Self {
        Self { lines, focus_line: None }
    }

    pub fn to_plain_text(&self) -> String {
        plain_text(&self.lines)
    }
}

/// Flatten styled lines to text, one line per row.
pub fn plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn level_color(level: u32) -> Color {
    let (r, g, b) = accent_for_level(level).rgb();
    Color::Rgb(r, g, b)
}

/// Badge style for a level: accent background with readable text.
pub fn level_badge(level: u32) -> Style {
    let (r, g, b) = accent_for_level(level).rgb();
    let fg = if u32::from(r) + u32::from(g) + u32::from(b) > 3 * 128 {
        Color::Black
    } else {
        Color::White
    };
    Style::default().bg(Color::Rgb(r, g, b)).fg(fg).add_modifier(Modifier::BOLD)
}

pub(crate) fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

pub(crate) fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

pub(crate) fn bullet(text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("  • ", Style::default().fg(Color::DarkGray)),
        Span::styled(text.to_string(), Style::default().fg(Color::Gray)),
    ])
}

/// `  Label: value` stat line.
pub(crate) fn stat(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label}: "), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ])
}

pub(crate) fn loading(text: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(format!("  ⟳ {text}"), Style::default().fg(Color::Yellow))),
    ]
}

pub(crate) fn error(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  ! {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ]
}
