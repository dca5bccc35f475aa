//! Main UI Application
//!
//! Draws the dashboard view model and handles keyboard input.

use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::cooldowns::CooldownCategory;
use crate::dashboard::{Dashboard, ElementId, ElementView};
use crate::regen::ResourceKind;

/// Main UI application
pub struct App {
    /// Whether the help overlay is open
    show_help: bool,
}

impl App {
    pub fn new() -> Self {
        Self { show_help: false }
    }

    /// Handle keyboard input, returns true if should quit
    pub fn handle_input(&mut self, key: KeyEvent, dashboard: &mut Dashboard) -> Result<bool> {
        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h')) {
                self.show_help = false;
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('r') => dashboard.refresh(),
            KeyCode::Char('?') | KeyCode::Char('h') => self.show_help = true,
            _ => {}
        }
        Ok(false)
    }

    pub fn render(&self, frame: &mut Frame, dashboard: &Dashboard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Energy
                Constraint::Length(1), // Energy regen
                Constraint::Length(3), // Nerve
                Constraint::Length(1), // Nerve regen
                Constraint::Length(6), // Cooldowns
                Constraint::Length(3), // Racing
                Constraint::Min(0),
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        self.render_bar(frame, dashboard, ResourceKind::Energy, chunks[0], chunks[1]);
        self.render_bar(frame, dashboard, ResourceKind::Nerve, chunks[2], chunks[3]);
        self.render_cooldowns(frame, dashboard, chunks[4]);
        self.render_racing(frame, dashboard, chunks[5]);
        self.render_status(frame, dashboard, chunks[7]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_bar(
        &self,
        frame: &mut Frame,
        dashboard: &Dashboard,
        kind: ResourceKind,
        bar_area: Rect,
        regen_area: Rect,
    ) {
        let view = dashboard.view();
        let (r, g, b) = kind.color();
        let label = view
            .text(ElementId::text(kind))
            .map(|text| format!("{} ({}%)", text, view.percent(ElementId::bar(kind))))
            .unwrap_or_else(|| "waiting for data…".to_string());

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(format!(" {} ", kind.name())),
            )
            .gauge_style(Style::default().fg(Color::Rgb(r, g, b)).bg(Color::Black))
            .percent(u16::from(view.percent(ElementId::bar(kind))))
            .label(label);
        frame.render_widget(gauge, bar_area);

        let timer = view.text(ElementId::timer(kind)).unwrap_or_default();
        let clock = view.text(ElementId::clock(kind)).unwrap_or_default();
        let line = Line::from(vec![
            Span::styled(format!(" {}", timer), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(clock.to_string(), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), regen_area);
    }

    fn render_cooldowns(&self, frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Cooldowns ")
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = CooldownCategory::ALL
            .iter()
            .map(|&category| {
                element_line(
                    category.name(),
                    dashboard.view().get(ElementId::cooldown(category)),
                )
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_racing(&self, frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Racing ")
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = element_line("Race", dashboard.view().get(ElementId::Racing));
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_status(&self, frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
        let status = dashboard.status();

        let updated = status
            .last_success
            .map(|at| format!("updated {}", at.with_timezone(&Local).format("%H:%M:%S")))
            .unwrap_or_else(|| "no data yet".to_string());

        let mut spans = vec![Span::styled(updated, Style::default().fg(Color::Gray))];

        if status.in_flight {
            spans.push(Span::styled("  ⟳ polling", Style::default().fg(Color::Cyan)));
        } else {
            let next = dashboard.next_poll_in(Instant::now());
            spans.push(Span::styled(
                format!("  next poll in {}s", next.as_secs()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        if let Some(error) = &status.last_error {
            spans.push(Span::styled(
                format!("  ⚠ {}", error),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }

        spans.push(Span::styled("  [r] refresh [?] help [q] quit", Style::default().fg(Color::DarkGray)));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" ? Help ")
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {:<10}", k), Style::default().fg(Color::White)),
                Span::styled(what, Style::default().fg(Color::Gray)),
            ])
        };

        let lines = vec![
            Line::from(Span::styled(
                "═══ CONTROLS ═══",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            key("R", "Refresh now"),
            key("? / H", "Toggle this help"),
            key("Q / Esc", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "Countdowns tick locally every second between polls.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), inner);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// `"Name: value"` line for a countdown or call-to-action element
fn element_line(name: &str, view: Option<&ElementView>) -> Line<'static> {
    let name = Span::styled(format!(" {:<8} ", name), Style::default().fg(Color::White));
    match view {
        Some(ElementView::Action { label, url }) => Line::from(vec![
            name,
            Span::styled(
                format!("[{}]", label),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", url), Style::default().fg(Color::DarkGray)),
        ]),
        Some(ElementView::Text(text)) => Line::from(vec![
            name,
            Span::styled(text.clone(), Style::default().fg(Color::Yellow)),
        ]),
        Some(ElementView::Percent(pct)) => Line::from(vec![name, Span::raw(format!("{}%", pct))]),
        None => Line::from(vec![name, Span::styled("…", Style::default().fg(Color::DarkGray))]),
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
