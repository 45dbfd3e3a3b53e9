//! Common UI components shared across views.
//!
//! This module contains the header bar, error banner, status bar, and help
//! overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::data::Severity;
use crate::panel::Panel;

/// Render the header bar with the overall backend status.
///
/// Displays: status indicator, status label, environment, debug marker.
pub fn render_header(frame: &mut Frame, panel: &Panel, area: Rect) {
    let env = panel.settings.environment.label();

    let Some(ref snapshot) = panel.snapshot else {
        let line = Line::from(vec![
            Span::styled(" STATUSWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("│ {} │ Loading...", env)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let severity = Severity::classify(&snapshot.status);
    let status_style = panel.theme.severity_style(severity);

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("STATUSWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(snapshot.status.to_uppercase(), status_style.add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::raw(env),
    ];

    if panel.debug_mode {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("DEBUG", Style::default().fg(panel.theme.highlight)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the error banner for the last failed poll.
///
/// Returns without drawing when there is no error.
pub fn render_error_banner(frame: &mut Frame, panel: &Panel, area: Rect) {
    let Some(ref err) = panel.error else {
        return;
    };

    let stale = if panel.snapshot.is_some() {
        " (showing last good data)"
    } else {
        ""
    };

    let paragraph = Paragraph::new(format!(" ✗ {}{} ", err, stale))
        .style(Style::default().fg(panel.theme.error).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, poll interval, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, panel: &Panel, area: Rect) {
    if let Some(msg) = panel.get_status_message() {
        let paragraph = Paragraph::new(format!(" {} ", msg))
            .style(Style::default().fg(panel.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let updated = if panel.loading {
        "Refreshing...".to_string()
    } else if let Some(at) = panel.last_updated {
        format!("Updated {:.1}s ago", at.elapsed().as_secs_f64())
    } else {
        "Waiting for data".to_string()
    };

    let status = format!(
        " {} | {} | every {} | r:refresh d:debug e:export ?:help q:quit",
        panel.source_description(),
        updated,
        crate::data::duration::format_duration(panel.poll_interval()),
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, panel: &Panel, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", panel.theme.header)]),
        Line::from(""),
        Line::from("  r         Refresh now"),
        Line::from("  d         Toggle debug view"),
        Line::from("  e         Export to JSON"),
        Line::from("  Esc       Close overlay"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(panel.theme.border_type)
        .border_style(Style::default().fg(panel.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 11u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
