//! Debug overlay rendering.
//!
//! Displays a modal overlay with connection settings, the latest outcome of
//! each API call, and the raw payload of the current snapshot.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::data::duration::format_duration;
use crate::data::CallOutcome;
use crate::panel::Panel;

/// Minimum width required for the debug overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the debug overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Centered overlay area: 95% of the width and 90% of the height, clamped.
///
/// Expects `area` to be at least the minimum overlay size.
fn overlay_rect(area: Rect) -> Rect {
    let overlay_width = percent_of(area.width, 95).clamp(MIN_OVERLAY_WIDTH, 120);
    let overlay_height = percent_of(area.height, 90).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    Rect::new(x, y, overlay_width, overlay_height)
}

// Widened so large terminals cannot overflow u16
fn percent_of(value: u16, percent: u32) -> u16 {
    (u32::from(value) * percent / 100) as u16
}

/// Render the debug view as a modal overlay.
pub fn render_overlay(frame: &mut Frame, panel: &Panel, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let overlay_area = overlay_rect(area);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(7), // Connection info
        Constraint::Length(6), // Call log
        Constraint::Min(3),    // Raw payload
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== CONNECTION =====
    let settings = &panel.settings;
    let label = Style::default().add_modifier(Modifier::BOLD);
    let info_lines = vec![
        Line::from(vec![Span::styled(" API:         ", label), Span::raw(&settings.api_url)]),
        Line::from(vec![Span::styled(" Stream:      ", label), Span::raw(&settings.ws_url)]),
        Line::from(vec![
            Span::styled(" Environment: ", label),
            Span::raw(settings.environment.label()),
        ]),
        Line::from(vec![
            Span::styled(" Source:      ", label),
            Span::raw(panel.source_description()),
        ]),
        Line::from(vec![
            Span::styled(" Interval:    ", label),
            Span::raw(format_duration(panel.poll_interval())),
        ]),
    ];

    let info = Paragraph::new(info_lines).block(
        Block::default()
            .title(" Debug ")
            .borders(Borders::ALL)
            .border_type(panel.theme.border_type)
            .border_style(Style::default().fg(panel.theme.highlight)),
    );
    frame.render_widget(info, chunks[0]);

    // ===== CALL LOG =====
    let header = Row::new(vec![
        Cell::from("Endpoint"),
        Cell::from("Time"),
        Cell::from("Result"),
        Cell::from("Detail"),
    ])
    .height(1)
    .style(panel.theme.header);

    let rows: Vec<Row> = panel
        .call_log
        .entries()
        .map(|(endpoint, entry)| {
            let (style, detail) = match &entry.outcome {
                CallOutcome::Success(snapshot) => (
                    Style::default().fg(panel.theme.success),
                    format!("status={}", snapshot.status),
                ),
                CallOutcome::Failure(msg) => (Style::default().fg(panel.theme.error), msg.clone()),
            };
            Row::new(vec![
                Cell::from(endpoint.to_string()),
                Cell::from(entry.timestamp.format("%H:%M:%S").to_string()),
                Cell::from(entry.outcome.label()).style(style),
                Cell::from(detail),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),   // Endpoint
        Constraint::Length(9), // Time
        Constraint::Length(7), // Result
        Constraint::Fill(3),   // Detail
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" API Calls ({}) ", panel.call_log.len()))
            .borders(Borders::ALL)
            .border_type(panel.theme.border_type)
            .border_style(Style::default().fg(panel.theme.border)),
    );
    frame.render_widget(table, chunks[1]);

    // ===== RAW PAYLOAD =====
    let payload = match panel.snapshot.as_deref() {
        Some(snapshot) => serde_json::to_string_pretty(snapshot)
            .unwrap_or_else(|e| format!("<unprintable payload: {}>", e)),
        None => "<no snapshot yet>".to_string(),
    };
    let raw = Paragraph::new(payload).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Payload ")
            .borders(Borders::ALL)
            .border_type(panel.theme.border_type)
            .border_style(Style::default().fg(panel.theme.border)),
    );
    frame.render_widget(raw, chunks[2]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press d or Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_rect_on_wide_terminal() {
        let area = Rect::new(0, 0, 1000, 300);
        let rect = overlay_rect(area);
        assert_eq!(rect.width, 120);
        assert_eq!(rect.height, 50);
        assert_eq!(rect.x, 440);
        assert_eq!(rect.y, 125);
    }

    #[test]
    fn test_overlay_rect_on_small_terminal() {
        let area = Rect::new(0, 0, MIN_OVERLAY_WIDTH, MIN_OVERLAY_HEIGHT);
        let rect = overlay_rect(area);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_percent_of_does_not_overflow() {
        assert_eq!(percent_of(u16::MAX, 95), 62_258);
        assert_eq!(percent_of(100, 90), 90);
    }
}
