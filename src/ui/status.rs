//! Status view rendering.
//!
//! Shows the derived fields of the current snapshot: overview, memory,
//! performance, and the per-module health table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::data::{
    format_active_sessions, format_bytes, format_response_time, format_total_requests,
    format_uptime, module_rows, Severity,
};
use crate::panel::Panel;

/// Render the status view.
pub fn render(frame: &mut Frame, panel: &Panel, area: Rect) {
    let Some(ref snapshot) = panel.snapshot else {
        let msg = if panel.error.is_some() {
            "  No status received yet"
        } else {
            "  Loading status..."
        };
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(msg, Style::default().add_modifier(Modifier::DIM))),
        ])
        .block(bordered(panel, " Status "));
        frame.render_widget(placeholder, area);
        return;
    };

    let rows = Layout::vertical([Constraint::Length(7), Constraint::Min(4)]).split(area);
    let cards = Layout::horizontal([
        Constraint::Percentage(34),
        Constraint::Percentage(33),
        Constraint::Percentage(33),
    ])
    .split(rows[0]);

    // ----- OVERVIEW -----
    let severity = Severity::classify(&snapshot.status);
    let modules = module_rows(snapshot);
    let modules_ok = modules.iter().filter(|r| r.severity == Severity::Success).count();
    let overview = Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                format!("{} {}", severity.symbol(), snapshot.status),
                panel.theme.severity_style(severity).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!(" Uptime: {}", format_uptime(snapshot.uptime_seconds))),
        Line::from(format!(" Modules OK: {}/{}", modules_ok, modules.len())),
    ])
    .block(bordered(panel, " Overview "));
    frame.render_widget(overview, cards[0]);

    // ----- MEMORY -----
    let mem = &snapshot.memory_usage;
    let memory = Paragraph::new(vec![
        Line::from(format!(" RSS:        {} MB", format_bytes(mem.rss))),
        Line::from(format!(" Heap used:  {} MB", format_bytes(mem.heap_used))),
        Line::from(format!(" Heap total: {} MB", format_bytes(mem.heap_total))),
        Line::from(format!(" External:   {} MB", format_bytes(mem.external))),
    ])
    .block(bordered(panel, " Memory "));
    frame.render_widget(memory, cards[1]);

    // ----- PERFORMANCE -----
    let perf = snapshot.performance.as_ref();
    let mut perf_lines = vec![
        Line::from(format!(" Avg response: {}", format_response_time(perf))),
        Line::from(format!(" Requests:     {}", format_total_requests(perf))),
        Line::from(format!(" Sessions:     {}", format_active_sessions(perf))),
    ];
    if perf.is_none() {
        perf_lines.push(Line::from(Span::styled(
            " (not reported yet)",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    let performance = Paragraph::new(perf_lines).block(bordered(panel, " Performance "));
    frame.render_widget(performance, cards[2]);

    // ----- MODULES -----
    let header = Row::new(vec![Cell::from("Module"), Cell::from("Status"), Cell::from("Health")])
        .height(1)
        .style(panel.theme.header);

    let table_rows: Vec<Row> = modules
        .into_iter()
        .map(|row| {
            let style = panel.theme.severity_style(row.severity);
            Row::new(vec![
                Cell::from(row.name),
                Cell::from(row.status),
                Cell::from(row.severity.symbol()).style(style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),    // Module
        Constraint::Fill(1),    // Status
        Constraint::Length(8),  // Health
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(bordered(panel, " Modules "));
    frame.render_widget(table, rows[1]);
}

fn bordered<'a>(panel: &Panel, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(panel.theme.border_type)
        .border_style(Style::default().fg(panel.theme.border))
}
