//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Severity;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for success-level statuses.
    pub success: Color,
    /// Color for warning-level statuses.
    pub warning: Color,
    /// Color for error-level statuses and the error banner.
    pub error: Color,
    /// Color for statuses that fit no bucket.
    pub muted: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a severity bucket
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Success => Style::default().fg(self.success),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Error => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
            Severity::Default => Style::default().fg(self.muted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_styles_differ() {
        let theme = Theme::dark();
        assert_eq!(theme.severity_style(Severity::Success).fg, Some(Color::Green));
        assert_eq!(theme.severity_style(Severity::Error).fg, Some(Color::Red));
        assert!(theme
            .severity_style(Severity::Error)
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(theme.severity_style(Severity::Default).fg, Some(Color::Gray));
    }
}
