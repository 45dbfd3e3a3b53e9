use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};

use crate::panel::Panel;

/// Where the `e` key writes its export.
pub const EXPORT_FILE: &str = "status_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(panel: &mut Panel, key: KeyEvent) {
    // If help is shown, any key closes it
    if panel.show_help {
        panel.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => panel.quit(),

        // Poll now, outside the schedule
        KeyCode::Char('r') => {
            if !panel.refresh() {
                panel.set_status_message("Polling is not active".to_string());
            }
        }

        // Debug view
        KeyCode::Char('d') => panel.toggle_debug(),

        // Help
        KeyCode::Char('?') => panel.toggle_help(),

        // Close debug view
        KeyCode::Esc => panel.debug_mode = false,

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match panel.export_state(&export_path) {
                Ok(()) => {
                    panel.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    panel.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;

    use crate::config::Settings;
    use crate::source::{FetchError, StatusFetcher, StatusSnapshot};

    #[derive(Debug)]
    struct NeverFetcher;

    #[async_trait]
    impl StatusFetcher for NeverFetcher {
        async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
            Err(FetchError::Connection("unused".into()))
        }

        fn endpoint(&self) -> &str {
            "GET /api/status"
        }

        fn description(&self) -> &str {
            "never"
        }
    }

    fn panel() -> Panel {
        Panel::new(Arc::new(NeverFetcher), Settings::default())
    }

    fn press(panel: &mut Panel, code: KeyCode) {
        handle_key_event(panel, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Char('?'));
        assert!(panel.show_help);

        press(&mut panel, KeyCode::Char('q'));
        assert!(!panel.show_help);
        assert!(panel.running);

        press(&mut panel, KeyCode::Char('q'));
        assert!(!panel.running);
    }

    #[test]
    fn test_debug_toggle_and_escape() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Char('d'));
        assert!(panel.debug_mode);
        press(&mut panel, KeyCode::Esc);
        assert!(!panel.debug_mode);
    }

    #[test]
    fn test_refresh_when_idle_sets_message() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Char('r'));
        assert_eq!(panel.get_status_message(), Some("Polling is not active"));
    }

    #[test]
    fn test_export_without_data_reports_failure() {
        let mut panel = panel();
        press(&mut panel, KeyCode::Char('e'));
        let msg = panel.get_status_message().unwrap();
        assert!(msg.starts_with("Export failed"), "{}", msg);
    }
}
