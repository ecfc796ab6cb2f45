//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InputMode, PopupState};

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Fetch a fresh record snapshot.
    Reload,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.input_mode {
        InputMode::Normal if state.any_popup_open() => handle_popup(state, key),
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Filter => handle_filter_mode(state, key),
    }
}

fn handle_popup(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.popup = PopupState::None;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let PopupState::Detail { scroll } = &mut state.popup {
                *scroll = scroll.saturating_sub(1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let PopupState::Detail { scroll } = &mut state.popup {
                *scroll = scroll.saturating_add(1);
            }
        }
        _ => {}
    }
    KeyAction::None
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
        KeyCode::Char('R') => return KeyAction::Reload,

        // Row navigation
        KeyCode::Up | KeyCode::Char('k') => state.engine.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.engine.select_next(),
        KeyCode::Esc => state.engine.clear_selection(),
        KeyCode::Enter => {
            if state.engine.selected().is_some() {
                state.popup = PopupState::Detail { scroll: 0 };
            }
        }

        // Paging
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => state.engine.prev_page(),
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => state.engine.next_page(),
        KeyCode::Home | KeyCode::Char('g') => state.engine.first_page(),
        KeyCode::End | KeyCode::Char('G') => state.engine.last_page(),

        // Sorting
        KeyCode::Char('s') | KeyCode::Char('S') => state.engine.cycle_sort_column(),
        KeyCode::Char('r') => state.engine.toggle_sort_direction(),

        // Filtering
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Filter;
            state.filter_input = state.engine.filter_text().to_string();
        }
        KeyCode::Char('f') | KeyCode::Char('F') => state.cycle_filter_scope(),

        // Column visibility
        KeyCode::Char(c @ '1'..='9') => {
            state.toggle_column(c as usize - '0' as usize);
        }
        KeyCode::Char('0') => {
            state.engine.reset_visibility();
            state.status_message = Some("column visibility reset".to_string());
        }

        KeyCode::Char('?') => state.popup = PopupState::Help,
        _ => {}
    }
    KeyAction::None
}

/// Handles keys while editing the filter; applied on every keystroke.
fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.filter_input.clear();
            state.apply_filter_input();
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            state.filter_input.pop();
            state.apply_filter_input();
        }
        KeyCode::Char(c) => {
            state.filter_input.push(c);
            state.apply_filter_input();
        }
        _ => {}
    }
    KeyAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{ViewSpec, parse_records};
    use serde_json::json;

    fn state() -> AppState {
        let spec: ViewSpec = serde_json::from_value(json!({
            "columns": [{"key": "name"}, {"key": "dept"}],
            "options": {"page_size": 2}
        }))
        .unwrap();
        let mut state = AppState::new("Managers", spec.build_engine().unwrap());
        state.apply_records(parse_records(
            r#"[{"id": 1, "name": "Ines", "dept": "Sales"},
                {"id": 2, "name": "Jon", "dept": "Ops"},
                {"id": 3, "name": "Kim", "dept": "Sales"}]"#,
            "id",
        ));
        state
    }

    fn press(state: &mut AppState, code: KeyCode) -> KeyAction {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_filters_live_and_esc_clears() {
        let mut s = state();
        press(&mut s, KeyCode::Right);
        assert_eq!(s.engine.page(), 1);

        press(&mut s, KeyCode::Char('/'));
        assert_eq!(s.input_mode, InputMode::Filter);
        press(&mut s, KeyCode::Char('s'));
        press(&mut s, KeyCode::Char('a'));
        assert_eq!(s.engine.filter_text(), "sa");
        assert_eq!(s.engine.view().total_filtered, 2);
        assert_eq!(s.engine.page(), 0);

        press(&mut s, KeyCode::Backspace);
        assert_eq!(s.engine.filter_text(), "s");

        press(&mut s, KeyCode::Esc);
        assert_eq!(s.input_mode, InputMode::Normal);
        assert_eq!(s.engine.filter_text(), "");
    }

    #[test]
    fn sort_and_page_keys() {
        let mut s = state();
        press(&mut s, KeyCode::Char('s'));
        assert_eq!(s.engine.sort().unwrap().column, "name");
        press(&mut s, KeyCode::Char('r'));
        assert!(!s.engine.sort().unwrap().direction.is_ascending());
        press(&mut s, KeyCode::End);
        assert_eq!(s.engine.page(), 1);
        press(&mut s, KeyCode::Home);
        assert_eq!(s.engine.page(), 0);
    }

    #[test]
    fn enter_opens_detail_for_selection() {
        let mut s = state();
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.popup, PopupState::None);

        press(&mut s, KeyCode::Down);
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.popup, PopupState::Detail { scroll: 0 });
        press(&mut s, KeyCode::Down);
        assert_eq!(s.popup, PopupState::Detail { scroll: 1 });
        // Navigation keys go to the popup, not the table.
        assert_eq!(s.engine.selected(), Some(&"1".to_string()));
        press(&mut s, KeyCode::Esc);
        assert_eq!(s.popup, PopupState::None);
    }

    #[test]
    fn quit_and_reload() {
        let mut s = state();
        assert_eq!(press(&mut s, KeyCode::Char('R')), KeyAction::Reload);
        assert_eq!(press(&mut s, KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(
            handle_key(
                &mut s,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            KeyAction::Quit
        );
    }

    #[test]
    fn digits_toggle_columns() {
        let mut s = state();
        press(&mut s, KeyCode::Char('2'));
        assert!(!s.engine.is_visible("dept").unwrap());
        press(&mut s, KeyCode::Char('0'));
        assert!(s.engine.is_visible("dept").unwrap());
    }
}
