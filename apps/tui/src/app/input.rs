use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    if app.view.searching {
        handle_search_input(app, key);
        return;
    }

    handle_dashboard_input(app, key);
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

/// Keystrokes while the search box is focused: edit the term and re-derive
/// the filtered view on every change.
fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Enter => {
            app.view.searching = false;
        }
        KeyCode::Backspace => {
            app.view.search.pop();
            app.apply_filter();
        }
        KeyCode::Char(c) => {
            app.view.search.push(c);
            app.apply_filter();
        }
        _ => {}
    }
}

fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Char('/') => {
            app.view.searching = true;
        }
        KeyCode::Char('r') => {
            app.request_reload();
        }
        KeyCode::Tab | KeyCode::Right => {
            app.next_sheet();
        }
        KeyCode::BackTab | KeyCode::Left => {
            app.prev_sheet();
        }
        KeyCode::Char('f') => {
            app.cycle_category();
        }
        KeyCode::Char('c') => {
            app.clear_category();
        }
        KeyCode::Char('[') => {
            app.move_sort_cursor(-1);
        }
        KeyCode::Char(']') => {
            app.move_sort_cursor(1);
        }
        KeyCode::Enter | KeyCode::Char('s') => {
            app.toggle_sort_at_cursor();
        }
        KeyCode::Up => {
            app.select_up();
        }
        KeyCode::Down => {
            app.select_down();
        }
        KeyCode::PageUp => {
            app.select_page_up();
        }
        KeyCode::PageDown => {
            app.select_page_down();
        }
        KeyCode::Home => {
            app.select_first();
        }
        KeyCode::End => {
            app.select_last();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataStore;
    use serde_json::json;

    fn sample_app() -> App {
        let mut store = DataStore::new("CATEGORY".to_string());
        assert!(store.apply_payload(&json!({
            "Alpha": [["NAME", "CATEGORY"], ["Apple", "1"], ["Banana", "2"]],
            "Beta": [["ID"], [1]]
        })));
        App::new(store)
    }

    #[test]
    fn typing_in_search_mode_filters_live() {
        let mut app = sample_app();
        handle_input(&mut app, KeyCode::Char('/'));
        assert!(app.view.searching);

        for c in "ban".chars() {
            handle_input(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.view.search, "ban");
        assert_eq!(app.store.visible_count(), 1);

        handle_input(&mut app, KeyCode::Backspace);
        assert_eq!(app.view.search, "ba");

        handle_input(&mut app, KeyCode::Esc);
        assert!(!app.view.searching);
        assert!(app.running);
    }

    #[test]
    fn tab_cycles_sheets_and_wraps() {
        let mut app = sample_app();
        assert_eq!(app.store.active_name(), Some("Alpha"));

        handle_input(&mut app, KeyCode::Tab);
        assert_eq!(app.store.active_name(), Some("Beta"));

        handle_input(&mut app, KeyCode::Tab);
        assert_eq!(app.store.active_name(), Some("Alpha"));

        handle_input(&mut app, KeyCode::BackTab);
        assert_eq!(app.store.active_name(), Some("Beta"));
    }

    #[test]
    fn reload_key_only_marks_the_request() {
        let mut app = sample_app();
        handle_input(&mut app, KeyCode::Char('r'));
        assert!(app.pending_reload);
    }

    #[test]
    fn help_popup_swallows_input_until_closed() {
        let mut app = sample_app();
        handle_input(&mut app, KeyCode::F(1));
        assert!(app.show_help);

        handle_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);

        handle_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn quit_keys_stop_the_app() {
        let mut app = sample_app();
        handle_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
