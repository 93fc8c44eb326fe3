use crate::data::DataStore;
use crate::domain::{NoticeKind, SortDirection};
use std::time::Instant;

/// A transient status-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Presentation-only state owned by the renderer side of the app. Reset
/// whenever the active sheet changes; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Category value currently toggled on, if any.
    pub active_filter: Option<String>,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    /// Free-text search term applied to the table.
    pub search: String,
    /// Whether keystrokes currently edit the search box.
    pub searching: bool,
    pub selected_row: usize,
    /// Header index the sort cursor sits on.
    pub sort_cursor: usize,
}

impl ViewState {
    pub const fn new() -> Self {
        Self {
            active_filter: None,
            sort_column: None,
            sort_direction: SortDirection::Ascending,
            search: String::new(),
            searching: false,
            selected_row: 0,
            sort_cursor: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level application controller: owns the data store and the view
/// state, and is the only thing that mutates either.
#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub store: DataStore,
    pub view: ViewState,
    /// Set by input handling, serviced by the event loop.
    pub pending_reload: bool,
    pub notice: Option<Notice>,
    pub show_help: bool,
    pub animation_counter: f64,
    pub last_frame: Instant,
}

impl App {
    pub fn new(store: DataStore) -> Self {
        Self {
            running: true,
            store,
            view: ViewState::new(),
            pending_reload: false,
            notice: None,
            show_help: false,
            animation_counter: 0.0,
            last_frame: Instant::now(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Animation counter cycles between 0 and 2*PI
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }
    }

    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            message: message.into(),
        });
    }

    /// Re-runs the filter with the current search term and category filter,
    /// refreshing the active sheet's cached view.
    pub fn apply_filter(&mut self) {
        let term = self.view.search.clone();
        let category = self.view.active_filter.clone();
        self.store.filter(Some(&term), category.as_deref());
        self.clamp_selection();
    }

    /// Toggles/sets the sort on `column` and re-derives the visible order:
    /// same column flips direction, a new column starts ascending.
    pub fn toggle_sort(&mut self, column: String) {
        if self.view.sort_column.as_deref() == Some(column.as_str()) {
            self.view.sort_direction = self.view.sort_direction.toggled();
        } else {
            self.view.sort_column = Some(column.clone());
            self.view.sort_direction = SortDirection::Ascending;
        }
        self.store.sort(&column, self.view.sort_direction);
    }

    pub fn toggle_sort_at_cursor(&mut self) {
        let column = self
            .store
            .active_sheet()
            .and_then(|sheet| sheet.headers.get(self.view.sort_cursor))
            .cloned();
        if let Some(column) = column {
            self.toggle_sort(column);
        }
    }

    /// Switches sheets and resets presentation state — the store keeps its
    /// own state, the view reset is this controller's job.
    pub fn switch_to_sheet(&mut self, name: &str) {
        if self.store.active_name() == Some(name) {
            return;
        }
        if self.store.switch_sheet(name) {
            self.view.reset();
            // A reset search box must show the unfiltered records.
            self.store.clear_filter();
            self.notify(NoticeKind::Info, format!("Switched to \"{name}\" sheet"));
        }
    }

    pub fn next_sheet(&mut self) {
        self.step_sheet(1);
    }

    pub fn prev_sheet(&mut self) {
        self.step_sheet(-1);
    }

    fn step_sheet(&mut self, delta: isize) {
        let names = self.store.sheet_names().to_vec();
        if names.is_empty() {
            return;
        }
        let current = self
            .store
            .active_name()
            .and_then(|active| names.iter().position(|name| name == active))
            .unwrap_or(0);
        let next = (current as isize + delta).rem_euclid(names.len() as isize) as usize;
        self.switch_to_sheet(&names[next]);
    }

    /// Toggles `value` as the active category filter, as clicking a summary
    /// card or legend entry does.
    pub fn toggle_category(&mut self, value: &str) {
        if self.view.active_filter.as_deref() == Some(value) {
            self.set_category(None);
        } else {
            self.set_category(Some(value.to_string()));
        }
    }

    /// Advances the category filter through none -> each category -> none.
    pub fn cycle_category(&mut self) {
        let categories: Vec<String> = self
            .store
            .active_sheet()
            .map(|sheet| {
                sheet
                    .category_counts
                    .iter()
                    .map(|(value, _)| value.clone())
                    .collect()
            })
            .unwrap_or_default();
        if categories.is_empty() {
            return;
        }

        let next = match &self.view.active_filter {
            None => Some(categories[0].clone()),
            Some(current) => categories
                .iter()
                .position(|value| value == current)
                .and_then(|position| categories.get(position + 1))
                .cloned(),
        };
        self.set_category(next);
    }

    pub fn clear_category(&mut self) {
        if self.view.active_filter.is_some() {
            self.set_category(None);
        }
    }

    fn set_category(&mut self, value: Option<String>) {
        match &value {
            Some(category) => {
                self.notify(NoticeKind::Info, format!("Filtering Category {category}"));
            }
            None => self.notify(NoticeKind::Info, "Filter cleared"),
        }
        self.view.active_filter = value;
        self.apply_filter();
    }

    pub fn request_reload(&mut self) {
        self.pending_reload = true;
    }

    /// Re-synchronizes the view after a reload: a changed active sheet resets
    /// presentation state; an unchanged one keeps the current filter applied
    /// to the fresh records.
    pub fn after_reload(&mut self, previous_active: Option<String>, success: bool) {
        if !success {
            return;
        }
        let active_changed = self.store.active_name() != previous_active.as_deref();
        if active_changed {
            self.view.reset();
        } else if !self.view.search.is_empty() || self.view.active_filter.is_some() {
            self.apply_filter();
        }
        self.clamp_selection();
    }

    pub fn select_up(&mut self) {
        self.view.selected_row = self.view.selected_row.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let count = self.store.visible_count();
        if count > 0 && self.view.selected_row < count - 1 {
            self.view.selected_row += 1;
        }
    }

    pub fn select_page_up(&mut self) {
        self.view.selected_row = self.view.selected_row.saturating_sub(5);
    }

    pub fn select_page_down(&mut self) {
        let count = self.store.visible_count();
        if count > 0 {
            self.view.selected_row = (self.view.selected_row + 5).min(count - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.view.selected_row = 0;
    }

    pub fn select_last(&mut self) {
        self.view.selected_row = self.store.visible_count().saturating_sub(1);
    }

    pub fn move_sort_cursor(&mut self, delta: isize) {
        let width = self
            .store
            .active_sheet()
            .map_or(0, |sheet| sheet.headers.len());
        if width == 0 {
            return;
        }
        let next = (self.view.sort_cursor as isize + delta).rem_euclid(width as isize);
        self.view.sort_cursor = next as usize;
    }

    fn clamp_selection(&mut self) {
        let count = self.store.visible_count();
        if self.view.selected_row >= count {
            self.view.selected_row = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_app() -> App {
        let mut store = DataStore::new("CATEGORY".to_string());
        assert!(store.apply_payload(&json!({
            "meta": { "sheetNames": ["Alpha", "Beta"] },
            "Alpha": [["NAME", "CATEGORY"], ["A", "1"], ["B", "2"], ["C", "1"]],
            "Beta": [["ID"], [1], [2]]
        })));
        App::new(store)
    }

    #[test]
    fn switching_sheets_resets_view_state() {
        let mut app = sample_app();
        app.view.search = "a".to_string();
        app.view.active_filter = Some("1".to_string());
        app.apply_filter();

        app.switch_to_sheet("Beta");

        assert_eq!(app.store.active_name(), Some("Beta"));
        assert_eq!(app.view, ViewState::new());
        assert_eq!(app.store.visible_count(), 2);
    }

    #[test]
    fn toggling_the_same_column_flips_direction() {
        let mut app = sample_app();

        app.toggle_sort("NAME".to_string());
        assert_eq!(app.view.sort_direction, SortDirection::Ascending);

        app.toggle_sort("NAME".to_string());
        assert_eq!(app.view.sort_direction, SortDirection::Descending);

        app.toggle_sort("CATEGORY".to_string());
        assert_eq!(app.view.sort_column.as_deref(), Some("CATEGORY"));
        assert_eq!(app.view.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn cycling_categories_ends_back_at_no_filter() {
        let mut app = sample_app();

        app.cycle_category();
        assert_eq!(app.view.active_filter.as_deref(), Some("1"));
        assert_eq!(app.store.visible_count(), 2);

        app.cycle_category();
        assert_eq!(app.view.active_filter.as_deref(), Some("2"));
        assert_eq!(app.store.visible_count(), 1);

        app.cycle_category();
        assert_eq!(app.view.active_filter, None);
        assert_eq!(app.store.visible_count(), 3);
    }

    #[test]
    fn toggling_active_category_clears_it() {
        let mut app = sample_app();

        app.toggle_category("2");
        assert_eq!(app.view.active_filter.as_deref(), Some("2"));

        app.toggle_category("2");
        assert_eq!(app.view.active_filter, None);
    }

    #[test]
    fn selection_is_clamped_after_filtering() {
        let mut app = sample_app();
        app.select_last();
        assert_eq!(app.view.selected_row, 2);

        app.toggle_category("2");
        assert_eq!(app.view.selected_row, 0);
    }

    #[test]
    fn reload_keeps_filter_when_active_sheet_survives() {
        let mut app = sample_app();
        app.toggle_category("1");
        let previous = app.store.active_name().map(str::to_string);

        assert!(app.store.apply_payload(&json!({
            "Alpha": [["NAME", "CATEGORY"], ["Z", "1"], ["Y", "3"]]
        })));
        app.after_reload(previous, true);

        assert_eq!(app.view.active_filter.as_deref(), Some("1"));
        assert_eq!(app.store.visible_count(), 1);
    }
}
