use crate::data::fetch::{DataError, Fetcher};
use crate::data::model::{CellValue, Record, Sheet, EMPTY_CELL};
use crate::domain::SortDirection;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Top-level payload keys that are never sheet names.
const RESERVED_KEYS: [&str; 2] = ["meta", "legacy"];

/// Owns the application state: the sheet mapping, the active-sheet pointer,
/// and the filter/sort operations over it. Never touches presentation.
#[derive(Debug)]
pub struct DataStore {
    names: Vec<String>,
    sheets: HashMap<String, Sheet>,
    active: Option<String>,
    loading: bool,
    last_error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
    category_column: String,
}

impl DataStore {
    pub fn new(category_column: String) -> Self {
        Self {
            names: Vec::new(),
            sheets: HashMap::new(),
            active: None,
            loading: false,
            last_error: None,
            last_updated: None,
            category_column,
        }
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.active.as_ref().and_then(|name| self.sheets.get(name))
    }

    fn active_sheet_mut(&mut self) -> Option<&mut Sheet> {
        let name = self.active.clone()?;
        self.sheets.get_mut(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn category_column(&self) -> &str {
        &self.category_column
    }

    /// Number of records currently on display for the active sheet.
    pub fn visible_count(&self) -> usize {
        self.active_sheet()
            .map_or(0, |sheet| sheet.visible_records().len())
    }

    /// Fetches and normalizes the whole payload. The returned boolean is the
    /// sole failure channel: no error escapes this boundary. A load started
    /// while another is in flight is refused.
    pub async fn load_all(&mut self, fetcher: &Fetcher) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.last_error = None;

        match fetcher.fetch_payload().await {
            Ok(payload) => self.apply_payload(&payload),
            Err(err) => {
                self.record_error(err.to_string());
                false
            }
        }
    }

    /// The fetch-free core of `load_all`: interprets one JSON document and
    /// replaces the sheet mapping wholesale. Prior sheets survive only a
    /// malformed payload, never a successful one.
    pub fn apply_payload(&mut self, payload: &Value) -> bool {
        let Some(document) = payload.as_object() else {
            self.record_error(DataError::BadPayload.to_string());
            return false;
        };

        let meta = document.get("meta").and_then(Value::as_object);

        self.last_updated = Some(
            meta.and_then(|meta| meta.get("lastUpdated"))
                .and_then(Value::as_str)
                .and_then(|stamp| DateTime::parse_from_rfc3339(stamp).ok())
                .map_or_else(Utc::now, |stamp| stamp.with_timezone(&Utc)),
        );

        // Sheet names come from metadata when present; otherwise every
        // non-reserved top-level key is a sheet.
        let mut names: Vec<String> = meta
            .and_then(|meta| meta.get("sheetNames"))
            .and_then(Value::as_array)
            .map_or_else(
                || {
                    document
                        .keys()
                        .filter(|key| !RESERVED_KEYS.contains(&key.as_str()))
                        .cloned()
                        .collect()
                },
                |listed| {
                    listed
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                },
            );

        // Only array-valued entries are sheets; anything else is dropped so
        // the active pointer always names a real sheet.
        names.retain(|name| matches!(document.get(name), Some(Value::Array(_))));

        let mut sheets = HashMap::with_capacity(names.len());
        for name in &names {
            if let Some(raw) = document.get(name) {
                sheets.insert(name.clone(), Sheet::from_raw(raw, &self.category_column));
            }
        }

        self.names = names;
        self.sheets = sheets;
        self.loading = false;

        if self.names.is_empty() {
            // An empty sheet set is not an error, just nothing to show.
            self.active = None;
            return false;
        }

        let still_valid = self
            .active
            .as_ref()
            .is_some_and(|name| self.sheets.contains_key(name));
        if !still_valid {
            self.active = self.names.first().cloned();
        }

        true
    }

    /// Sets the active sheet if the name is known. Resetting presentation
    /// filter/sort state is the caller's responsibility.
    pub fn switch_sheet(&mut self, name: &str) -> bool {
        if self.sheets.contains_key(name) {
            self.active = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Filters the active sheet: category equality first, then a
    /// case-insensitive substring match over every value's string form.
    /// The result is cached as the sheet's filtered view.
    pub fn filter(&mut self, term: Option<&str>, category: Option<&str>) -> Vec<Record> {
        let column = self.category_column.clone();
        let Some(sheet) = self.active_sheet_mut() else {
            return Vec::new();
        };

        let mut result = sheet.records.clone();

        if let Some(category) = category {
            let index = sheet.header_index(&column);
            result.retain(|record| {
                index.is_some_and(|index| {
                    let value = record.value_at(index);
                    !value.is_falsy() && value.to_string() == category
                })
            });
        }

        if let Some(term) = term {
            let needle = term.trim().to_lowercase();
            if !needle.is_empty() {
                result.retain(|record| {
                    record.values().iter().any(|value| {
                        !value.is_falsy() && value.to_string().to_lowercase().contains(&needle)
                    })
                });
            }
        }

        sheet.filtered = Some(result.clone());
        result
    }

    /// Sorts the filtered view when one exists, otherwise the records, and
    /// writes the order back to whichever was sorted. When both compared
    /// values coerce to numbers the comparison is numeric (empty coerces to
    /// 0, an inherited quirk); otherwise lowercase lexicographic. The sort
    /// is unstable, matching source behavior.
    pub fn sort(&mut self, column: &str, direction: SortDirection) -> Vec<Record> {
        let Some(sheet) = self.active_sheet_mut() else {
            return Vec::new();
        };

        let index = sheet.header_index(column);
        let had_filter = sheet.filtered.is_some();
        let mut data = if had_filter {
            sheet.filtered.clone().unwrap_or_default()
        } else {
            sheet.records.clone()
        };

        data.sort_unstable_by(|a, b| compare_records(a, b, index, direction));

        if had_filter {
            sheet.filtered = Some(data.clone());
        } else {
            sheet.records = data.clone();
        }
        data
    }

    /// Drops the active sheet's cached filtered view.
    pub fn clear_filter(&mut self) {
        if let Some(sheet) = self.active_sheet_mut() {
            sheet.filtered = None;
        }
    }

    fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
        self.loading = false;
    }
}

fn compare_records(
    a: &Record,
    b: &Record,
    index: Option<usize>,
    direction: SortDirection,
) -> Ordering {
    let left = index.map_or(EMPTY_CELL, |index| a.value_at(index));
    let right = index.map_or(EMPTY_CELL, |index| b.value_at(index));

    let ordering = match (left.coerce_number(), right.coerce_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => string_sort_key(left).cmp(&string_sort_key(right)),
    };

    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

// Falsy values stringify to "" in the comparator, as the source coerced
// them before comparing.
fn string_sort_key(value: &CellValue) -> String {
    if value.is_falsy() {
        String::new()
    } else {
        value.to_string().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(payload: serde_json::Value) -> DataStore {
        let mut store = DataStore::new("CATEGORY".to_string());
        assert!(store.apply_payload(&payload));
        store
    }

    fn sample_store() -> DataStore {
        store_with(json!({
            "meta": { "sheetNames": ["Sheet1"], "lastUpdated": "2025-04-21T10:00:00Z" },
            "Sheet1": [
                ["NAME", "CATEGORY"],
                ["A", "1"],
                ["B", "2"],
                ["C", "1"]
            ]
        }))
    }

    fn names_of(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|record| record.value_at(0).to_string())
            .collect()
    }

    #[test]
    fn payload_with_meta_normalizes_listed_sheets() {
        let store = sample_store();

        assert_eq!(store.sheet_names(), ["Sheet1"]);
        assert_eq!(store.active_name(), Some("Sheet1"));

        let sheet = store.active_sheet().map(Clone::clone).unwrap_or_default();
        assert_eq!(sheet.record_count(), 3);
        assert_eq!(
            sheet.category_counts,
            vec![("1".to_string(), 2), ("2".to_string(), 1)]
        );
    }

    #[test]
    fn sheets_inferred_from_top_level_keys_without_meta() {
        let store = store_with(json!({
            "First": [["A"], [1]],
            "legacy": [["OLD"], [0]],
            "Second": [["B"], [2]]
        }));

        assert_eq!(store.sheet_names(), ["First", "Second"]);
        assert_eq!(store.active_name(), Some("First"));
    }

    #[test]
    fn non_object_payload_is_a_load_error() {
        let mut store = DataStore::new("CATEGORY".to_string());
        assert!(!store.apply_payload(&json!([1, 2, 3])));
        assert_eq!(
            store.last_error(),
            Some("Invalid data format received from API")
        );
    }

    #[test]
    fn empty_sheet_set_clears_active_without_error() {
        let mut store = sample_store();
        assert!(!store.apply_payload(&json!({ "meta": { "sheetNames": [] } })));
        assert!(store.is_empty());
        assert_eq!(store.active_name(), None);
        assert_eq!(store.last_error(), None);
    }

    #[test]
    fn reload_replaces_sheets_wholesale_and_revalidates_active() {
        let mut store = sample_store();
        assert!(store.switch_sheet("Sheet1"));

        assert!(store.apply_payload(&json!({
            "Fresh": [["X"], ["x1"]]
        })));

        assert_eq!(store.sheet_names(), ["Fresh"]);
        assert_eq!(store.active_name(), Some("Fresh"));
        assert!(store.sheet("Sheet1").is_none());
    }

    #[test]
    fn malformed_individual_sheet_does_not_abort_the_load() {
        let store = store_with(json!({
            "Good": [["A"], [1]],
            "Bad": []
        }));

        assert_eq!(store.sheet_names(), ["Good", "Bad"]);
        let bad = store.sheet("Bad").map(Clone::clone).unwrap_or_default();
        assert!(bad.error.is_some());
        assert_eq!(bad.record_count(), 0);
    }

    #[test]
    fn switching_to_unknown_sheet_is_a_no_op() {
        let mut store = sample_store();
        let names_before = store.sheet_names().to_vec();

        assert!(!store.switch_sheet("Nope"));
        assert_eq!(store.active_name(), Some("Sheet1"));
        assert_eq!(store.sheet_names(), names_before.as_slice());
    }

    #[test]
    fn unrestricted_filter_returns_all_records_in_order() {
        let mut store = sample_store();
        let all = store.filter(None, None);
        assert_eq!(names_of(&all), ["A", "B", "C"]);
    }

    #[test]
    fn category_filter_then_clearing_restores_all_records() {
        let mut store = sample_store();

        let filtered = store.filter(Some(""), Some("1"));
        assert_eq!(names_of(&filtered), ["A", "C"]);

        let all = store.filter(None, None);
        assert_eq!(names_of(&all), ["A", "B", "C"]);
    }

    #[test]
    fn search_matches_substrings_case_insensitively() {
        let mut store = store_with(json!({
            "S": [["NAME", "NOTE"], ["Apple", "fresh"], ["Banana", "RIPE"], ["Cherry", "ripe"]]
        }));

        let hits = store.filter(Some("RiPe"), None);
        assert_eq!(names_of(&hits), ["Banana", "Cherry"]);
    }

    #[test]
    fn numeric_sort_descending_reverses_ascending() {
        let mut store = store_with(json!({
            "S": [["N", "SCORE"], ["a", 3], ["b", 10], ["c", 2]]
        }));

        let ascending = store.sort("SCORE", SortDirection::Ascending);
        assert_eq!(names_of(&ascending), ["c", "a", "b"]);

        let descending = store.sort("SCORE", SortDirection::Descending);
        assert_eq!(names_of(&descending), ["b", "a", "c"]);
    }

    #[test]
    fn string_sort_is_case_insensitive() {
        let mut store = store_with(json!({
            "S": [["NAME"], ["Banana"], ["apple"], ["cherry"]]
        }));

        let sorted = store.sort("NAME", SortDirection::Ascending);
        assert_eq!(names_of(&sorted), ["apple", "Banana", "cherry"]);
    }

    #[test]
    fn empty_string_sorts_as_numeric_zero() {
        let mut store = store_with(json!({
            "S": [["N", "SCORE"], ["a", 5], ["b", ""], ["c", -1]]
        }));

        let sorted = store.sort("SCORE", SortDirection::Ascending);
        assert_eq!(names_of(&sorted), ["c", "b", "a"]);
    }

    #[test]
    fn sorting_a_missing_column_treats_values_as_empty() {
        let mut store = sample_store();
        let sorted = store.sort("ABSENT", SortDirection::Ascending);
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn sort_applies_to_the_filtered_view_when_present() {
        let mut store = sample_store();

        let filtered = store.filter(None, Some("1"));
        assert_eq!(names_of(&filtered), ["A", "C"]);

        let sorted = store.sort("NAME", SortDirection::Descending);
        assert_eq!(names_of(&sorted), ["C", "A"]);

        // Written back to the cached view, not to the records.
        let sheet = store.active_sheet().map(Clone::clone).unwrap_or_default();
        assert_eq!(names_of(sheet.visible_records()), ["C", "A"]);
        assert_eq!(names_of(&sheet.records), ["A", "B", "C"]);
    }

    #[test]
    fn filtered_view_stays_a_subset_of_records() {
        let mut store = sample_store();
        store.filter(Some("a"), None);

        let sheet = store.active_sheet().map(Clone::clone).unwrap_or_default();
        if let Some(view) = &sheet.filtered {
            assert!(view.iter().all(|record| sheet.records.contains(record)));
        }
    }

    #[test]
    fn filter_without_active_sheet_returns_empty() {
        let mut store = DataStore::new("CATEGORY".to_string());
        assert!(store.filter(Some("x"), None).is_empty());
        assert!(store.sort("NAME", SortDirection::Ascending).is_empty());
    }
}
