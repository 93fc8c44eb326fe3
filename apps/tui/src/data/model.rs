use serde_json::Value;
use std::fmt;

/// Shared fallback for out-of-range and missing-column lookups.
pub const EMPTY_CELL: &CellValue = &CellValue::Empty;

/// A primitive cell value as delivered by the sheet endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent cell (short row) or JSON null.
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number.as_f64().map_or(Self::Empty, Self::Number),
            Value::String(text) => Self::Text(text.clone()),
            // Nested structures are not tabular data; keep their JSON text so
            // the cell still renders and matches searches.
            other => Self::Text(other.to_string()),
        }
    }

    /// Permissive numeric coercion used by the sort comparator. Inherited
    /// quirk: empty cells and empty/whitespace-only strings coerce to 0.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Self::Empty => Some(0.0),
            Self::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Self::Number(number) => Some(*number),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
        }
    }

    /// Falsiness in the source's sense: empty cells, empty strings, zero and
    /// `false` are all skipped by category tallying and search matching.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Bool(flag) => !flag,
            Self::Number(number) => *number == 0.0,
            Self::Text(text) => text.is_empty(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => {
                // Integral values print without a trailing ".0", matching the
                // string form the payload producer uses.
                if number.fract() == 0.0 && number.is_finite() && number.abs() < 1e15 {
                    write!(f, "{}", *number as i64)
                } else {
                    write!(f, "{number}")
                }
            }
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One data row, positionally aligned with its sheet's headers. Every record
/// holds exactly `headers.len()` values; short raw rows are padded with
/// `Empty` and long ones truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<CellValue>,
}

impl Record {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn value_at(&self, index: usize) -> &CellValue {
        self.values.get(index).unwrap_or(EMPTY_CELL)
    }
}

/// A normalized sheet: uppercased headers, records keyed positionally
/// against them, and category occurrence counts when the designated
/// category header exists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// Category value (string form) to occurrence count, in first-seen order.
    pub category_counts: Vec<(String, usize)>,
    /// Cached result of the most recent filter operation. `None` means no
    /// filter is applied and `records` is the view.
    pub filtered: Option<Vec<Record>>,
    /// Sheet-level normalization failure; the sheet still renders, empty.
    pub error: Option<String>,
}

impl Sheet {
    /// Normalizes a raw array-of-arrays sheet. The first row is the header
    /// row; failures stay local to this sheet and never abort a load.
    pub fn from_raw(raw: &Value, category_column: &str) -> Self {
        let Some(rows) = raw.as_array() else {
            return Self::failed("Invalid sheet data format or empty data");
        };
        if rows.is_empty() {
            return Self::failed("Invalid sheet data format or empty data");
        }

        let Some(header_row) = rows[0].as_array() else {
            return Self::failed("Sheet header row is not an array");
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| CellValue::from_json(cell).to_string().to_uppercase())
            .collect();

        let records: Vec<Record> = rows[1..]
            .iter()
            .map(|row| {
                // Rows may be ragged: zip positionally against the headers,
                // dropping extra cells and padding missing ones.
                let cells = row.as_array().map_or(&[][..], Vec::as_slice);
                let values = (0..headers.len())
                    .map(|index| cells.get(index).map_or(CellValue::Empty, CellValue::from_json))
                    .collect();
                Record::new(values)
            })
            .collect();

        let category_counts = tally_categories(&headers, &records, category_column);

        Self {
            headers,
            records,
            category_counts,
            filtered: None,
            error: None,
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Index of the first header matching `name`. Duplicated headers resolve
    /// to their first occurrence.
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// The records currently on display: the cached filtered view when a
    /// filter is active, otherwise all records.
    pub fn visible_records(&self) -> &[Record] {
        self.filtered.as_deref().unwrap_or(&self.records)
    }

    pub fn category_count_for(&self, value: &str) -> Option<usize> {
        self.category_counts
            .iter()
            .find(|(category, _)| category == value)
            .map(|(_, count)| *count)
    }
}

fn tally_categories(
    headers: &[String],
    records: &[Record],
    category_column: &str,
) -> Vec<(String, usize)> {
    let Some(index) = headers.iter().position(|header| header == category_column) else {
        return Vec::new();
    };

    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let value = record.value_at(index);
        if value.is_falsy() {
            continue;
        }
        let key = value.to_string();
        match counts.iter_mut().find(|(category, _)| *category == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_treats_empty_as_zero() {
        assert_eq!(CellValue::Empty.coerce_number(), Some(0.0));
        assert_eq!(CellValue::Text(String::new()).coerce_number(), Some(0.0));
        assert_eq!(CellValue::Text("  ".to_string()).coerce_number(), Some(0.0));
        assert_eq!(CellValue::Text("42".to_string()).coerce_number(), Some(42.0));
        assert_eq!(CellValue::Text("apple".to_string()).coerce_number(), None);
        assert_eq!(CellValue::Bool(true).coerce_number(), Some(1.0));
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(3.5).to_string(), "3.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn normalization_produces_one_record_per_data_row() {
        let raw = json!([
            ["name", "Category", "score"],
            ["A", "1", 10],
            ["B", "2", 20],
            ["C", "1"]
        ]);
        let sheet = Sheet::from_raw(&raw, "CATEGORY");

        assert!(sheet.error.is_none());
        assert_eq!(sheet.headers, vec!["NAME", "CATEGORY", "SCORE"]);
        assert_eq!(sheet.record_count(), 3);
        // Short row padded with an absent value.
        assert_eq!(*sheet.records[2].value_at(2), CellValue::Empty);
    }

    #[test]
    fn extra_cells_beyond_headers_are_dropped() {
        let raw = json!([["A", "B"], [1, 2, 3, 4]]);
        let sheet = Sheet::from_raw(&raw, "CATEGORY");
        assert_eq!(sheet.records[0].values().len(), 2);
    }

    #[test]
    fn category_counts_skip_falsy_values() {
        let raw = json!([
            ["NAME", "CATEGORY"],
            ["A", "1"],
            ["B", ""],
            ["C", "1"],
            ["D", null],
            ["E", 2]
        ]);
        let sheet = Sheet::from_raw(&raw, "CATEGORY");

        assert_eq!(
            sheet.category_counts,
            vec![("1".to_string(), 2), ("2".to_string(), 1)]
        );
        let tallied: usize = sheet.category_counts.iter().map(|(_, count)| count).sum();
        assert!(tallied <= sheet.record_count());
        assert_eq!(tallied, 3);
    }

    #[test]
    fn empty_or_malformed_sheets_fail_locally() {
        let empty = Sheet::from_raw(&json!([]), "CATEGORY");
        assert!(empty.error.is_some());
        assert!(empty.headers.is_empty());
        assert!(empty.records.is_empty());

        let not_an_array = Sheet::from_raw(&json!({"rows": []}), "CATEGORY");
        assert!(not_an_array.error.is_some());
    }

    #[test]
    fn duplicate_headers_resolve_to_first_occurrence() {
        let raw = json!([["ID", "ID"], ["left", "right"]]);
        let sheet = Sheet::from_raw(&raw, "CATEGORY");
        assert_eq!(sheet.header_index("ID"), Some(0));
    }
}
