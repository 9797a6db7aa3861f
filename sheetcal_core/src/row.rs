//! A single spreadsheet row and the field aliases used to read it.

use std::collections::HashMap;

/// Date column names, most specific first.
pub static DATE_FIELDS: [&str; 2] = ["Event Date", "Date"];
pub static START_FIELDS: [&str; 2] = ["Start Time", "Start"];
pub static END_FIELDS: [&str; 2] = ["End Time", "End"];
pub static TITLE_FIELDS: [&str; 3] = ["Short Title", "Event Title", "Title"];
pub static LOCATION_FIELD: &str = "Location";
pub static CATEGORY_FIELD: &str = "Category";
pub static CANCELED_FIELD: &str = "Canceled";

static TRUTHY_VALUES: [&str; 8] = ["true", "yes", "1", "y", "t", "checked", "✓", "on"];

/// One record of the published sheet, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get the raw value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get the trimmed value of the first alias that holds something other than whitespace.
    pub fn first_of(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    /// Get a trimmed field, falling back to `default` when it is missing or blank.
    pub fn text_or(&self, aliases: &[&str], default: &str) -> String {
        self.first_of(aliases).unwrap_or(default).to_string()
    }
}

impl From<HashMap<String, String>> for Row {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Whether a checkbox-like cell counts as checked.
pub fn truthy(value: Option<&str>) -> bool {
    let value = value.unwrap_or_default().trim().to_lowercase();
    TRUTHY_VALUES.contains(&value.as_str())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_case::test_case;

    use crate::row::{truthy, Row, DATE_FIELDS, TITLE_FIELDS};

    #[test]
    fn test_first_of_prefers_earlier_alias() {
        let row = Row::from_iter([("Event Date", "3/5/2024"), ("Date", "4/6/2025")]);
        assert_eq!(row.first_of(&DATE_FIELDS), Some("3/5/2024"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut row = Row::new();
        row.insert("Date", "3/5/2024");
        row.insert("Date", "3/6/2024");
        assert_eq!(row.get("Date"), Some("3/6/2024"));
        assert_eq!(row.get("Title"), None);
        let fields = HashMap::from([(String::from("Date"), String::from("3/6/2024"))]);
        assert_eq!(Row::from(fields), row);
    }

    #[test]
    fn test_first_of_skips_blank_alias() {
        let row = Row::from_iter([("Short Title", "   "), ("Title", " Sync ")]);
        assert_eq!(row.first_of(&TITLE_FIELDS), Some("Sync"));
        assert_eq!(row.text_or(&["Location"], ""), "");
    }

    #[test_case(Some("TRUE") => true)]
    #[test_case(Some(" yes ") => true)]
    #[test_case(Some("1") => true)]
    #[test_case(Some("Y") => true)]
    #[test_case(Some("t") => true)]
    #[test_case(Some("Checked") => true)]
    #[test_case(Some("✓") => true)]
    #[test_case(Some("on") => true)]
    #[test_case(Some("no") => false)]
    #[test_case(Some("0") => false)]
    #[test_case(Some("") => false)]
    #[test_case(None => false)]
    fn test_truthy(value: Option<&str>) -> bool {
        truthy(value)
    }
}
