//! Read-only renderings of a form tree for review and summary screens.
//!
//! The mutating address-copy toggle lives on [`crate::form::FormTree::copy_address_toggle`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::config::EngineConfig;
use crate::form::{Control, FieldPath, Group, Value};

/// Markup emitted for a checked box; consumers render it as raw HTML.
pub const CHECKMARK: &str = "<i class=\"fa fa-check\"> </i>";

/// Renders a single value, or the placeholder when it carries nothing to show.
pub fn render_value(value: &Value, placeholder: &str) -> String {
    match value {
        Value::Null => placeholder.to_string(),
        Value::Bool(true) => "Yes".into(),
        Value::Bool(false) => "No".into(),
        Value::Number(number) if *number == 0.0 => placeholder.to_string(),
        other if other.is_empty() => placeholder.to_string(),
        other => other.to_string(),
    }
}

/// `MMM Do, YYYY`, e.g. `Jan 5th, 2024`. Accepts dates, ISO datetimes and RFC 3339.
pub fn format_human_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })?;
    Some(format!(
        "{} {}{}, {}",
        date.format("%b"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    ))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Projection helpers bound to one tree and the display configuration.
pub struct Projector<'a> {
    root: &'a Group,
    config: &'a EngineConfig,
}

impl<'a> Projector<'a> {
    pub fn new(root: &'a Group, config: &'a EngineConfig) -> Self {
        Self { root, config }
    }

    fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn value_or_placeholder(&self, path: &str) -> String {
        self.value_or(path, self.placeholder())
    }

    /// Missing paths and groups render as the placeholder.
    pub fn value_or(&self, path: &str, placeholder: &str) -> String {
        match self.root.lookup(&FieldPath::parse(path)) {
            Some(Control::Field(field)) => render_value(field.value(), placeholder),
            _ => placeholder.to_string(),
        }
    }

    pub fn join_non_empty(&self, paths: &[&str], separator: &str) -> String {
        paths
            .iter()
            .map(|path| self.value_or_placeholder(path))
            .filter(|rendered| rendered != self.placeholder())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// [`Projector::join_non_empty`] with the configured separator (names, etc.).
    pub fn multi_value(&self, paths: &[&str]) -> String {
        self.join_non_empty(paths, &self.config.multi_value_separator)
    }

    pub fn format_date_range(&self, paths: &[&str]) -> String {
        let dates: Vec<String> = paths
            .iter()
            .map(|path| self.value_or_placeholder(path))
            .filter(|rendered| rendered != self.placeholder())
            .map(|rendered| format_human_date(&rendered).unwrap_or(rendered))
            .collect();
        if dates.is_empty() {
            return self.placeholder().to_string();
        }
        dates.join(&self.config.date_range_separator)
    }

    /// Six fixed lines; empty ones are dropped except `line1`, which is always
    /// emitted with its separator.
    pub fn format_address_block(&self, group_path: &str) -> String {
        let Some(group) = self
            .root
            .lookup(&FieldPath::parse(group_path))
            .and_then(Control::as_group)
        else {
            return self.placeholder().to_string();
        };
        let line = |name: &str| {
            group
                .value_of(&FieldPath::parse(name))
                .map(Value::to_string)
                .unwrap_or_default()
        };
        let separator = &self.config.address_separator;

        let mut address = format!("{}{}", line("line1"), separator);
        for name in ["line2", "city", "province", "country"] {
            let value = line(name);
            if !value.is_empty() {
                address.push_str(&value);
                address.push_str(separator);
            }
        }
        address.push_str(&line("postalCode"));
        address
    }

    /// `p1-p2-p3`, or the placeholder if any part is missing.
    pub fn format_sin(&self, part1: &str, part2: &str, part3: &str) -> String {
        let parts = [part1, part2, part3].map(|path| self.value_or_placeholder(path));
        if parts.iter().any(|part| part == self.placeholder()) {
            return self.placeholder().to_string();
        }
        parts.join("-")
    }

    pub fn checkmark_or_placeholder(&self, path: &str) -> String {
        match self.root.value_of(&FieldPath::parse(path)) {
            Some(Value::Bool(true)) => CHECKMARK.to_string(),
            _ => self.placeholder().to_string(),
        }
    }

    /// True for non-empty text or lists.
    pub fn has_value_set(&self, path: &str) -> bool {
        match self.root.value_of(&FieldPath::parse(path)) {
            Some(Value::Text(text)) => !text.is_empty(),
            Some(Value::List(items)) => !items.is_empty(),
            _ => false,
        }
    }

    pub fn has_signature(&self, path: &str) -> bool {
        self.has_value_set(path)
    }

    /// Integer code behind a select field; anything non-numeric is 0.
    pub fn value_for_enum(&self, path: &str) -> i64 {
        match self.root.value_of(&FieldPath::parse(path)) {
            Some(Value::Number(number)) => *number as i64,
            Some(Value::Text(text)) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(|number| number as i64)
                .unwrap_or(0),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;

    fn review_tree() -> Group {
        Group::new()
            .with_group(
                "personal",
                Group::new()
                    .with_field("firstName", Field::new("Ada"))
                    .with_field("middleName", Field::blank())
                    .with_field("lastName", Field::new("Lovelace"))
                    .with_field("gender", Field::new(0))
                    .with_field("consent", Field::new(true))
                    .with_field("declined", Field::new(false))
                    .with_field("languages", Field::new(vec!["en", "fr"]))
                    .with_field("sin1", Field::new("123"))
                    .with_field("sin2", Field::new("456"))
                    .with_field("sin3", Field::new("789"))
                    .with_field("contactMethod", Field::new("2"))
                    .with_field("signature", Field::new("data:image/png;base64,AAA")),
            )
            .with_group(
                "crime",
                Group::new()
                    .with_field("start", Field::new("2024-01-05"))
                    .with_field("end", Field::new("2024-03-22T10:00:00"))
                    .with_field("unknown", Field::blank()),
            )
    }

    #[test]
    fn placeholder_rules() {
        let root = review_tree();
        let config = EngineConfig::default();
        let view = Projector::new(&root, &config);
        assert_eq!(view.value_or_placeholder("personal.middleName"), "--");
        assert_eq!(view.value_or_placeholder("personal.gender"), "--");
        assert_eq!(view.value_or_placeholder("personal.declined"), "No");
        assert_eq!(view.value_or_placeholder("personal.consent"), "Yes");
        assert_eq!(view.value_or_placeholder("personal.firstName"), "Ada");
        assert_eq!(view.value_or_placeholder("personal.missing"), "--");
        assert_eq!(view.value_or_placeholder("personal"), "--");
        assert_eq!(view.value_or_placeholder("personal.languages"), "en, fr");
        assert_eq!(view.value_or("personal.middleName", "n/a"), "n/a");
    }

    #[test]
    fn join_drops_placeholders() {
        let root = review_tree();
        let config = EngineConfig::default();
        let view = Projector::new(&root, &config);
        assert_eq!(
            view.multi_value(&["personal.firstName", "personal.middleName", "personal.lastName"]),
            "Ada Lovelace"
        );
        assert_eq!(view.join_non_empty(&["personal.middleName"], ", "), "");
    }

    #[test]
    fn date_range_formats_surviving_values() {
        let root = review_tree();
        let config = EngineConfig::default();
        let view = Projector::new(&root, &config);
        assert_eq!(
            view.format_date_range(&["crime.start", "crime.end"]),
            "Jan 5th, 2024 - Mar 22nd, 2024"
        );
        assert_eq!(view.format_date_range(&["crime.start", "crime.unknown"]), "Jan 5th, 2024");
        assert_eq!(view.format_date_range(&["crime.unknown"]), "--");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(format_human_date("2024-01-01").unwrap(), "Jan 1st, 2024");
        assert_eq!(format_human_date("2024-01-11").unwrap(), "Jan 11th, 2024");
        assert_eq!(format_human_date("2024-01-23").unwrap(), "Jan 23rd, 2024");
        assert_eq!(format_human_date("2024-02-12T08:00:00Z").unwrap(), "Feb 12th, 2024");
        assert!(format_human_date("yesterday").is_none());
    }

    #[test]
    fn sin_uses_each_part() {
        let root = review_tree();
        let config = EngineConfig::default();
        let view = Projector::new(&root, &config);
        assert_eq!(
            view.format_sin("personal.sin1", "personal.sin2", "personal.sin3"),
            "123-456-789"
        );
        assert_eq!(view.format_sin("personal.sin1", "personal.middleName", "personal.sin3"), "--");
    }

    #[test]
    fn flags_and_enum_codes() {
        let root = review_tree();
        let config = EngineConfig::default();
        let view = Projector::new(&root, &config);
        assert_eq!(view.checkmark_or_placeholder("personal.consent"), CHECKMARK);
        assert_eq!(view.checkmark_or_placeholder("personal.declined"), "--");
        assert!(view.has_signature("personal.signature"));
        assert!(!view.has_value_set("personal.middleName"));
        assert!(!view.has_value_set("personal.gender"));
        assert_eq!(view.value_for_enum("personal.contactMethod"), 2);
        assert_eq!(view.value_for_enum("personal.firstName"), 0);
        assert_eq!(view.value_for_enum("personal.missing"), 0);
    }
}
