//! Column types and cell values.
//!
//! Every column type has a canonical default and a coercion rule that turns
//! an editor input into the stored value. Defaults are always type-correct,
//! so a freshly added column or row never holds a mistyped cell.
//!
//! ## Case Sensitivity
//!
//! Choice matching for select columns is case-sensitive unless the table
//! settings turn it off. A case-insensitive match stores the choice's own
//! spelling, never the typed one.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use gridform_config::TableSettings;
use serde::{Deserialize, Serialize};

/// Closed set of column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    Date,
    DateTime,
    SingleSelect,
    Dropdown,
    Tags,
    Link,
    Email,
}

impl ColumnType {
    pub const ALL: [ColumnType; 10] = [
        ColumnType::Text,
        ColumnType::Number,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::DateTime,
        ColumnType::SingleSelect,
        ColumnType::Dropdown,
        ColumnType::Tags,
        ColumnType::Link,
        ColumnType::Email,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "dateTime",
            ColumnType::SingleSelect => "singleSelect",
            ColumnType::Dropdown => "dropdown",
            ColumnType::Tags => "tags",
            ColumnType::Link => "link",
            ColumnType::Email => "email",
        }
    }

    /// Label shown in the column type picker.
    pub const fn label(&self) -> &'static str {
        match self {
            ColumnType::Text => "Text",
            ColumnType::Number => "Number",
            ColumnType::Boolean => "Check",
            ColumnType::Date => "Date",
            ColumnType::DateTime => "Date Time",
            ColumnType::SingleSelect => "Single Select",
            ColumnType::Dropdown => "Dropdown",
            ColumnType::Tags => "Tags",
            ColumnType::Link => "Link",
            ColumnType::Email => "Email",
        }
    }

    /// Select kinds only accept values from their choice list, which must be non-empty.
    #[inline]
    pub fn is_select(&self) -> bool {
        matches!(self, ColumnType::SingleSelect | ColumnType::Dropdown)
    }

    /// Types that keep a choice list (closed for selects, a suggestion vocabulary for tags).
    #[inline]
    pub fn uses_choices(&self) -> bool {
        self.is_select() || matches!(self, ColumnType::Tags)
    }

    /// Canonical default for a new cell of this type.
    ///
    /// `now` is the instant of the mutation creating the cell, so every cell
    /// backfilled by one operation gets the same date.
    pub fn default_value(
        &self,
        choices: &[String],
        settings: &TableSettings,
        now: DateTime<Utc>,
    ) -> CellValue {
        match self {
            ColumnType::Text => CellValue::Text(String::new()),
            ColumnType::Number => CellValue::Number(0.0),
            ColumnType::Boolean => CellValue::Bool(false),
            ColumnType::Date => CellValue::Date(now.date_naive()),
            ColumnType::DateTime => CellValue::DateTime(now),
            ColumnType::SingleSelect | ColumnType::Dropdown => {
                CellValue::Choice(choices.first().cloned().unwrap_or_default())
            }
            ColumnType::Tags => CellValue::Tags(Vec::new()),
            ColumnType::Link => CellValue::Link(settings.link_default.clone()),
            ColumnType::Email => CellValue::Email(String::new()),
        }
    }

    /// Coerce an editor input into a stored value of this type.
    ///
    /// `current` is the cell's present value; only `EditInput::Toggle` reads it.
    pub fn coerce(
        &self,
        choices: &[String],
        settings: &TableSettings,
        current: Option<&CellValue>,
        input: EditInput,
    ) -> Result<CellValue, CoercionError> {
        match (self, input) {
            (ColumnType::Text, EditInput::Text(s)) => Ok(CellValue::Text(s)),
            (ColumnType::Link, EditInput::Text(s)) => Ok(CellValue::Link(s)),
            (ColumnType::Email, EditInput::Text(s)) => Ok(CellValue::Email(s)),

            (ColumnType::Number, EditInput::Number(n)) if n.is_finite() => Ok(CellValue::Number(n)),
            (ColumnType::Number, EditInput::Number(n)) => Err(CoercionError::NotANumber(n.to_string())),
            (ColumnType::Number, EditInput::Text(s)) => parse_number(&s)
                .map(CellValue::Number)
                .ok_or(CoercionError::NotANumber(s)),

            (ColumnType::Boolean, EditInput::Bool(b)) => Ok(CellValue::Bool(b)),
            (ColumnType::Boolean, EditInput::Toggle) => {
                let on = current.and_then(CellValue::as_bool).unwrap_or(false);
                Ok(CellValue::Bool(!on))
            }
            (ColumnType::Boolean, EditInput::Text(s)) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("true") {
                    Ok(CellValue::Bool(true))
                } else if t.eq_ignore_ascii_case("false") {
                    Ok(CellValue::Bool(false))
                } else {
                    Err(CoercionError::NotABoolean(s))
                }
            }

            (ColumnType::Date, EditInput::Date(d)) => Ok(CellValue::Date(d)),
            (ColumnType::Date, EditInput::DateTime(dt)) => Ok(CellValue::Date(dt.date_naive())),
            (ColumnType::Date, EditInput::Text(s)) => parse_date(&s)
                .map(CellValue::Date)
                .ok_or(CoercionError::NotADate(s)),

            (ColumnType::DateTime, EditInput::DateTime(dt)) => Ok(CellValue::DateTime(dt)),
            (ColumnType::DateTime, EditInput::Date(d)) => {
                Ok(CellValue::DateTime(d.and_time(NaiveTime::MIN).and_utc()))
            }
            (ColumnType::DateTime, EditInput::Text(s)) => parse_datetime(&s)
                .map(CellValue::DateTime)
                .ok_or(CoercionError::NotADate(s)),

            (ColumnType::SingleSelect | ColumnType::Dropdown, EditInput::Text(s)) => {
                match find_choice(choices, &s, settings.case_sensitive_choices) {
                    Some(choice) => Ok(CellValue::Choice(choice.clone())),
                    None => Err(CoercionError::NotAChoice(s)),
                }
            }

            (ColumnType::Tags, EditInput::Tags(tags)) => Ok(CellValue::Tags(normalize_tags(tags))),
            (ColumnType::Tags, EditInput::Text(s)) => {
                let parts = s
                    .split(settings.tag_split_separator())
                    .map(str::to_string)
                    .collect();
                Ok(CellValue::Tags(normalize_tags(parts)))
            }

            (expected, input) => Err(CoercionError::WrongInput {
                expected: *expected,
                got: input.kind(),
            }),
        }
    }
}

impl ColumnType {
    /// Bring an already-typed value into the form `coerce` would store:
    /// choices take the list's own spelling, tags are trimmed and deduplicated.
    pub fn canonicalize(
        &self,
        choices: &[String],
        settings: &TableSettings,
        value: CellValue,
    ) -> Result<CellValue, CoercionError> {
        match value {
            CellValue::Choice(s) if self.is_select() => {
                match find_choice(choices, &s, settings.case_sensitive_choices) {
                    Some(choice) => Ok(CellValue::Choice(choice.clone())),
                    None => Err(CoercionError::NotAChoice(s)),
                }
            }
            CellValue::Tags(tags) => Ok(CellValue::Tags(normalize_tags(tags))),
            other => Ok(other),
        }
    }
}

/// Find the choice matching `input` (trimmed).
pub fn find_choice<'a>(choices: &'a [String], input: &str, case_sensitive: bool) -> Option<&'a String> {
    let trimmed = input.trim();
    if case_sensitive {
        choices.iter().find(|c| c.as_str() == trimmed)
    } else {
        choices.iter().find(|c| c.to_lowercase() == trimmed.to_lowercase())
    }
}

/// Trim labels, drop blanks, keep the first occurrence of duplicates.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// A stored cell value. The variant always matches the column's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Choice(String),
    Tags(Vec<String>),
    Link(String),
    Email(String),
}

impl CellValue {
    /// True if this value is the stored kind for `column_type`.
    pub fn matches(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (CellValue::Text(_), ColumnType::Text)
                | (CellValue::Number(_), ColumnType::Number)
                | (CellValue::Bool(_), ColumnType::Boolean)
                | (CellValue::Date(_), ColumnType::Date)
                | (CellValue::DateTime(_), ColumnType::DateTime)
                | (CellValue::Choice(_), ColumnType::SingleSelect | ColumnType::Dropdown)
                | (CellValue::Tags(_), ColumnType::Tags)
                | (CellValue::Link(_), ColumnType::Link)
                | (CellValue::Email(_), ColumnType::Email)
        )
    }

    /// Display string for the grid.
    pub fn display(&self, tag_separator: &str) -> String {
        match self {
            CellValue::Text(s) | CellValue::Choice(s) | CellValue::Link(s) | CellValue::Email(s) => {
                s.clone()
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            CellValue::Tags(tags) => tags.join(tag_separator),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

}

/// Raw input from a cell editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditInput {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Flip a checkbox.
    Toggle,
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Tags(Vec<String>),
}

impl EditInput {
    pub const fn kind(&self) -> &'static str {
        match self {
            EditInput::Text(_) => "text",
            EditInput::Number(_) => "number",
            EditInput::Bool(_) => "boolean",
            EditInput::Toggle => "toggle",
            EditInput::Date(_) => "date",
            EditInput::DateTime(_) => "date-time",
            EditInput::Tags(_) => "tags",
        }
    }
}

impl From<&str> for EditInput {
    fn from(s: &str) -> Self {
        EditInput::Text(s.to_string())
    }
}

impl From<String> for EditInput {
    fn from(s: String) -> Self {
        EditInput::Text(s)
    }
}

impl From<f64> for EditInput {
    fn from(n: f64) -> Self {
        EditInput::Number(n)
    }
}

impl From<bool> for EditInput {
    fn from(b: bool) -> Self {
        EditInput::Bool(b)
    }
}

impl From<NaiveDate> for EditInput {
    fn from(d: NaiveDate) -> Self {
        EditInput::Date(d)
    }
}

impl From<DateTime<Utc>> for EditInput {
    fn from(dt: DateTime<Utc>) -> Self {
        EditInput::DateTime(dt)
    }
}

impl From<Vec<String>> for EditInput {
    fn from(tags: Vec<String>) -> Self {
        EditInput::Tags(tags)
    }
}

/// Why an input could not be stored.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionError {
    NotANumber(String),
    NotABoolean(String),
    NotADate(String),
    /// Value is not one of the column's choices.
    NotAChoice(String),
    /// The input kind has no meaning for this column type.
    WrongInput { expected: ColumnType, got: &'static str },
}

impl std::fmt::Display for CoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoercionError::NotANumber(s) => write!(f, "'{}' is not a valid number", s),
            CoercionError::NotABoolean(s) => write!(f, "'{}' is not true or false", s),
            CoercionError::NotADate(s) => write!(f, "'{}' is not a valid date", s),
            CoercionError::NotAChoice(s) => write!(f, "'{}' is not one of the allowed values", s),
            CoercionError::WrongInput { expected, got } => {
                write!(f, "{} input cannot be stored in a {} column", got, expected.as_str())
            }
        }
    }
}

impl std::error::Error for CoercionError {}
