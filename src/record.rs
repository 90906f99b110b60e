//! Materialized records and field values.
//!
//! A [`Record`] is a decoded row: field name to [`Value`] pairs in the
//! declared field order of its record type. Records are produced by decode
//! and consumed by encode; they carry no reference back to the schema.

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (empty cell for an optional field).
    Null,
    /// Text value.
    String(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// Calendar date.
    Date(Date),
}

impl Value {
    /// True when the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value as raw CSV cell text, before any quoting.
    ///
    /// Null renders as the empty cell, which is what decode turns back into
    /// null for optional fields.
    pub fn to_field_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.to_string(),
        }
    }
}

/// An ISO-8601 calendar date (no time zone, no time of day).
///
/// CSV feeds carry dates as `YYYY-MM-DD` text; this keeps the parsed
/// components so consumers don't re-parse and so invalid dates such as
/// `2023-02-30` are rejected during coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Construct a date, rejecting out-of-range components.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, String> {
        if month == 0 || month > 12 {
            return Err(format!("month {month} out of range"));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(format!("day {day} out of range for {year}-{month:02}"));
        }
        Ok(Self { year, month, day })
    }

    /// Parse a `YYYY-MM-DD` string.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut parts = text.splitn(3, '-');
        let (y, m, d) = match (parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(m), Some(d)) => (y, m, d),
            _ => return Err(format!("expected YYYY-MM-DD, got {text:?}")),
        };
        if m.len() != 2 || d.len() != 2 {
            return Err(format!("expected YYYY-MM-DD, got {text:?}"));
        }
        let year: i32 = y
            .parse()
            .map_err(|_| format!("invalid year in {text:?}"))?;
        let month: u8 = m
            .parse()
            .map_err(|_| format!("invalid month in {text:?}"))?;
        let day: u8 = d.parse().map_err(|_| format!("invalid day in {text:?}"))?;
        Self::new(year, month, day)
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// A materialized row: ordered field name/value pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from ordered pairs.
    pub fn from_pairs(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Append a field value. Order of insertion is the record's field order.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parse_valid() {
        let d = Date::parse("2023-07-09").unwrap();
        assert_eq!((d.year, d.month, d.day), (2023, 7, 9));
        assert_eq!(d.to_string(), "2023-07-09");
    }

    #[test]
    fn test_date_parse_rejects_bad_shapes() {
        assert!(Date::parse("2023/07/09").is_err());
        assert!(Date::parse("2023-7-9").is_err());
        assert!(Date::parse("not-a-date").is_err());
        assert!(Date::parse("2023-13-01").is_err());
        assert!(Date::parse("2023-02-30").is_err());
    }

    #[test]
    fn test_date_leap_years() {
        assert!(Date::parse("2024-02-29").is_ok());
        assert!(Date::parse("2023-02-29").is_err());
        assert!(Date::parse("2000-02-29").is_ok());
        assert!(Date::parse("1900-02-29").is_err());
    }

    #[test]
    fn test_value_field_text() {
        assert_eq!(Value::Null.to_field_text(), "");
        assert_eq!(Value::String("a,b".into()).to_field_text(), "a,b");
        assert_eq!(Value::Integer(-42).to_field_text(), "-42");
        assert_eq!(Value::Boolean(true).to_field_text(), "true");
        assert_eq!(
            Value::Date(Date::parse("1999-12-31").unwrap()).to_field_text(),
            "1999-12-31"
        );
    }

    #[test]
    fn test_record_order_and_lookup() {
        let mut rec = Record::new();
        rec.push("b", Value::Integer(2));
        rec.push("a", Value::Integer(1));

        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get("a"), Some(&Value::Integer(1)));
        assert_eq!(rec.get("missing"), None);

        let names: Vec<&str> = rec.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
