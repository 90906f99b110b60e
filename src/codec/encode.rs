//! CSV encode: typed records to bytes.
//!
//! [`Encoder`] produces one charset-encoded chunk per row, which lets the
//! sink router stream rows into a destination without building the whole
//! document in memory. [`encode`] is the buffered convenience path.
//!
//! Trim and the spreadsheet leading-quote option are decode-only and never
//! apply here. A write failure mid-stream leaves the destination in an
//! undefined partial state; callers treat it as failed and discard.

use bytes::{Bytes, BytesMut};

use crate::codec::CsvOptions;
use crate::error::EncodeError;
use crate::record::Record;
use crate::schema::RecordType;

/// Encode records into a single buffer.
pub fn encode(
    records: &[Record],
    record_type: &RecordType,
    opts: &CsvOptions,
) -> Result<Bytes, EncodeError> {
    let encoder = Encoder::new(record_type, opts);
    let mut buf = BytesMut::new();
    if let Some(header) = encoder.header_bytes()? {
        buf.extend_from_slice(&header);
    }
    for record in records {
        buf.extend_from_slice(&encoder.record_bytes(record)?);
    }
    Ok(buf.freeze())
}

/// Row-at-a-time CSV encoder.
pub struct Encoder<'a> {
    record_type: &'a RecordType,
    opts: &'a CsvOptions,
}

impl<'a> Encoder<'a> {
    /// Create an encoder for a record type and options.
    pub fn new(record_type: &'a RecordType, opts: &'a CsvOptions) -> Self {
        Self { record_type, opts }
    }

    /// The header row as encoded bytes, or `None` when headers are disabled.
    pub fn header_bytes(&self) -> Result<Option<Vec<u8>>, EncodeError> {
        if !self.opts.use_header {
            return Ok(None);
        }
        let line = self.format_row(self.record_type.fields().iter().map(|f| f.name.clone()));
        Ok(Some(self.opts.charset.encode(&line)?))
    }

    /// One record as encoded bytes, record separator included.
    ///
    /// Values are emitted in declared field order; a field missing from the
    /// record encodes as an empty cell.
    pub fn record_bytes(&self, record: &Record) -> Result<Vec<u8>, EncodeError> {
        let line = self.format_row(self.record_type.fields().iter().map(|f| {
            record
                .get(&f.name)
                .map(|v| v.to_field_text())
                .unwrap_or_default()
        }));
        Ok(self.opts.charset.encode(&line)?)
    }

    fn format_row(&self, cells: impl Iterator<Item = String>) -> String {
        let mut line = String::new();
        for (i, cell) in cells.enumerate() {
            if i > 0 {
                line.push(self.opts.field_separator);
            }
            self.push_cell(&mut line, &cell);
        }
        line.push_str(&self.opts.record_separator);
        line
    }

    /// Append a cell, quoting when it contains the field separator, the
    /// quote character, a CR/LF, or any character of the record separator.
    fn push_cell(&self, line: &mut String, raw: &str) {
        let quote = self.opts.quote;
        let needs_quoting = raw.contains(self.opts.field_separator)
            || raw.contains(quote)
            || raw.contains('\r')
            || raw.contains('\n')
            || self.opts.record_separator.chars().any(|c| raw.contains(c));

        if !needs_quoting {
            line.push_str(raw);
            return;
        }
        line.push(quote);
        for c in raw.chars() {
            if c == quote {
                line.push(quote);
            }
            line.push(c);
        }
        line.push(quote);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Charset;
    use crate::record::Value;
    use crate::schema::{FieldKind, FieldSpec};

    fn person_type() -> RecordType {
        RecordType::new(
            "person",
            vec![
                FieldSpec::new("name", FieldKind::String),
                FieldSpec::new("age", FieldKind::Integer),
            ],
        )
        .unwrap()
    }

    fn person(name: &str, age: i64) -> Record {
        Record::from_pairs(vec![
            ("name".to_string(), Value::String(name.to_string())),
            ("age".to_string(), Value::Integer(age)),
        ])
    }

    #[test]
    fn test_encode_defaults_include_header() {
        let bytes = encode(
            &[person("alice", 30)],
            &person_type(),
            &CsvOptions::default(),
        )
        .unwrap();
        assert_eq!(&bytes[..], b"name,age\nalice,30\n");
    }

    #[test]
    fn test_encode_without_header() {
        let opts = CsvOptions::new().with_use_header(false);
        let bytes = encode(&[person("alice", 30)], &person_type(), &opts).unwrap();
        assert_eq!(&bytes[..], b"alice,30\n");
    }

    #[test]
    fn test_separator_in_value_is_quoted() {
        let bytes = encode(
            &[person("smith, alice", 30)],
            &person_type(),
            &CsvOptions::default(),
        )
        .unwrap();
        assert_eq!(&bytes[..], b"name,age\n\"smith, alice\",30\n");
    }

    #[test]
    fn test_quote_in_value_is_doubled() {
        let bytes = encode(
            &[person("say \"hi\"", 30)],
            &person_type(),
            &CsvOptions::default(),
        )
        .unwrap();
        assert_eq!(&bytes[..], b"name,age\n\"say \"\"hi\"\"\",30\n");
    }

    #[test]
    fn test_record_separator_in_value_is_quoted() {
        let bytes = encode(
            &[person("line1\nline2", 30)],
            &person_type(),
            &CsvOptions::default(),
        )
        .unwrap();
        assert_eq!(&bytes[..], b"name,age\n\"line1\nline2\",30\n");
    }

    #[test]
    fn test_missing_field_encodes_empty() {
        let record = Record::from_pairs(vec![(
            "name".to_string(),
            Value::String("alice".to_string()),
        )]);
        let bytes = encode(&[record], &person_type(), &CsvOptions::default()).unwrap();
        assert_eq!(&bytes[..], b"name,age\nalice,\n");
    }

    #[test]
    fn test_custom_separator_and_record_separator() {
        let opts = CsvOptions::new()
            .with_field_separator(';')
            .with_record_separator("\r\n");
        let bytes = encode(&[person("a;b", 1)], &person_type(), &opts).unwrap();
        assert_eq!(&bytes[..], b"name;age\r\n\"a;b\";1\r\n");
    }

    #[test]
    fn test_unencodable_charset_fails() {
        let opts = CsvOptions::new().with_charset(Charset::Ascii);
        let err = encode(&[person("café", 1)], &person_type(), &opts).unwrap_err();
        assert!(matches!(err, EncodeError::Charset(_)));
    }

    #[test]
    fn test_row_at_a_time_matches_buffered() {
        let records = [person("a", 1), person("b,c", 2)];
        let rt = person_type();
        let opts = CsvOptions::default();

        let buffered = encode(&records, &rt, &opts).unwrap();

        let encoder = Encoder::new(&rt, &opts);
        let mut streamed = Vec::new();
        if let Some(h) = encoder.header_bytes().unwrap() {
            streamed.extend_from_slice(&h);
        }
        for r in &records {
            streamed.extend_from_slice(&encoder.record_bytes(r).unwrap());
        }
        assert_eq!(&buffered[..], &streamed[..]);
    }
}
