//! Streaming CSV decode: bytes to typed records.
//!
//! [`Decoder`] tokenizes the input in a single linear pass and yields typed
//! records lazily, so windowed reads over large inputs stay bounded in
//! memory. Dropping the iterator between records cancels the decode; no
//! cleanup is required because the decoder owns nothing but its buffer.
//!
//! Quoting follows standard CSV semantics: a field beginning with the quote
//! character may contain field and record separators, and a doubled quote
//! character inside it is a literal quote. A quoted field left open at end of
//! input is malformed.

use crate::codec::CsvOptions;
use crate::error::DecodeError;
use crate::record::Record;
use crate::schema::RecordType;
use crate::window::{Window, WindowSet};

/// Decode a complete byte input into records.
///
/// Convenience wrapper that drives a [`Decoder`] to completion. Use the
/// decoder directly when lazy iteration matters.
pub fn decode(
    input: &[u8],
    record_type: &RecordType,
    opts: &CsvOptions,
    windows: &[Window],
) -> Result<Vec<Record>, DecodeError> {
    Decoder::new(input, record_type, opts, windows)?.collect()
}

/// Lazy decoder yielding `Result<Record, DecodeError>`.
///
/// Construction performs the charset decode and consumes the header row (when
/// configured); each `next()` call then tokenizes exactly one raw record.
/// After the first error the iterator is fused: partial results must not leak
/// past a failure.
pub struct Decoder<'a> {
    chars: Vec<char>,
    pos: usize,
    record_type: &'a RecordType,
    opts: CsvOptions,
    record_sep: Vec<char>,
    /// With the default "\n" separator, accept "\r\n" as a boundary too.
    crlf_alias: bool,
    windows: WindowSet,
    /// For each declared field, the source column it reads from.
    col_for_field: Vec<Option<usize>>,
    /// Absolute index of the next data row (header excluded).
    row_index: u64,
    done: bool,
}

impl<'a> Decoder<'a> {
    /// Create a decoder over a complete byte input.
    ///
    /// # Errors
    /// Fails on charset errors, on a malformed header row, and on
    /// `HeaderMismatch` when header validation is requested.
    pub fn new(
        input: &[u8],
        record_type: &'a RecordType,
        opts: &CsvOptions,
        windows: &[Window],
    ) -> Result<Self, DecodeError> {
        let text = opts.charset.decode(input)?;
        let record_sep: Vec<char> = if opts.record_separator.is_empty() {
            // An empty separator can never match; fall back to the default.
            vec!['\n']
        } else {
            opts.record_separator.chars().collect()
        };
        let crlf_alias = record_sep == ['\n'];

        let mut decoder = Self {
            chars: text.chars().collect(),
            pos: 0,
            record_type,
            opts: opts.clone(),
            record_sep,
            crlf_alias,
            windows: WindowSet::from(windows),
            col_for_field: Vec::new(),
            row_index: 0,
            done: false,
        };

        decoder.col_for_field = if decoder.opts.use_header {
            match decoder.read_raw_record()? {
                Some(header) => decoder.map_header(&header)?,
                // Empty input: no header, no rows.
                None => identity_mapping(record_type.fields().len()),
            }
        } else {
            identity_mapping(record_type.fields().len())
        };

        Ok(decoder)
    }

    /// Map header columns to declared fields.
    ///
    /// With validation on, the header must reproduce the declared names in
    /// declared order. Without validation, columns matching a declared name
    /// bind to that field and the rest bind by position.
    fn map_header(&self, header: &[String]) -> Result<Vec<Option<usize>>, DecodeError> {
        let cells: Vec<String> = header
            .iter()
            .map(|h| {
                if self.opts.trim {
                    h.trim().to_string()
                } else {
                    h.clone()
                }
            })
            .collect();

        let fields = self.record_type.fields();

        if self.opts.validate_header {
            let expected = self.record_type.field_names();
            let matches = cells.len() == fields.len()
                && cells.iter().zip(fields).all(|(cell, f)| *cell == f.name);
            if !matches {
                return Err(DecodeError::HeaderMismatch {
                    expected,
                    found: cells,
                });
            }
            return Ok(identity_mapping(fields.len()));
        }

        let mut col_for_field: Vec<Option<usize>> = vec![None; fields.len()];
        let mut col_matched = vec![false; cells.len()];
        for (col, cell) in cells.iter().enumerate() {
            if let Some(fi) = self.record_type.field_index(cell) {
                if col_for_field[fi].is_none() {
                    col_for_field[fi] = Some(col);
                    col_matched[col] = true;
                }
            }
        }
        // Unmatched columns fall back to their own position.
        for col in 0..cells.len() {
            if !col_matched[col] && col < fields.len() && col_for_field[col].is_none() {
                col_for_field[col] = Some(col);
            }
        }
        Ok(col_for_field)
    }

    /// Tokenize the next raw record, or `None` at end of input.
    fn read_raw_record(&mut self) -> Result<Option<Vec<String>>, DecodeError> {
        if self.pos >= self.chars.len() {
            return Ok(None);
        }
        let mut fields = Vec::new();
        loop {
            fields.push(self.read_field()?);
            if let Some(sep_len) = self.record_sep_len_at(self.pos) {
                self.pos += sep_len;
                break;
            }
            if self.pos >= self.chars.len() {
                break;
            }
            // Not a record boundary, not end of input: a field separator.
            self.pos += 1;
        }
        Ok(Some(fields))
    }

    fn read_field(&mut self) -> Result<String, DecodeError> {
        if self.chars.get(self.pos) == Some(&self.opts.quote) {
            if self.opts.strip_excel_leading_quote && self.is_excel_artifact() {
                let raw = self.read_unquoted();
                // Drop the lone leading quote, keep the rest verbatim.
                return Ok(raw.chars().skip(1).collect());
            }
            return self.read_quoted();
        }
        Ok(self.read_unquoted())
    }

    /// Consume until the next field separator, record separator, or EOF.
    fn read_unquoted(&mut self) -> String {
        let mut out = String::new();
        while self.pos < self.chars.len() {
            if self.chars[self.pos] == self.opts.field_separator
                || self.record_sep_len_at(self.pos).is_some()
            {
                break;
            }
            out.push(self.chars[self.pos]);
            self.pos += 1;
        }
        out
    }

    /// Consume a quoted field, starting at the opening quote.
    fn read_quoted(&mut self) -> Result<String, DecodeError> {
        self.pos += 1;
        let quote = self.opts.quote;
        let mut out = String::new();
        loop {
            match self.chars.get(self.pos) {
                None => {
                    return Err(DecodeError::MalformedRecord {
                        record_index: self.row_index,
                        message: "unterminated quoted field at end of input".to_string(),
                    })
                }
                Some(&c) if c == quote => {
                    if self.chars.get(self.pos + 1) == Some(&quote) {
                        out.push(quote);
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                        break;
                    }
                }
                Some(&c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
        // Lenient: text between the closing quote and the next separator is
        // appended verbatim rather than rejected.
        let tail = self.read_unquoted();
        out.push_str(&tail);
        Ok(out)
    }

    /// True when the cell at the cursor is the spreadsheet artifact: a lone
    /// leading quote with no closing quote anywhere in the record. The scan
    /// must not stop at a field separator; inside a properly quoted cell the
    /// separator is content and the closing quote comes after it.
    fn is_excel_artifact(&self) -> bool {
        let mut i = self.pos + 1;
        while i < self.chars.len() {
            if self.record_sep_len_at(i).is_some() {
                break;
            }
            if self.chars[i] == self.opts.quote {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Length of the record separator at position `i`, if one starts there.
    fn record_sep_len_at(&self, i: usize) -> Option<usize> {
        if self.crlf_alias
            && self.chars.get(i) == Some(&'\r')
            && self.chars.get(i + 1) == Some(&'\n')
        {
            return Some(2);
        }
        let len = self.record_sep.len();
        if i + len <= self.chars.len() && self.chars[i..i + len] == self.record_sep[..] {
            Some(len)
        } else {
            None
        }
    }

    /// Turn a raw record into a typed one, coercing each declared field.
    fn materialize(&self, index: u64, raw: &[String]) -> Result<Record, DecodeError> {
        let mut record = Record::new();
        for (fi, field) in self.record_type.fields().iter().enumerate() {
            let text = self.col_for_field[fi]
                .and_then(|col| raw.get(col))
                .map(String::as_str)
                .unwrap_or("");
            let text = if self.opts.trim { text.trim() } else { text };
            let value = field
                .coerce(text)
                .map_err(|message| DecodeError::FieldParse {
                    record_index: index,
                    field: field.name.clone(),
                    value: text.to_string(),
                    message,
                })?;
            record.push(field.name.clone(), value);
        }
        Ok(record)
    }
}

/// Field `i` reads column `i`.
fn identity_mapping(n: usize) -> Vec<Option<usize>> {
    (0..n).map(Some).collect()
}

impl Iterator for Decoder<'_> {
    type Item = Result<Record, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            // Stop scanning once no window can match further rows.
            if let Some(last) = self.windows.last_row() {
                if self.row_index > last {
                    self.done = true;
                    return None;
                }
            }
            let raw = match self.read_raw_record() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            // Blank lines are not rows.
            if raw.len() == 1 && raw[0].is_empty() {
                continue;
            }
            let index = self.row_index;
            self.row_index += 1;
            if !self.windows.contains(index) {
                continue;
            }
            return match self.materialize(index, &raw) {
                Ok(record) => Some(Ok(record)),
                Err(e) => {
                    self.done = true;
                    Some(Err(e))
                }
            };
        }
    }
}
