//! CSV codec: options, streaming decode, and encode.

pub mod decode;
pub mod encode;

pub use decode::{decode, Decoder};
pub use encode::{encode, Encoder};

use crate::charset::Charset;

/// Codec configuration.
///
/// Every option has a default, so an all-default configuration is always a
/// valid codec. Options are per call: construct, pass in, discard.
///
/// # Example
/// ```
/// use csvbind::codec::CsvOptions;
///
/// let opts = CsvOptions::new()
///     .with_field_separator(';')
///     .with_trim(true);
/// assert_eq!(opts.field_separator, ';');
/// assert!(opts.use_header);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// Field separator character (default `,`).
    pub field_separator: char,
    /// Record separator string (default `"\n"`; when it is `"\n"`, a CRLF in
    /// the input is also accepted as a record boundary on decode).
    pub record_separator: String,
    /// Quote character (default `"`).
    pub quote: char,
    /// Whether the first record is a header row (default true).
    pub use_header: bool,
    /// Whether the header row must match the record type exactly
    /// (default false). Only meaningful when `use_header` is set.
    pub validate_header: bool,
    /// Whether to trim surrounding whitespace from field text before type
    /// coercion (default false; decode only).
    pub trim: bool,
    /// Whether to strip the leading-quote artifact some spreadsheet tools
    /// emit: a cell that is a lone quote character followed by the value,
    /// with no closing quote (default false; decode only).
    pub strip_excel_leading_quote: bool,
    /// Character set of the byte stream (default UTF-8).
    pub charset: Charset,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            field_separator: ',',
            record_separator: "\n".to_string(),
            quote: '"',
            use_header: true,
            validate_header: false,
            trim: false,
            strip_excel_leading_quote: false,
            charset: Charset::Utf8,
        }
    }
}

impl CsvOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field separator.
    pub fn with_field_separator(mut self, separator: char) -> Self {
        self.field_separator = separator;
        self
    }

    /// Set the record separator.
    pub fn with_record_separator(mut self, separator: impl Into<String>) -> Self {
        self.record_separator = separator.into();
        self
    }

    /// Set the quote character.
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Set whether the first record is a header row.
    pub fn with_use_header(mut self, use_header: bool) -> Self {
        self.use_header = use_header;
        self
    }

    /// Set whether the header row is validated against the record type.
    pub fn with_validate_header(mut self, validate: bool) -> Self {
        self.validate_header = validate;
        self
    }

    /// Set whether decoded field text is trimmed before coercion.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Set whether the spreadsheet leading-quote artifact is stripped.
    pub fn with_strip_excel_leading_quote(mut self, strip: bool) -> Self {
        self.strip_excel_leading_quote = strip;
        self
    }

    /// Set the charset.
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = CsvOptions::default();
        assert_eq!(opts.field_separator, ',');
        assert_eq!(opts.record_separator, "\n");
        assert_eq!(opts.quote, '"');
        assert!(opts.use_header);
        assert!(!opts.validate_header);
        assert!(!opts.trim);
        assert!(!opts.strip_excel_leading_quote);
        assert_eq!(opts.charset, Charset::Utf8);
    }

    #[test]
    fn test_builder_chain() {
        let opts = CsvOptions::new()
            .with_field_separator('\t')
            .with_record_separator("\r\n")
            .with_quote('\'')
            .with_use_header(false)
            .with_validate_header(true)
            .with_trim(true)
            .with_strip_excel_leading_quote(true)
            .with_charset(Charset::Latin1);

        assert_eq!(opts.field_separator, '\t');
        assert_eq!(opts.record_separator, "\r\n");
        assert_eq!(opts.quote, '\'');
        assert!(!opts.use_header);
        assert!(opts.validate_header);
        assert!(opts.trim);
        assert!(opts.strip_excel_leading_quote);
        assert_eq!(opts.charset, Charset::Latin1);
    }
}
