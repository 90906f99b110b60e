//! Content negotiation: deciding whether CSV applies and with which options.
//!
//! Pure functions over declared/accepted content types and transport option
//! headers. Nothing here touches the codec or any I/O.

use crate::charset::Charset;
use crate::codec::CsvOptions;

/// The content type this codec produces and consumes.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Option header carrying the field separator.
pub const FIELD_SEPARATOR_HEADER: &str = "X-CSV-Field-Separator";

/// Option header toggling the header row.
pub const USE_HEADERS_HEADER: &str = "X-CSV-Use-Headers";

/// True when a declared content type selects the CSV codec for decode.
///
/// Matching is case-insensitive and ignores media type parameters, so
/// `text/csv; charset=utf-8` matches.
pub fn is_csv_content_type(content_type: &str) -> bool {
    media_type(content_type).eq_ignore_ascii_case(CSV_CONTENT_TYPE)
}

/// True when an accepted-content-types list selects the CSV codec for encode.
pub fn accepts_csv<'a>(accepted: impl IntoIterator<Item = &'a str>) -> bool {
    accepted.into_iter().any(is_csv_content_type)
}

/// Options for a decode, or `None` when the declared content type is not CSV.
///
/// The `charset` media type parameter is honored when present and
/// recognized; an unknown charset label falls back to the default.
pub fn unmarshal_options(content_type: &str, headers: &[(String, String)]) -> Option<CsvOptions> {
    if !is_csv_content_type(content_type) {
        return None;
    }
    let mut opts = options_from_headers(headers);
    if let Some(label) = charset_param(content_type) {
        if let Ok(charset) = Charset::from_label(label) {
            opts = opts.with_charset(charset);
        }
    }
    Some(opts)
}

/// Options for an encode, or `None` when no accepted content type is CSV.
pub fn marshal_options<'a>(
    accepted: impl IntoIterator<Item = &'a str>,
    headers: &[(String, String)],
) -> Option<CsvOptions> {
    if !accepts_csv(accepted) {
        return None;
    }
    Some(options_from_headers(headers))
}

/// Build codec options from transport option headers.
///
/// Header names match case-insensitively. Absent headers leave the defaults
/// in place.
pub fn options_from_headers(headers: &[(String, String)]) -> CsvOptions {
    let mut opts = CsvOptions::default();

    if let Some(value) = header_value(headers, FIELD_SEPARATOR_HEADER) {
        // An empty header value stands in for ";": the semicolon collides
        // with header-value delimiting in the transport, so senders strip it.
        let separator = if value.is_empty() {
            ';'
        } else {
            value.chars().next().unwrap_or(',')
        };
        opts = opts.with_field_separator(separator);
    }

    if let Some(value) = header_value(headers, USE_HEADERS_HEADER) {
        opts = opts.with_use_header(value.trim() == "true");
    }

    opts
}

// Separator values are taken verbatim: a tab separator arrives as a
// whitespace-only header value and must not be trimmed away.
fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// The media type with parameters stripped.
fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// The `charset=` parameter value, if present.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_content_type_matching() {
        assert!(is_csv_content_type("text/csv"));
        assert!(is_csv_content_type("Text/CSV"));
        assert!(is_csv_content_type("text/csv; charset=utf-8"));
        assert!(!is_csv_content_type("application/json"));
        assert!(!is_csv_content_type("text/csv2"));
    }

    #[test]
    fn test_accept_list_matching() {
        assert!(accepts_csv(["application/json", "text/csv"]));
        assert!(!accepts_csv(["application/json", "text/xml"]));
        assert!(!accepts_csv([]));
    }

    #[test]
    fn test_default_options_without_headers() {
        let opts = options_from_headers(&[]);
        assert_eq!(opts, CsvOptions::default());
    }

    #[test]
    fn test_separator_header() {
        let opts = options_from_headers(&headers(&[("X-CSV-Field-Separator", "\t")]));
        assert_eq!(opts.field_separator, '\t');
    }

    #[test]
    fn test_empty_separator_means_semicolon() {
        let opts = options_from_headers(&headers(&[("X-CSV-Field-Separator", "")]));
        assert_eq!(opts.field_separator, ';');
    }

    #[test]
    fn test_use_headers_header() {
        let opts = options_from_headers(&headers(&[("X-CSV-Use-Headers", "false")]));
        assert!(!opts.use_header);

        // Only the literal "true" enables headers.
        let opts = options_from_headers(&headers(&[("X-CSV-Use-Headers", "TRUE")]));
        assert!(!opts.use_header);

        let opts = options_from_headers(&headers(&[("X-CSV-Use-Headers", "true")]));
        assert!(opts.use_header);
    }

    #[test]
    fn test_header_names_case_insensitive() {
        let opts = options_from_headers(&headers(&[("x-csv-use-headers", "false")]));
        assert!(!opts.use_header);
    }

    #[test]
    fn test_unmarshal_options_rejects_other_types() {
        assert!(unmarshal_options("application/json", &[]).is_none());
        assert!(unmarshal_options("text/csv", &[]).is_some());
    }

    #[test]
    fn test_unmarshal_options_charset_param() {
        let opts = unmarshal_options("text/csv; charset=iso-8859-1", &[]).unwrap();
        assert_eq!(opts.charset, crate::charset::Charset::Latin1);

        // Unknown labels fall back to the default.
        let opts = unmarshal_options("text/csv; charset=klingon", &[]).unwrap();
        assert_eq!(opts.charset, crate::charset::Charset::Utf8);
    }

    #[test]
    fn test_marshal_options_requires_accepted_csv() {
        assert!(marshal_options(["application/json"], &[]).is_none());
        let opts = marshal_options(
            ["text/csv"],
            &headers(&[("X-CSV-Field-Separator", "")]),
        )
        .unwrap();
        assert_eq!(opts.field_separator, ';');
    }
}
