//! Character set translation between byte streams and text.
//!
//! The codec operates on characters; charset translation happens exactly once
//! at each boundary: decode on unmarshal input, encode on marshal output.

use crate::error::CharsetError;

/// Supported character sets.
///
/// UTF-8 is the default. Latin-1 and US-ASCII cover the legacy feeds that
/// spreadsheet exports and older integration partners still produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// UTF-8 (default).
    #[default]
    Utf8,
    /// ISO-8859-1, a 1:1 mapping between bytes and U+0000..U+00FF.
    Latin1,
    /// US-ASCII, bytes 0x00..0x7F only.
    Ascii,
}

impl Charset {
    /// Resolve a charset from a label such as `utf-8` or `ISO-8859-1`.
    ///
    /// Labels are matched case-insensitively and cover the common aliases.
    pub fn from_label(label: &str) -> Result<Self, CharsetError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" => Ok(Charset::Latin1),
            "us-ascii" | "ascii" => Ok(Charset::Ascii),
            _ => Err(CharsetError::UnknownLabel(label.to_string())),
        }
    }

    /// The canonical name, suitable for a `charset=` media type parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "iso-8859-1",
            Charset::Ascii => "us-ascii",
        }
    }

    /// Decode bytes into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, CharsetError> {
        match self {
            Charset::Utf8 => match std::str::from_utf8(bytes) {
                Ok(s) => Ok(s.to_string()),
                Err(e) => Err(CharsetError::InvalidByte {
                    charset: self.name(),
                    offset: e.valid_up_to(),
                }),
            },
            Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Charset::Ascii => {
                if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(CharsetError::InvalidByte {
                        charset: self.name(),
                        offset,
                    });
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
        }
    }

    /// Encode text into bytes.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, CharsetError> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(ch as u32).map_err(|_| CharsetError::Unencodable {
                        charset: self.name(),
                        ch,
                    })
                })
                .collect(),
            Charset::Ascii => text
                .chars()
                .map(|ch| {
                    if ch.is_ascii() {
                        Ok(ch as u8)
                    } else {
                        Err(CharsetError::Unencodable {
                            charset: self.name(),
                            ch,
                        })
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_aliases() {
        assert_eq!(Charset::from_label("UTF-8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::from_label("utf8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::from_label("latin1").unwrap(), Charset::Latin1);
        assert_eq!(Charset::from_label(" ISO-8859-1 ").unwrap(), Charset::Latin1);
        assert_eq!(Charset::from_label("us-ascii").unwrap(), Charset::Ascii);
        assert!(Charset::from_label("utf-16").is_err());
    }

    #[test]
    fn test_utf8_round_trip() {
        let text = "héllo, wörld";
        let bytes = Charset::Utf8.encode(text).unwrap();
        assert_eq!(Charset::Utf8.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn test_utf8_invalid_bytes() {
        let err = Charset::Utf8.decode(&[b'a', 0xff, 0xfe]).unwrap_err();
        match err {
            CharsetError::InvalidByte { offset, .. } => assert_eq!(offset, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_latin1_round_trip() {
        let text = "caf\u{e9}";
        let bytes = Charset::Latin1.encode(text).unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(Charset::Latin1.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn test_latin1_unencodable() {
        assert!(Charset::Latin1.encode("snowman \u{2603}").is_err());
    }

    #[test]
    fn test_ascii_rejects_high_bytes() {
        assert!(Charset::Ascii.decode(&[0x80]).is_err());
        assert!(Charset::Ascii.encode("é").is_err());
        assert_eq!(Charset::Ascii.decode(b"plain").unwrap(), "plain");
    }

    #[test]
    fn test_default_is_utf8() {
        assert_eq!(Charset::default(), Charset::Utf8);
    }
}
