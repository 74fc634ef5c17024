//! Text encodings accepted by file handlers
//!
//! Labels resolve through the WHATWG label table of `encoding_rs`, so
//! `cp1252`, `iso-8859-15`, `shift_jis`, `utf-16` and the usual aliases all
//! work. Text that the encoding cannot represent is an error, never replaced.

use std::borrow::Cow;

use encoding_rs::{EncoderResult, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{LoggerError, LoggerResult};

/// Output encoding of a log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding(&'static encoding_rs::Encoding);

impl Default for Encoding {
    fn default() -> Self {
        Encoding(UTF_8)
    }
}

impl Encoding {
    /// Resolve an encoding label (case-insensitive; `latin_1`, `utf_8` and
    /// similar underscore/hyphen spellings are accepted too)
    pub fn lookup(label: &str) -> LoggerResult<Self> {
        let trimmed = label.trim();
        let hyphenated = trimmed.replace('_', "-");
        let compact: String = trimmed.chars().filter(|c| !matches!(c, '-' | '_')).collect();

        let result = [trimmed, hyphenated.as_str(), compact.as_str()]
            .into_iter()
            .find_map(|candidate| encoding_rs::Encoding::for_label(candidate.as_bytes()))
            // `replacement` decodes only and has nothing to write with
            .filter(|&encoding| encoding.output_encoding() == encoding || is_utf16(encoding))
            .map(Encoding)
            .ok_or_else(|| LoggerError::UnsupportedEncoding(label.to_string()));
        result
    }

    /// Canonical name, e.g. `UTF-8`, `windows-1252`, `Shift_JIS`
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Encode text, failing on the first character the encoding cannot represent
    pub fn encode<'a>(self, text: &'a str) -> LoggerResult<Cow<'a, [u8]>> {
        if self.0 == UTF_8 || (self.0.is_ascii_compatible() && text.is_ascii()) {
            return Ok(Cow::Borrowed(text.as_bytes()));
        }
        if self.0 == UTF_16LE {
            return Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect()));
        }
        if self.0 == UTF_16BE {
            return Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect()));
        }

        let mut encoder = self.0.new_encoder();
        let capacity = encoder
            .max_buffer_length_from_utf8_without_replacement(text.len())
            .unwrap_or(text.len());
        let mut out = vec![0u8; capacity];
        let (mut read, mut written) = (0, 0);
        loop {
            let (result, r, w) = encoder.encode_from_utf8_without_replacement(
                &text[read..],
                &mut out[written..],
                true,
            );
            read += r;
            written += w;
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => out.resize(out.len() * 2 + 16, 0),
                EncoderResult::Unmappable(character) => {
                    return Err(LoggerError::Unencodable {
                        encoding: self.name().to_string(),
                        character,
                    });
                }
            }
        }
        out.truncate(written);
        Ok(Cow::Owned(out))
    }
}

fn is_utf16(encoding: &'static encoding_rs::Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_aliases() {
        assert_eq!(Encoding::lookup("UTF-8").unwrap(), Encoding::default());
        assert_eq!(Encoding::lookup("utf_8").unwrap(), Encoding::default());
        assert_eq!(Encoding::lookup("latin-1").unwrap().name(), "windows-1252");
        assert_eq!(Encoding::lookup("cp1252").unwrap().name(), "windows-1252");
        assert_eq!(Encoding::lookup("iso-8859-15").unwrap().name(), "ISO-8859-15");
        assert_eq!(Encoding::lookup("shift_jis").unwrap().name(), "Shift_JIS");
        assert_eq!(Encoding::lookup("utf-16").unwrap().name(), "UTF-16LE");
        assert_eq!(Encoding::lookup("UTF-16BE").unwrap().name(), "UTF-16BE");
    }

    #[test]
    fn test_lookup_rejects_unknown_and_decode_only() {
        for label in ["klingon", "utf-99", "iso-2022-kr", ""] {
            assert!(
                matches!(Encoding::lookup(label), Err(LoggerError::UnsupportedEncoding(_))),
                "{label}"
            );
        }
    }

    #[test]
    fn test_encode() {
        let utf8 = Encoding::default();
        assert_eq!(utf8.encode("héllo").unwrap().as_ref(), "héllo".as_bytes());

        let cp1252 = Encoding::lookup("cp1252").unwrap();
        assert_eq!(cp1252.encode("café €").unwrap().as_ref(), b"caf\xe9 \x80");

        let latin9 = Encoding::lookup("iso-8859-15").unwrap();
        assert_eq!(latin9.encode("€").unwrap().as_ref(), b"\xa4");

        let sjis = Encoding::lookup("shift_jis").unwrap();
        assert_eq!(sjis.encode("日本").unwrap().as_ref(), b"\x93\xfa\x96\x7b");

        let utf16 = Encoding::lookup("utf-16").unwrap();
        assert_eq!(utf16.encode("hi").unwrap().as_ref(), b"h\0i\0");
        let utf16be = Encoding::lookup("utf-16be").unwrap();
        assert_eq!(utf16be.encode("hi").unwrap().as_ref(), b"\0h\0i");
    }

    #[test]
    fn test_unmappable_character_is_an_error() {
        let cp1252 = Encoding::lookup("cp1252").unwrap();
        match cp1252.encode("price: 日本") {
            Err(LoggerError::Unencodable { encoding, character }) => {
                assert_eq!(encoding, "windows-1252");
                assert_eq!(character, '日');
            }
            other => panic!("expected Unencodable, got {other:?}"),
        }
    }
}
