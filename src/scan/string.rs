use crate::codepoint::{decode, BAD_ENCODING, INPUT_TOO_LARGE};
use crate::error::{Error, ErrorKind};
use crate::scan::keyword::scan_unicode_escape;
use crate::span::Span;

fn is_surrogate_high(cp: u32) -> bool {
    (0xD800..=0xDBFF).contains(&cp)
}
fn is_surrogate_low(cp: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&cp)
}

/// Validate a string lexeme starting at `at` (the opening quote). Does not
/// materialise the unescaped value -- see `stringify` for that.
///
/// Returns the full lexeme span (including both quotes) and the cursor just
/// past the closing quote.
pub(crate) fn scan_string(src: &[u8], terminated: bool, at: u32, json5: bool) -> Result<(Span, u32), Error> {
    let quote = src[at as usize];
    debug_assert!(quote == b'"' || (json5 && quote == b'\''));
    let mut cursor = at + 1;
    let mut pending_high_surrogate: Option<u32> = None;

    loop {
        let (cp, consumed) = decode(src, cursor, terminated);
        if consumed == 0 {
            if cp == BAD_ENCODING {
                return Err(Error::new(
                    ErrorKind::IllegalByteSequence,
                    Span::empty_at(cursor),
                    "malformed encoded character",
                ));
            }
            if cp == INPUT_TOO_LARGE {
                return Err(Error::new(
                    ErrorKind::InputTooLarge,
                    Span::empty_at(cursor),
                    "input too large",
                ));
            }
            // EOF before the closing quote. The reference implementation's
            // actual behavior (not its prose) emits a 1-byte span at the
            // opening quote; see DESIGN.md.
            return Err(Error::new(
                ErrorKind::BadSyntax,
                Span::new(at, 1),
                "unclosed string",
            ));
        }

        if cp == quote as u32 {
            if pending_high_surrogate.is_some() {
                return Err(Error::new(
                    ErrorKind::BadSyntax,
                    Span::new(at, cursor - at),
                    "unmatched surrogate pair",
                ));
            }
            cursor += consumed;
            return Ok((Span::new(at, cursor - at), cursor));
        }

        if cp <= 0x1F {
            return Err(Error::new(
                ErrorKind::BadSyntax,
                Span::new(cursor, consumed),
                "unescaped control character",
            ));
        }

        if cp == b'\\' as u32 {
            let escape_start = cursor;
            let (marker, marker_consumed) = decode(src, cursor + consumed, terminated);
            if marker_consumed == 0 {
                return Err(Error::new(ErrorKind::BadSyntax, Span::new(at, 1), "unclosed string"));
            }
            let after_marker = cursor + consumed + marker_consumed;

            match marker as u8 as u32 {
                _ if marker == b'"' as u32 || marker == b'\\' as u32 || marker == b'/' as u32
                    || marker == b'b' as u32 || marker == b'f' as u32 || marker == b'n' as u32
                    || marker == b'r' as u32 || marker == b't' as u32 =>
                {
                    if pending_high_surrogate.is_some() {
                        return Err(Error::new(
                            ErrorKind::BadSyntax,
                            Span::new(escape_start, after_marker - escape_start),
                            "unmatched surrogate pair",
                        ));
                    }
                    cursor = after_marker;
                }
                _ if marker == b'u' as u32 => {
                    let cp_value = scan_unicode_escape(src, terminated, cursor + consumed)?;
                    let escape_end = escape_start + 6;
                    if let Some(high) = pending_high_surrogate {
                        if !is_surrogate_low(cp_value) {
                            return Err(Error::new(
                                ErrorKind::BadSyntax,
                                Span::new(escape_start, escape_end - escape_start),
                                "unmatched surrogate pair",
                            ));
                        }
                        let _ = high;
                        pending_high_surrogate = None;
                        cursor = escape_end;
                    } else if is_surrogate_high(cp_value) {
                        pending_high_surrogate = Some(cp_value);
                        cursor = escape_end;
                    } else if is_surrogate_low(cp_value) {
                        return Err(Error::new(
                            ErrorKind::BadSyntax,
                            Span::new(escape_start, escape_end - escape_start),
                            "unmatched surrogate pair",
                        ));
                    } else {
                        cursor = escape_end;
                    }
                }
                _ if json5 && (marker == b'\'' as u32 || marker == b'v' as u32 || marker == b'0' as u32) => {
                    if pending_high_surrogate.is_some() {
                        return Err(Error::new(
                            ErrorKind::BadSyntax,
                            Span::new(escape_start, after_marker - escape_start),
                            "unmatched surrogate pair",
                        ));
                    }
                    cursor = after_marker;
                }
                _ if json5 && marker == b'x' as u32 => {
                    if pending_high_surrogate.is_some() {
                        return Err(Error::new(
                            ErrorKind::BadSyntax,
                            Span::new(escape_start, after_marker - escape_start),
                            "unmatched surrogate pair",
                        ));
                    }
                    let hex_start = after_marker;
                    if hex_start + 2 > src.len() as u32
                        || !crate::classify::is_hex_digit(src[hex_start as usize] as u32)
                        || !crate::classify::is_hex_digit(src[hex_start as usize + 1] as u32)
                    {
                        return Err(Error::new(
                            ErrorKind::BadSyntax,
                            Span::new(escape_start, after_marker - escape_start),
                            "invalid escape sequence",
                        ));
                    }
                    cursor = hex_start + 2;
                }
                _ if json5 && matches!(marker, 0x0A | 0x0D | 0x2028 | 0x2029) => {
                    if pending_high_surrogate.is_some() {
                        return Err(Error::new(
                            ErrorKind::BadSyntax,
                            Span::new(escape_start, after_marker - escape_start),
                            "unmatched surrogate pair",
                        ));
                    }
                    if marker == 0x0D {
                        let (next_cp, next_consumed) = decode(src, after_marker, terminated);
                        if next_consumed != 0 && next_cp == 0x0A {
                            cursor = after_marker + next_consumed;
                            continue;
                        }
                    }
                    cursor = after_marker;
                }
                _ => {
                    return Err(Error::new(
                        ErrorKind::BadSyntax,
                        Span::new(escape_start, after_marker - escape_start),
                        "invalid escape sequence",
                    ));
                }
            }
            continue;
        }

        if pending_high_surrogate.is_some() {
            return Err(Error::new(
                ErrorKind::BadSyntax,
                Span::new(cursor, consumed),
                "unmatched surrogate pair",
            ));
        }

        cursor += consumed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_plain_string() {
        let (span, next) = scan_string(br#""hello","#, false, 0, false).unwrap();
        assert_eq!(span, Span::new(0, 7));
        assert_eq!(next, 7);
    }

    #[test]
    fn rejects_control_character() {
        let src = b"\"a\nb\"";
        assert!(scan_string(src, false, 0, false).is_err());
    }

    #[test]
    fn unclosed_string_spans_opening_quote_only() {
        let err = scan_string(br#""abc"#, false, 0, false).unwrap_err();
        assert_eq!(err.span, Span::new(0, 1));
        assert_eq!(err.message, "unclosed string");
    }

    #[test]
    fn surrogate_pair_escape_matches() {
        let src = b"\"\\uD834\\uDD1E\",";
        let (span, next) = scan_string(src, false, 0, false).unwrap();
        assert_eq!(span, Span::new(0, 14));
        assert_eq!(next, 14);
    }

    #[test]
    fn lone_high_surrogate_errors() {
        let err = scan_string(br#""\uD834","#, false, 0, false).unwrap_err();
        assert_eq!(err.message, "unmatched surrogate pair");
    }

    #[test]
    fn json5_allows_single_quotes() {
        let (span, next) = scan_string(b"'hi',", false, 0, true).unwrap();
        assert_eq!(span, Span::new(0, 4));
        assert_eq!(next, 4);
    }

    #[test]
    fn json5_line_continuation_is_silent() {
        let (span, next) = scan_string(b"\"a\\\nb\",", false, 0, true).unwrap();
        assert_eq!(next, 6);
        assert_eq!(span, Span::new(0, 6));
    }
}
