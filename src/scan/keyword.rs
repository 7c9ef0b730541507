use crate::classify::{is_hex_digit, is_id_continue, is_id_start, hex_value};
use crate::codepoint::decode;
use crate::error::{Error, ErrorKind};
use crate::span::Span;
use crate::token::PrimitiveToken;

#[rustfmt::skip]
const ES5_RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends",
    "finally", "for", "function", "if", "implements", "import", "in",
    "instanceof", "interface", "let", "new", "package", "private",
    "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "typeof", "try", "var", "void", "while", "with", "yield",
];

/// Scan a run of identifier characters (and, in JSON5, `\uHHHH` escapes)
/// starting at `at`, which must already be known to begin an identifier.
///
/// Classifies the result as `null`/`true`/`false`, a JSON5 `NaN`/`Infinity`
/// number literal, a JSON5 identifier, or an error (reserved word, or -- in
/// non-JSON5 dialects -- an unrecognised keyword).
pub(crate) fn scan_keyword_or_identifier(
    src: &[u8],
    terminated: bool,
    at: u32,
    json5: bool,
) -> Result<(PrimitiveToken, Span), Error> {
    let start = at;
    let mut cursor = at;
    let mut has_escape = false;
    let mut first = true;

    loop {
        if json5 && cursor < src.len() as u32 && src[cursor as usize] == b'\\' {
            let escape_start = cursor;
            let cp = scan_unicode_escape(src, terminated, cursor + 1)?;
            let ok = if first {
                is_id_start(cp, true)
            } else {
                is_id_continue(cp, true)
            };
            if !ok {
                return Err(Error::new(
                    ErrorKind::BadSyntax,
                    Span::new(escape_start, cursor + 6 - escape_start),
                    "invalid identifier escape",
                ));
            }
            has_escape = true;
            cursor += 6;
            first = false;
            continue;
        }

        let (cp, consumed) = decode(src, cursor, terminated);
        if consumed == 0 {
            break;
        }
        let ok = if first {
            is_id_start(cp, json5)
        } else {
            is_id_continue(cp, json5)
        };
        if !ok {
            break;
        }
        cursor += consumed;
        first = false;
    }

    let span = Span::new(start, cursor - start);
    if !has_escape {
        let lexeme = span.slice(src);
        match lexeme {
            b"null" => return Ok((PrimitiveToken::Null, span)),
            b"true" => return Ok((PrimitiveToken::True, span)),
            b"false" => return Ok((PrimitiveToken::False, span)),
            _ => {}
        }
        if json5 {
            if lexeme == b"NaN" || lexeme == b"Infinity" {
                return Ok((PrimitiveToken::Number, span));
            }
            if let Ok(text) = std::str::from_utf8(lexeme) {
                if ES5_RESERVED_WORDS.contains(&text) {
                    return Err(Error::new(ErrorKind::BadSyntax, span, "reserved word"));
                }
            }
        }
    }

    if json5 {
        Ok((PrimitiveToken::Identifier, span))
    } else {
        Err(Error::new(ErrorKind::BadSyntax, span, "expected value"))
    }
}

/// Scan exactly four hex digits starting after `at` (which must point at the
/// `u` byte itself) and return the decoded code point.
pub(crate) fn scan_unicode_escape(src: &[u8], _terminated: bool, at: u32) -> Result<u32, Error> {
    let len = src.len() as u32;
    if at + 5 > len || src[at as usize] != b'u' {
        return Err(Error::new(
            ErrorKind::BadSyntax,
            Span::new(at.saturating_sub(1), 2),
            "invalid escape sequence",
        ));
    }
    let digits_start = at + 1;
    if digits_start + 4 > len {
        return Err(Error::new(
            ErrorKind::BadSyntax,
            Span::new(at.saturating_sub(1), len - at + 1),
            "invalid unicode escape",
        ));
    }
    let mut value = 0u32;
    for i in 0..4 {
        let b = src[(digits_start + i) as usize];
        if !is_hex_digit(b as u32) {
            return Err(Error::new(
                ErrorKind::BadSyntax,
                Span::new(at.saturating_sub(1), 6),
                "invalid unicode escape",
            ));
        }
        value = (value << 4) | hex_value(b as u32);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_null_true_false() {
        assert_eq!(
            scan_keyword_or_identifier(b"null,", false, 0, false).unwrap().0,
            PrimitiveToken::Null
        );
        assert_eq!(
            scan_keyword_or_identifier(b"true,", false, 0, false).unwrap().0,
            PrimitiveToken::True
        );
        assert_eq!(
            scan_keyword_or_identifier(b"false,", false, 0, false).unwrap().0,
            PrimitiveToken::False
        );
    }

    #[test]
    fn strict_mode_rejects_other_identifiers() {
        assert!(scan_keyword_or_identifier(b"undefined", false, 0, false).is_err());
    }

    #[test]
    fn json5_accepts_bare_identifier() {
        let (kind, span) = scan_keyword_or_identifier(b"foo:", false, 0, true).unwrap();
        assert_eq!(kind, PrimitiveToken::Identifier);
        assert_eq!(span, Span::new(0, 3));
    }

    #[test]
    fn json5_rejects_reserved_word() {
        assert!(scan_keyword_or_identifier(b"class", false, 0, true).is_err());
    }

    #[test]
    fn json5_nan_and_infinity_are_numbers() {
        assert_eq!(
            scan_keyword_or_identifier(b"NaN,", false, 0, true).unwrap().0,
            PrimitiveToken::Number
        );
        assert_eq!(
            scan_keyword_or_identifier(b"Infinity,", false, 0, true).unwrap().0,
            PrimitiveToken::Number
        );
    }
}
