use crate::codepoint::decode;
use crate::error::{Error, ErrorKind};
use crate::span::Span;

/// Consume a `//` line comment starting at `at` (which points at the first
/// `/`). Stops before the next line terminator (LF, CR, CRLF, U+2028,
/// U+2029) or at EOF; never fails.
pub(crate) fn scan_line_comment(src: &[u8], terminated: bool, at: u32) -> u32 {
    let mut cursor = at + 2;
    loop {
        let (cp, consumed) = decode(src, cursor, terminated);
        if consumed == 0 {
            return cursor;
        }
        if matches!(cp, 0x0A | 0x0D) {
            return cursor;
        }
        if cp == 0x2028 || cp == 0x2029 {
            return cursor;
        }
        cursor += consumed;
    }
}

/// Consume a `/* ... */` block comment starting at `at` (which points at the
/// first `/`). Returns the cursor just past the closing `*/`, or an
/// `unterminated multi-line comment` error if EOF is reached first.
pub(crate) fn scan_multiline_comment(src: &[u8], terminated: bool, at: u32) -> Result<u32, Error> {
    let mut cursor = at + 2;
    loop {
        let (cp, consumed) = decode(src, cursor, terminated);
        if consumed == 0 {
            if cp == crate::codepoint::BAD_ENCODING {
                return Err(Error::new(
                    ErrorKind::IllegalByteSequence,
                    Span::empty_at(cursor),
                    "malformed encoded character",
                ));
            }
            return Err(Error::new(
                ErrorKind::BadSyntax,
                Span::new(at, cursor - at),
                "unterminated multi-line comment",
            ));
        }
        if cp == b'*' as u32 {
            let (next_cp, next_consumed) = decode(src, cursor + consumed, terminated);
            if next_consumed != 0 && next_cp == b'/' as u32 {
                return Ok(cursor + consumed + next_consumed);
            }
        }
        cursor += consumed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment_stops_before_newline() {
        let src = b"// hi\nrest";
        let end = scan_line_comment(src, false, 0);
        assert_eq!(end, 5);
    }

    #[test]
    fn line_comment_at_eof() {
        let src = b"// hi";
        let end = scan_line_comment(src, false, 0);
        assert_eq!(end, src.len() as u32);
    }

    #[test]
    fn block_comment_closes() {
        let src = b"/* hi */rest";
        let end = scan_multiline_comment(src, false, 0).unwrap();
        assert_eq!(end, 8);
    }

    #[test]
    fn unterminated_block_comment_errors() {
        let src = b"/* hi";
        let err = scan_multiline_comment(src, false, 0).unwrap_err();
        assert_eq!(err.message, "unterminated multi-line comment");
    }
}
