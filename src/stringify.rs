//! Decode an already-validated string lexeme into its unescaped UTF-8 bytes.

use crate::codepoint::encode;
use crate::error::{Error, ErrorKind};
use crate::span::Span;

fn hex4(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 4) | crate::classify::hex_value(b as u32))
}

struct Writer<'b> {
    buf: Option<&'b mut [u8]>,
    written: usize,
    required: usize,
}

impl<'b> Writer<'b> {
    fn push_bytes(&mut self, bytes: &[u8]) {
        self.required += bytes.len();
        if let Some(buf) = self.buf.as_deref_mut() {
            let remaining = buf.len() - self.written;
            let n = remaining.min(bytes.len());
            buf[self.written..self.written + n].copy_from_slice(&bytes[..n]);
            self.written += n;
        }
    }
}

/// Decode `lexeme` (a full string lexeme including its quotes, or in JSON5 a
/// bare identifier) into `out`, returning the number of bytes written.
///
/// If `out` is too small, returns [`ErrorKind::NoBufferSpace`] and still
/// writes as many bytes as fit. Use [`stringify_len`] to size-query first.
pub fn stringify(lexeme: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    let mut writer = Writer {
        buf: Some(out),
        written: 0,
        required: 0,
    };
    decode_lexeme(lexeme, &mut writer)?;
    if writer.required > out.len() {
        return Err(Error::new(
            ErrorKind::NoBufferSpace,
            Span::empty_at(0),
            "no buffer space",
        ));
    }
    Ok(writer.written)
}

/// Return the number of bytes `stringify` would produce, without writing.
pub fn stringify_len(lexeme: &[u8]) -> Result<usize, Error> {
    let mut writer = Writer {
        buf: None,
        written: 0,
        required: 0,
    };
    decode_lexeme(lexeme, &mut writer)?;
    Ok(writer.required)
}

/// Allocating convenience: decode `lexeme` into a freshly grown `String`.
pub fn stringify_to_string(lexeme: &[u8]) -> Result<String, Error> {
    let len = stringify_len(lexeme)?;
    let mut buf = vec![0u8; len];
    let written = stringify(lexeme, &mut buf)?;
    debug_assert_eq!(written, len);
    String::from_utf8(buf).map_err(|_| {
        Error::new(ErrorKind::Malfunction, Span::empty_at(0), "malformed encoded character")
    })
}

fn decode_lexeme(lexeme: &[u8], writer: &mut Writer<'_>) -> Result<(), Error> {
    if lexeme.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            Span::empty_at(0),
            "invalid operation",
        ));
    }

    let (body, bare_identifier) = if lexeme[0] == b'"' || lexeme[0] == b'\'' {
        (&lexeme[1..lexeme.len() - 1], false)
    } else {
        (lexeme, true)
    };

    let mut i = 0usize;
    let mut pending_high: Option<u32> = None;
    while i < body.len() {
        let b = body[i];
        if b == b'\\' && !bare_identifier {
            i += 1;
            if i >= body.len() {
                return Err(malfunction());
            }
            match body[i] {
                b'"' => {
                    writer.push_bytes(b"\"");
                    i += 1;
                }
                b'\\' => {
                    writer.push_bytes(b"\\");
                    i += 1;
                }
                b'/' => {
                    writer.push_bytes(b"/");
                    i += 1;
                }
                b'b' => {
                    writer.push_bytes(&[0x08]);
                    i += 1;
                }
                b'f' => {
                    writer.push_bytes(&[0x0C]);
                    i += 1;
                }
                b'n' => {
                    writer.push_bytes(b"\n");
                    i += 1;
                }
                b'r' => {
                    writer.push_bytes(b"\r");
                    i += 1;
                }
                b't' => {
                    writer.push_bytes(b"\t");
                    i += 1;
                }
                b'\'' => {
                    writer.push_bytes(b"'");
                    i += 1;
                }
                b'v' => {
                    writer.push_bytes(&[0x0B]);
                    i += 1;
                }
                b'0' => {
                    writer.push_bytes(&[0x00]);
                    i += 1;
                }
                b'x' => {
                    if i + 2 >= body.len() {
                        return Err(malfunction());
                    }
                    let cp = hex4(&body[i + 1..i + 3]);
                    write_codepoint(writer, cp);
                    i += 3;
                }
                b'\n' => {
                    i += 1;
                }
                b'\r' => {
                    i += 1;
                    if i < body.len() && body[i] == b'\n' {
                        i += 1;
                    }
                }
                b'u' => {
                    if i + 4 >= body.len() {
                        return Err(malfunction());
                    }
                    let cp = hex4(&body[i + 1..i + 5]);
                    i += 5;
                    if let Some(high) = pending_high.take() {
                        let combined = (high << 10) + cp + 0xFCA02400;
                        write_codepoint(writer, combined);
                    } else if (0xD800..=0xDBFF).contains(&cp) {
                        pending_high = Some(cp);
                    } else {
                        write_codepoint(writer, cp);
                    }
                }
                _ => return Err(malfunction()),
            }
            continue;
        }

        if b == b'\\' && bare_identifier {
            // Bare JSON5 identifiers only ever carry `\uHHHH` escapes.
            if i + 5 >= body.len() || body[i + 1] != b'u' {
                return Err(malfunction());
            }
            let cp = hex4(&body[i + 2..i + 6]);
            write_codepoint(writer, cp);
            i += 6;
            continue;
        }

        // Ordinary UTF-8 byte: copy the whole sequence through unchanged.
        let seq_len = utf8_len(b);
        if i + seq_len > body.len() {
            return Err(malfunction());
        }
        writer.push_bytes(&body[i..i + seq_len]);
        i += seq_len;
    }

    Ok(())
}

fn write_codepoint(writer: &mut Writer<'_>, cp: u32) {
    let mut buf = [0u8; 4];
    let n = encode(cp, &mut buf);
    writer.push_bytes(&buf[..n]);
}

fn utf8_len(lead: u8) -> usize {
    if lead < 0x80 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

fn malfunction() -> Error {
    Error::new(ErrorKind::Malfunction, Span::empty_at(0), "malformed encoded character")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_simple_string() {
        assert_eq!(stringify_to_string(br#""hello""#).unwrap(), "hello");
    }

    #[test]
    fn unescapes_common_escapes() {
        assert_eq!(stringify_to_string(br#""a\nb\tc""#).unwrap(), "a\nb\tc");
    }

    #[test]
    fn combines_surrogate_pair() {
        let s = stringify_to_string(br#""𝄞""#).unwrap();
        assert_eq!(s, "\u{1D11E}");
    }

    #[test]
    fn size_query_matches_write_mode() {
        let lexeme: &[u8] = br#""a\nb""#;
        let len = stringify_len(lexeme).unwrap();
        let mut buf = vec![0u8; len];
        let written = stringify(lexeme, &mut buf).unwrap();
        assert_eq!(len, written);
    }

    #[test]
    fn insufficient_buffer_reports_no_buffer_space() {
        let lexeme: &[u8] = br#""hello""#;
        let mut buf = [0u8; 2];
        let err = stringify(lexeme, &mut buf).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoBufferSpace);
    }
}
