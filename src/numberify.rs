//! Parse an already-validated number lexeme into a Rust floating-point value.

use crate::error::{Error, ErrorKind};
use crate::span::Span;

/// The numeric type produced by [`numberify`]. `f32` under the
/// `numberify-f32` feature, `f64` otherwise.
#[cfg(feature = "numberify-f32")]
pub type Number = f32;

/// The numeric type produced by [`numberify`]. `f32` under the
/// `numberify-f32` feature, `f64` otherwise.
#[cfg(not(feature = "numberify-f32"))]
pub type Number = f64;

/// Parse a number lexeme (as produced by the scanner) into a [`Number`].
///
/// Locale independent: always uses `.` as the decimal separator, regardless
/// of the process's current locale. Recognises the JSON5 `NaN`, `Infinity`,
/// `-Infinity` and `0x`/`0X` hexadecimal-integer literals in addition to the
/// ordinary JSON number grammar.
pub fn numberify(lexeme: &[u8]) -> Result<Number, Error> {
    let text = std::str::from_utf8(lexeme).map_err(|_| malformed())?;

    match text {
        "NaN" => return Ok(Number::NAN),
        "Infinity" => return Ok(Number::INFINITY),
        "-Infinity" => return Ok(Number::NEG_INFINITY),
        "+Infinity" => return Ok(Number::INFINITY),
        _ => {}
    }

    if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return parse_hex(rest, 1);
    }
    if let Some(rest) = text.strip_prefix("-0x").or_else(|| text.strip_prefix("-0X")) {
        return parse_hex(rest, -1);
    }
    if let Some(rest) = text.strip_prefix("+0x").or_else(|| text.strip_prefix("+0X")) {
        return parse_hex(rest, 1);
    }

    text.parse::<f64>()
        .map(|v| v as Number)
        .map_err(|_| malformed())
}

fn parse_hex(digits: &str, sign: i64) -> Result<Number, Error> {
    if digits.is_empty() {
        return Err(malformed());
    }
    let mut value: i64 = 0;
    for c in digits.chars() {
        let d = c.to_digit(16).ok_or_else(malformed)?;
        value = value.wrapping_mul(16).wrapping_add(d as i64);
    }
    Ok((sign * value) as Number)
}

fn malformed() -> Error {
    Error::new(ErrorKind::BadSyntax, Span::empty_at(0), "malformed number")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_integer() {
        assert_eq!(numberify(b"123").unwrap(), 123.0);
    }

    #[test]
    fn parses_negative_float_with_exponent() {
        assert_eq!(numberify(b"-1.5e2").unwrap(), -150.0);
    }

    #[test]
    fn parses_json5_hex() {
        assert_eq!(numberify(b"0xFF").unwrap(), 255.0);
        assert_eq!(numberify(b"-0x10").unwrap(), -16.0);
    }

    #[test]
    fn parses_json5_nan_and_infinity() {
        assert!(numberify(b"NaN").unwrap().is_nan());
        assert_eq!(numberify(b"Infinity").unwrap(), Number::INFINITY);
        assert_eq!(numberify(b"-Infinity").unwrap(), Number::NEG_INFINITY);
    }

    #[test]
    fn rejects_garbage() {
        assert!(numberify(b"12x3").is_err());
    }
}
