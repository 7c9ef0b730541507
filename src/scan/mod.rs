//! The bounded-stack scanner: a UTF-8 decoder front end feeding a
//! state-machine-driven tokenizer/parser hybrid.

mod comment;
mod keyword;
mod number;
mod string;

use crate::codepoint::{decode, BAD_ENCODING, INPUT_TOO_LARGE};
use crate::error::{Error, ErrorKind};
use crate::log::{trace, trace_error};
use crate::span::Span;
use crate::token::{Lexeme, PrimitiveToken, Token};

const JSON5: bool = cfg!(feature = "json5");
const RFC4627: bool = cfg!(feature = "rfc4627");
const COMMENTS_ENABLED: bool = JSON5 || cfg!(feature = "comments");
const TRAILING_COMMAS_ENABLED: bool = JSON5 || cfg!(feature = "trailing-commas");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    RootValue,
    FinishedValue,
    ArrayElemOrEnd,
    FinishedArrayElem,
    ObjectKeyOrEnd,
    ObjectValue,
    FinishedObjectValue,
    ParsingError,
    EncodingError,
    MaxNestingError,
    Finished,
}

impl State {
    fn is_terminal(self) -> bool {
        matches!(
            self,
            State::ParsingError | State::EncodingError | State::MaxNestingError | State::Finished
        )
    }
}

/// A scanner handle over a source buffer.
///
/// `MAXDEPTH` bounds structural nesting; it lives inline in the handle as a
/// fixed-size array, so the handle performs no heap allocation of its own.
/// Construct with [`Stream::new`] (length-prefixed) or
/// [`Stream::new_terminated`] (NUL-terminated), then call [`Stream::scan`]
/// in a loop until it returns `Token::Eof` or an error.
pub struct Stream<'s, const MAXDEPTH: usize = 512> {
    src: &'s [u8],
    terminated: bool,
    at: u32,
    stack: [State; MAXDEPTH],
    depth: usize,
    latched_error: Option<Error>,
    bom_checked: bool,
}

impl<'s, const MAXDEPTH: usize> Stream<'s, MAXDEPTH> {
    /// A handle over a length-prefixed buffer.
    pub fn new(src: &'s [u8]) -> Self {
        Self::with_mode(src, false)
    }

    /// A handle over a NUL-terminated buffer; the first NUL byte is treated
    /// as logical end of input.
    pub fn new_terminated(src: &'s [u8]) -> Self {
        Self::with_mode(src, true)
    }

    fn with_mode(src: &'s [u8], terminated: bool) -> Self {
        assert!(MAXDEPTH > 0 && MAXDEPTH < i8::MAX as usize, "MAXDEPTH out of range");
        Self {
            src,
            terminated,
            at: 0,
            stack: [State::RootValue; MAXDEPTH],
            depth: 0,
            latched_error: None,
            bom_checked: false,
        }
    }

    /// Iterate the scanner as `Result<Token, Error>` values, ending at the
    /// first `Eof` token.
    pub fn tokens(self) -> Tokens<'s, MAXDEPTH> {
        Tokens { stream: self, done: false }
    }

    fn top(&self) -> State {
        self.stack[self.depth]
    }

    fn set_top(&mut self, state: State) {
        self.stack[self.depth] = state;
    }

    fn push(&mut self, state: State) -> Result<(), Error> {
        if self.depth + 1 >= MAXDEPTH {
            return Err(self.latch(
                ErrorKind::MaximumNesting,
                Span::empty_at(self.at),
                "maximum nesting depth exceeded",
            ));
        }
        self.depth += 1;
        self.stack[self.depth] = state;
        Ok(())
    }

    fn latch(&mut self, kind: ErrorKind, span: Span, message: &'static str) -> Error {
        let err = Error::new(kind, span, message);
        trace_error!("{}", err);
        let terminal = match kind {
            ErrorKind::MaximumNesting => State::MaxNestingError,
            ErrorKind::IllegalByteSequence | ErrorKind::InputTooLarge => State::EncodingError,
            _ => State::ParsingError,
        };
        self.stack[0] = terminal;
        self.depth = 0;
        self.latched_error = Some(err);
        err
    }

    /// Advance the machine by one step, emitting the next semantic token.
    pub fn scan(&mut self) -> Result<Token, Error> {
        if self.depth == 0 && self.top().is_terminal() {
            if let Some(err) = self.latched_error {
                return Err(err);
            }
            if self.top() == State::Finished {
                return Ok(Token::Eof(Span::empty_at(self.at)));
            }
        }

        if self.top() == State::FinishedValue {
            if self.depth == 0 {
                let lexeme = self.next_primitive()?;
                return if lexeme.kind == PrimitiveToken::Eof {
                    self.set_top(State::Finished);
                    Ok(Token::Eof(lexeme.span))
                } else {
                    Err(self.latch(ErrorKind::BadSyntax, lexeme.span, "expected EOF"))
                };
            }
            self.depth -= 1;
        }

        self.dispatch()
    }

    fn dispatch(&mut self) -> Result<Token, Error> {
        match self.top() {
            State::RootValue => self.state_root_value(),
            State::ArrayElemOrEnd => self.state_array_elem_or_end(),
            State::FinishedArrayElem => self.state_finished_array_elem(),
            State::ObjectKeyOrEnd => self.state_object_key_or_end(),
            State::ObjectValue => self.state_object_value(),
            State::FinishedObjectValue => self.state_finished_object_value(),
            State::FinishedValue | State::Finished | State::ParsingError | State::EncodingError | State::MaxNestingError => {
                unreachable!("terminal/finished-value states handled in scan()")
            }
        }
    }

    fn state_root_value(&mut self) -> Result<Token, Error> {
        if !self.bom_checked {
            self.bom_checked = true;
            self.skip_bom();
        }
        let lexeme = self.next_primitive()?;
        if RFC4627 && !matches!(lexeme.kind, PrimitiveToken::LBracket | PrimitiveToken::LBrace) {
            return Err(self.latch(ErrorKind::BadSyntax, lexeme.span, "expected root value"));
        }
        self.parse_value(lexeme)
    }

    fn state_array_elem_or_end(&mut self) -> Result<Token, Error> {
        let lexeme = self.next_primitive()?;
        if lexeme.kind == PrimitiveToken::RBracket {
            self.set_top(State::FinishedValue);
            return Ok(Token::ArrayEnd(lexeme.span));
        }
        let token = self.parse_value(lexeme)?;
        self.set_top(State::FinishedArrayElem);
        Ok(token)
    }

    fn state_finished_array_elem(&mut self) -> Result<Token, Error> {
        let lexeme = self.next_primitive()?;
        match lexeme.kind {
            PrimitiveToken::Comma => {
                if TRAILING_COMMAS_ENABLED {
                    let next = self.next_primitive()?;
                    if next.kind == PrimitiveToken::RBracket {
                        self.set_top(State::FinishedValue);
                        return Ok(Token::ArrayEnd(next.span));
                    }
                    self.set_top(State::ArrayElemOrEnd);
                    let token = self.parse_value(next)?;
                    self.set_top(State::FinishedArrayElem);
                    Ok(token)
                } else {
                    let next = self.next_primitive()?;
                    let token = self.parse_value(next)?;
                    self.set_top(State::FinishedArrayElem);
                    Ok(token)
                }
            }
            PrimitiveToken::RBracket => {
                self.set_top(State::FinishedValue);
                Ok(Token::ArrayEnd(lexeme.span))
            }
            _ => Err(self.latch(ErrorKind::BadSyntax, lexeme.span, "expected ']' or ','")),
        }
    }

    fn state_object_key_or_end(&mut self) -> Result<Token, Error> {
        let lexeme = self.next_primitive()?;
        match lexeme.kind {
            PrimitiveToken::RBrace => {
                self.set_top(State::FinishedValue);
                Ok(Token::ObjectEnd(lexeme.span))
            }
            PrimitiveToken::String => {
                self.set_top(State::ObjectValue);
                Ok(Token::ObjectName(lexeme.span))
            }
            PrimitiveToken::Identifier if JSON5 => {
                self.set_top(State::ObjectValue);
                Ok(Token::ObjectName(lexeme.span))
            }
            _ => Err(self.latch(ErrorKind::BadSyntax, lexeme.span, "expected '}' or string")),
        }
    }

    fn state_object_value(&mut self) -> Result<Token, Error> {
        let colon = self.next_primitive()?;
        if colon.kind != PrimitiveToken::Colon {
            return Err(self.latch(ErrorKind::BadSyntax, colon.span, "expected ':'"));
        }
        let value_lexeme = self.next_primitive()?;
        let token = self.parse_value(value_lexeme)?;
        self.set_top(State::FinishedObjectValue);
        Ok(token)
    }

    fn state_finished_object_value(&mut self) -> Result<Token, Error> {
        let lexeme = self.next_primitive()?;
        match lexeme.kind {
            PrimitiveToken::Comma if TRAILING_COMMAS_ENABLED => {
                let next = self.next_primitive()?;
                if next.kind == PrimitiveToken::RBrace {
                    self.set_top(State::FinishedValue);
                    return Ok(Token::ObjectEnd(next.span));
                }
                self.finish_object_key(next)
            }
            PrimitiveToken::Comma => {
                let next = self.next_primitive()?;
                self.finish_object_key(next)
            }
            PrimitiveToken::RBrace => {
                self.set_top(State::FinishedValue);
                Ok(Token::ObjectEnd(lexeme.span))
            }
            _ => Err(self.latch(ErrorKind::BadSyntax, lexeme.span, "expected '}' or ','")),
        }
    }

    fn finish_object_key(&mut self, lexeme: Lexeme) -> Result<Token, Error> {
        match lexeme.kind {
            PrimitiveToken::String => {
                self.set_top(State::ObjectValue);
                Ok(Token::ObjectName(lexeme.span))
            }
            PrimitiveToken::Identifier if JSON5 => {
                self.set_top(State::ObjectValue);
                Ok(Token::ObjectName(lexeme.span))
            }
            _ => Err(self.latch(ErrorKind::BadSyntax, lexeme.span, "expected '}' or string")),
        }
    }

    /// Dispatch a just-scanned primitive token as a value, pushing a new
    /// stack frame. Checked against `MAXDEPTH` before the push.
    fn parse_value(&mut self, lexeme: Lexeme) -> Result<Token, Error> {
        match lexeme.kind {
            PrimitiveToken::Null => {
                self.push(State::FinishedValue)?;
                Ok(Token::Null(lexeme.span))
            }
            PrimitiveToken::True => {
                self.push(State::FinishedValue)?;
                Ok(Token::True(lexeme.span))
            }
            PrimitiveToken::False => {
                self.push(State::FinishedValue)?;
                Ok(Token::False(lexeme.span))
            }
            PrimitiveToken::Number => {
                self.push(State::FinishedValue)?;
                Ok(Token::Number(lexeme.span))
            }
            PrimitiveToken::String => {
                self.push(State::FinishedValue)?;
                Ok(Token::String(lexeme.span))
            }
            PrimitiveToken::LBracket => {
                self.push(State::ArrayElemOrEnd)?;
                Ok(Token::ArrayBegin(lexeme.span))
            }
            PrimitiveToken::LBrace => {
                self.push(State::ObjectKeyOrEnd)?;
                Ok(Token::ObjectBegin(lexeme.span))
            }
            _ => Err(self.latch(ErrorKind::BadSyntax, lexeme.span, "expected value")),
        }
    }

    fn skip_bom(&mut self) {
        if self.src[self.at as usize..].starts_with(&[0xEF, 0xBB, 0xBF]) {
            self.at += 3;
        }
    }

    /// Skip whitespace and (if enabled) comments, then recognise and consume
    /// exactly one primitive token.
    fn next_primitive(&mut self) -> Result<Lexeme, Error> {
        loop {
            let (cp, consumed) = decode(self.src, self.at, self.terminated);
            if consumed != 0 && crate::classify::is_whitespace(cp, JSON5) {
                self.at += consumed;
                continue;
            }
            if self.at + 1 < self.src.len() as u32 && self.src[self.at as usize] == b'/' {
                if COMMENTS_ENABLED && self.src[self.at as usize + 1] == b'/' {
                    self.at = comment::scan_line_comment(self.src, self.terminated, self.at);
                    continue;
                }
                if COMMENTS_ENABLED && self.src[self.at as usize + 1] == b'*' {
                    self.at = comment::scan_multiline_comment(self.src, self.terminated, self.at)
                        .map_err(|e| self.latch(e.kind, e.span, e.message))?;
                    continue;
                }
            }
            break;
        }
        trace!("next_primitive at {}", self.at);
        self.recognize()
    }

    fn recognize(&mut self) -> Result<Lexeme, Error> {
        let at = self.at;
        let (cp, consumed) = decode(self.src, at, self.terminated);

        if consumed == 0 && cp != BAD_ENCODING && cp != INPUT_TOO_LARGE {
            return Ok(Lexeme {
                kind: PrimitiveToken::Eof,
                span: Span::empty_at(at),
            });
        }
        if cp == BAD_ENCODING {
            return Err(self.latch(ErrorKind::IllegalByteSequence, Span::empty_at(at), "malformed encoded character"));
        }
        if cp == INPUT_TOO_LARGE {
            return Err(self.latch(ErrorKind::InputTooLarge, Span::empty_at(at), "input too large"));
        }

        let single = |kind: PrimitiveToken, at: u32, consumed: u32, this: &mut Self| {
            this.at = at + consumed;
            Lexeme {
                kind,
                span: Span::new(at, consumed),
            }
        };

        match cp {
            c if c == b',' as u32 => Ok(single(PrimitiveToken::Comma, at, consumed, self)),
            c if c == b':' as u32 => Ok(single(PrimitiveToken::Colon, at, consumed, self)),
            c if c == b'[' as u32 => Ok(single(PrimitiveToken::LBracket, at, consumed, self)),
            c if c == b']' as u32 => Ok(single(PrimitiveToken::RBracket, at, consumed, self)),
            c if c == b'{' as u32 => Ok(single(PrimitiveToken::LBrace, at, consumed, self)),
            c if c == b'}' as u32 => Ok(single(PrimitiveToken::RBrace, at, consumed, self)),
            c if c == b'"' as u32 || (JSON5 && c == b'\'' as u32) => {
                let (span, next) = string::scan_string(self.src, self.terminated, at, JSON5)
                    .map_err(|e| self.latch(e.kind, e.span, e.message))?;
                self.at = next;
                Ok(Lexeme { kind: PrimitiveToken::String, span })
            }
            c if crate::classify::is_digit(c)
                || c == b'-' as u32
                || (JSON5 && (c == b'+' as u32 || c == b'.' as u32)) =>
            {
                let (span, next) = number::scan_number(self.src, at, JSON5)
                    .map_err(|e| self.latch(e.kind, e.span, e.message))?;
                self.at = next;
                Ok(Lexeme { kind: PrimitiveToken::Number, span })
            }
            c if crate::classify::is_id_start(c, JSON5) || (JSON5 && c == b'\\' as u32) => {
                let (kind, span) = keyword::scan_keyword_or_identifier(self.src, self.terminated, at, JSON5)
                    .map_err(|e| self.latch(e.kind, e.span, e.message))?;
                self.at = span.end();
                Ok(Lexeme { kind, span })
            }
            _ => Err(self.latch(ErrorKind::BadSyntax, Span::new(at, consumed), "unexpected character")),
        }
    }
}

/// An iterator adapter over [`Stream::scan`], ending after the first `Eof`.
pub struct Tokens<'s, const MAXDEPTH: usize> {
    stream: Stream<'s, MAXDEPTH>,
    done: bool,
}

impl<'s, const MAXDEPTH: usize> Iterator for Tokens<'s, MAXDEPTH> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.scan() {
            Ok(token) => {
                if token.is_eof() {
                    self.done = true;
                }
                Some(Ok(token))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(src: &[u8]) -> Vec<Result<Token, Error>> {
        Stream::<512>::new(src).tokens().collect()
    }

    #[test]
    fn scans_flat_object() {
        let tokens = collect(br#"{"a":1,"b":[true,null]}"#);
        assert!(tokens.iter().all(|t| t.is_ok()));
        assert!(matches!(tokens.last().unwrap().as_ref().unwrap(), Token::Eof(_)));
    }

    #[test]
    fn rejects_empty_input() {
        let mut stream = Stream::<512>::new(b"");
        let err = stream.scan().unwrap_err();
        assert_eq!(err.span, Span::new(0, 0));
    }

    #[test]
    fn terminal_error_is_idempotent() {
        let mut stream = Stream::<512>::new(b"[1,2,]");
        loop {
            match stream.scan() {
                Ok(t) if t.is_eof() => panic!("expected error before EOF"),
                Ok(_) => continue,
                Err(first) => {
                    let second = stream.scan().unwrap_err();
                    assert_eq!(first, second);
                    break;
                }
            }
        }
    }
}
