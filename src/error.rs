use crate::span::Span;
use std::fmt::{self, Display, Formatter};

/// The taxonomy of results a scanning or parsing operation can produce.
///
/// Mirrors `judo_result` from the reference implementation. Marked
/// non-exhaustive so new kinds can be added without a breaking release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed JSON syntax.
    BadSyntax,
    /// A caller-supplied buffer was too small to hold the result.
    NoBufferSpace,
    /// A byte sequence was not valid UTF-8.
    IllegalByteSequence,
    /// A numeric conversion overflowed the host float type.
    OutOfRange,
    /// A caller violated a documented precondition.
    InvalidOperation,
    /// The structural nesting stack would have exceeded its capacity.
    MaximumNesting,
    /// The tree builder failed to allocate a node.
    OutOfMemory,
    /// The source buffer (or a cursor into it) exceeded `MAX_INPUT`.
    InputTooLarge,
    /// An internal invariant was violated; should be unreachable.
    Malfunction,
}

/// An error produced by `Stream::scan`, `stringify`, or `numberify`.
///
/// Carries the byte span of the failure and a short, stable message, matching
/// the reference library's `judo_error` convention of a fixed-size message
/// buffer -- here expressed as a `&'static str` since Rust error values need
/// not be fixed-size C structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: &'static str,
}

impl Error {
    pub const fn new(kind: ErrorKind, span: Span, message: &'static str) -> Self {
        Self {
            kind,
            span,
            message,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", error_kind_label(self.kind), self.span, self.message)
    }
}

impl std::error::Error for Error {}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::BadSyntax => "SyntaxError",
        ErrorKind::NoBufferSpace => "NoBufferSpace",
        ErrorKind::IllegalByteSequence => "IllegalByteSequence",
        ErrorKind::OutOfRange => "OutOfRange",
        ErrorKind::InvalidOperation => "InvalidOperation",
        ErrorKind::MaximumNesting => "MaximumNesting",
        ErrorKind::OutOfMemory => "OutOfMemory",
        ErrorKind::InputTooLarge => "InputTooLarge",
        ErrorKind::Malfunction => "Malfunction",
    }
}

/// An error produced by the tree builder (`parse`/`parse_with`).
///
/// Wraps a scanner [`Error`] unchanged, except that an allocation failure
/// overwrites the message with `"memory allocation failed"` regardless of
/// what the scanner's own buffer held, matching the reference `judo_parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: &'static str,
}

impl From<Error> for ParseError {
    fn from(err: Error) -> Self {
        Self {
            kind: err.kind,
            span: err.span,
            message: err.message,
        }
    }
}

impl ParseError {
    /// Construct an [`ErrorKind::OutOfMemory`] error at `span`, for
    /// [`NodeAllocator`](crate::tree::NodeAllocator) implementations that
    /// need to report allocation failure.
    pub fn out_of_memory(span: Span) -> Self {
        Self {
            kind: ErrorKind::OutOfMemory,
            span,
            message: "memory allocation failed",
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", error_kind_label(self.kind), self.span, self.message)
    }
}

impl std::error::Error for ParseError {}
