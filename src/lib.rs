//! `judo` is an embeddable JSON and JSON5 scanner and parser.
//!
//! The scanner ([`scan::Stream`]) walks a source buffer with a fixed-depth
//! state stack and performs no heap allocation; it is suitable for embedding
//! in constrained environments. A tree builder ([`tree`], behind the
//! `parser` feature) layers a conventional `Value` document model on top of
//! it for callers who want one.
//!
//! # Dialects
//!
//! Exactly one of the `rfc4627`, `rfc8259` (default), or `json5` features
//! must be enabled; they select the base grammar. `comments` and
//! `trailing-commas` are additive extensions on top of the strict RFC
//! dialects (JSON5 always has both).
//!
//! # Example
//!
//! ```
//! use judo::scan::Stream;
//! use judo::Token;
//!
//! let mut stream = Stream::<512>::new(br#"{"a": [1, 2, 3]}"#);
//! let mut tokens = Vec::new();
//! loop {
//!     let token = stream.scan().unwrap();
//!     let is_eof = token.is_eof();
//!     tokens.push(token);
//!     if is_eof {
//!         break;
//!     }
//! }
//! assert!(matches!(tokens[0], Token::ObjectBegin(_)));
//! ```
//!
//! # License
//! `judo` is provided under the MIT OR Apache-2.0 license. See [LICENSE](https://github.com/railgunlabs/judo/blob/main/LICENSE).

#[cfg(all(feature = "rfc4627", feature = "rfc8259"))]
compile_error!("features `rfc4627` and `rfc8259` are mutually exclusive");
#[cfg(all(feature = "rfc4627", feature = "json5"))]
compile_error!("features `rfc4627` and `json5` are mutually exclusive");
#[cfg(all(feature = "rfc8259", feature = "json5"))]
compile_error!("features `rfc8259` and `json5` are mutually exclusive");
#[cfg(not(any(feature = "rfc4627", feature = "rfc8259", feature = "json5")))]
compile_error!("exactly one of features `rfc4627`, `rfc8259`, `json5` must be enabled");
#[cfg(all(feature = "rfc4627", feature = "comments"))]
compile_error!("`comments` is not defined for the `rfc4627` dialect");
#[cfg(all(feature = "rfc4627", feature = "trailing-commas"))]
compile_error!("`trailing-commas` is not defined for the `rfc4627` dialect");

pub(crate) mod classify;
pub(crate) mod codepoint;
pub mod error;
pub(crate) mod log;
pub mod numberify;
pub mod position;
pub mod scan;
pub mod span;
pub mod stringify;
#[cfg(feature = "parser")]
pub mod tree;
pub(crate) mod token;

pub use crate::error::{Error, ErrorKind, ParseError};
pub use crate::numberify::{numberify, Number};
pub use crate::position::Position;
pub use crate::scan::{Stream, Tokens};
pub use crate::span::Span;
pub use crate::stringify::{stringify, stringify_len, stringify_to_string};
pub use crate::token::Token;
#[cfg(feature = "parser")]
pub use crate::tree::{parse, parse_with, parse_with_depth, Member, NodeAllocator, Value};
