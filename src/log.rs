//! Debug-only tracing for the scanner and tree builder.
//!
//! The hot path performs zero logging and zero allocation; this module exists
//! so a debug build can be asked to narrate what the state machine is doing
//! without pulling an external logging facade into an embeddable, otherwise
//! dependency-free core.

use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Off,
    Errors,
    Trace,
}

impl Verbosity {
    fn from_env_value(value: &str) -> Verbosity {
        match value {
            "trace" | "2" => Verbosity::Trace,
            "errors" | "1" => Verbosity::Errors,
            _ => Verbosity::Off,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(u8::MAX);

fn current_level() -> Verbosity {
    let cached = LEVEL.load(Ordering::Relaxed);
    if cached != u8::MAX {
        return match cached {
            0 => Verbosity::Off,
            1 => Verbosity::Errors,
            _ => Verbosity::Trace,
        };
    }
    let level = std::env::var("JUDO_TRACE")
        .map(|v| Verbosity::from_env_value(&v))
        .unwrap_or(Verbosity::Off);
    LEVEL.store(level as u8, Ordering::Relaxed);
    level
}

/// Emit a trace line if `JUDO_TRACE` requests at least `Trace` and this is a
/// debug build. Compiled to nothing in release builds.
#[cfg(debug_assertions)]
pub(crate) fn trace(args: fmt::Arguments<'_>) {
    if current_level() >= Verbosity::Trace {
        eprintln!("[judo trace] {}", args);
    }
}

#[cfg(not(debug_assertions))]
pub(crate) fn trace(_args: fmt::Arguments<'_>) {}

/// Emit an error line if `JUDO_TRACE` requests at least `Errors` and this is
/// a debug build.
#[cfg(debug_assertions)]
pub(crate) fn error(args: fmt::Arguments<'_>) {
    if current_level() >= Verbosity::Errors {
        eprintln!("[judo error] {}", args);
    }
}

#[cfg(not(debug_assertions))]
pub(crate) fn error(_args: fmt::Arguments<'_>) {}

macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log::trace(format_args!($($arg)*))
    };
}
pub(crate) use trace;

macro_rules! trace_error {
    ($($arg:tt)*) => {
        $crate::log::error(format_args!($($arg)*))
    };
}
pub(crate) use trace_error;

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Off => write!(f, "off"),
            Verbosity::Errors => write!(f, "errors"),
            Verbosity::Trace => write!(f, "trace"),
        }
    }
}
