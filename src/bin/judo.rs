//! Command-line front-end: reads a JSON/JSON5 document from stdin, validates
//! it, and optionally re-emits it compact or pretty-printed.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use judo::tree::Value;
use judo::{stringify_to_string, ErrorKind, Position};

struct Options {
    quiet: bool,
    pretty: bool,
    indent: usize,
    tabs: bool,
    escape: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            quiet: false,
            pretty: false,
            indent: 2,
            tabs: false,
            escape: false,
        }
    }
}

fn main() -> ExitCode {
    let mut opts = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-q" | "--quiet" => opts.quiet = true,
            "-p" | "--pretty" => opts.pretty = true,
            "-t" | "--tabs" => opts.tabs = true,
            "-e" | "--escape" => opts.escape = true,
            "-v" | "--version" => {
                println!("judo {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::from(0);
            }
            "-h" | "--help" => {
                print_usage();
                return ExitCode::from(0);
            }
            "-i" => match args.next().and_then(|n| n.parse::<usize>().ok()) {
                Some(n) => opts.indent = n,
                None => {
                    eprintln!("judo: -i requires a numeric argument");
                    return ExitCode::from(3);
                }
            },
            other => {
                if let Some(n) = other.strip_prefix("--indent=") {
                    match n.parse::<usize>() {
                        Ok(n) => opts.indent = n,
                        Err(_) => {
                            eprintln!("judo: invalid --indent value '{n}'");
                            return ExitCode::from(3);
                        }
                    }
                } else {
                    eprintln!("judo: unrecognised option '{other}'");
                    print_usage();
                    return ExitCode::from(3);
                }
            }
        }
    }

    let mut input = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut input) {
        if !opts.quiet {
            eprintln!("judo: failed to read stdin: {err}");
        }
        return ExitCode::from(2);
    }

    let value = match judo::parse(&input) {
        Ok(value) => value,
        Err(err) => {
            if !opts.quiet {
                let pos = Position::from_offset(&input, err.span.offset);
                eprintln!("judo: {pos}: {err}");
            }
            return match err.kind {
                ErrorKind::OutOfMemory | ErrorKind::Malfunction => ExitCode::from(2),
                _ => ExitCode::from(1),
            };
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = if opts.pretty {
        print_pretty(&mut out, &input, &value, &opts, 0)
    } else {
        print_compact(&mut out, &input, &value, &opts)
    }
    .and_then(|_| writeln!(out));

    if let Err(err) = result {
        if !opts.quiet {
            eprintln!("judo: failed to write output: {err}");
        }
        return ExitCode::from(2);
    }

    ExitCode::from(0)
}

fn print_usage() {
    println!(
        "usage: judo [-q|--quiet] [-p|--pretty] [-i N|--indent=N] [-t|--tabs] [-e|--escape] [-v|--version] [-h|--help]\n\
         \n\
         Reads a JSON or JSON5 document from stdin and validates it, optionally\n\
         re-emitting it compact or pretty-printed to stdout.\n\
         \n\
         \x20 -q, --quiet       suppress diagnostic messages on error\n\
         \x20 -p, --pretty      pretty-print the document\n\
         \x20 -i, --indent=N    indent width in spaces for pretty output (default 2)\n\
         \x20 -t, --tabs        indent with tabs instead of spaces\n\
         \x20 -e, --escape      escape non-ASCII characters in string output\n\
         \x20 -v, --version     print the version and exit\n\
         \x20 -h, --help        print this message and exit"
    );
}

fn write_string(out: &mut impl Write, src: &[u8], span: judo::Span, escape: bool) -> io::Result<()> {
    let decoded = stringify_to_string(span.slice(src)).unwrap_or_default();
    write!(out, "\"")?;
    for c in decoded.chars() {
        match c {
            '"' => write!(out, "\\\"")?,
            '\\' => write!(out, "\\\\")?,
            '\n' => write!(out, "\\n")?,
            '\r' => write!(out, "\\r")?,
            '\t' => write!(out, "\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c if escape && (c as u32) > 0x7F => write!(out, "\\u{:04x}", c as u32)?,
            c => write!(out, "{c}")?,
        }
    }
    write!(out, "\"")
}

fn print_compact(out: &mut impl Write, src: &[u8], value: &Value, opts: &Options) -> io::Result<()> {
    match value {
        Value::Null(_) => write!(out, "null"),
        Value::Bool(b, _) => write!(out, "{b}"),
        Value::Number(span) => out.write_all(span.slice(src)),
        Value::String(span) => write_string(out, src, *span, opts.escape),
        Value::Array(items, _) => {
            write!(out, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(out, ",")?;
                }
                print_compact(out, src, item, opts)?;
            }
            write!(out, "]")
        }
        Value::Object(members, _) => {
            write!(out, "{{")?;
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    write!(out, ",")?;
                }
                write_string(out, src, member.name, opts.escape)?;
                write!(out, ":")?;
                print_compact(out, src, &member.value, opts)?;
            }
            write!(out, "}}")
        }
    }
}

fn write_indent(out: &mut impl Write, opts: &Options, depth: usize) -> io::Result<()> {
    if opts.tabs {
        for _ in 0..depth {
            write!(out, "\t")?;
        }
    } else {
        for _ in 0..depth * opts.indent {
            write!(out, " ")?;
        }
    }
    Ok(())
}

fn print_pretty(
    out: &mut impl Write,
    src: &[u8],
    value: &Value,
    opts: &Options,
    depth: usize,
) -> io::Result<()> {
    match value {
        Value::Array(items, _) if !items.is_empty() => {
            writeln!(out, "[")?;
            for (i, item) in items.iter().enumerate() {
                write_indent(out, opts, depth + 1)?;
                print_pretty(out, src, item, opts, depth + 1)?;
                if i + 1 < items.len() {
                    write!(out, ",")?;
                }
                writeln!(out)?;
            }
            write_indent(out, opts, depth)?;
            write!(out, "]")
        }
        Value::Object(members, _) if !members.is_empty() => {
            writeln!(out, "{{")?;
            for (i, member) in members.iter().enumerate() {
                write_indent(out, opts, depth + 1)?;
                write_string(out, src, member.name, opts.escape)?;
                write!(out, ": ")?;
                print_pretty(out, src, &member.value, opts, depth + 1)?;
                if i + 1 < members.len() {
                    write!(out, ",")?;
                }
                writeln!(out)?;
            }
            write_indent(out, opts, depth)?;
            write!(out, "}}")
        }
        _ => print_compact(out, src, value, opts),
    }
}
