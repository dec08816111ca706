//! Console rendering of OSC arguments.

use std::fmt;

use rosc::{OscMessage, OscType};

/// Renders an argument list as `[a, b, ...]`.
#[must_use]
pub fn render_args(args: &[OscType]) -> String {
    ArgList(args).to_string()
}

/// Renders the echo line for a message received on `port`.
///
/// Format: `<port>: <path> <args>`.
#[must_use]
pub fn render_line(port: u16, message: &OscMessage) -> String {
    format!("{port}: {} {}", message.addr, ArgList(&message.args))
}

struct ArgList<'a>(&'a [OscType]);

impl fmt::Display for ArgList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", Arg(arg))?;
        }
        f.write_str("]")
    }
}

struct Arg<'a>(&'a OscType);

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            OscType::Int(v) => write!(f, "{v}"),
            OscType::Long(v) => write!(f, "{v}"),
            OscType::Float(v) => write!(f, "{v:?}"),
            OscType::Double(v) => write!(f, "{v:?}"),
            OscType::String(s) => write_quoted(f, s),
            OscType::Char(c) => write_quoted(f, c.encode_utf8(&mut [0; 4])),
            OscType::Bool(b) => write!(f, "{b}"),
            OscType::Nil => f.write_str("nil"),
            OscType::Inf => f.write_str("inf"),
            OscType::Blob(bytes) => write!(f, "blob({})", bytes.len()),
            OscType::Time(t) => write!(f, "time({}.{})", t.seconds, t.fractional),
            OscType::Color(c) => write!(f, "rgba({}, {}, {}, {})", c.red, c.green, c.blue, c.alpha),
            OscType::Midi(m) => write!(f, "midi({}, {}, {}, {})", m.port, m.status, m.data1, m.data2),
            OscType::Array(array) => write!(f, "{}", ArgList(&array.content)),
        }
    }
}

/// Writes `s` in single quotes, or in double quotes when it contains a
/// single quote and no double quote.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    write!(f, "{quote}")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}
