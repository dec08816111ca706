//! The reserved control command.
//!
//! `/osclisten/exit 1` asks the process to stop. Any other argument, or no
//! argument at all, makes it an ordinary message.

use rosc::{OscMessage, OscType};

/// Address path of the exit command.
pub const EXIT_PATH: &str = "/osclisten/exit";

/// First-argument value that triggers exit.
pub const EXIT_VALUE: i64 = 1;

/// Returns true if `message` is an exit request.
#[must_use]
pub fn is_exit_request(message: &OscMessage) -> bool {
    message.addr == EXIT_PATH
        && message
            .args
            .first()
            .and_then(arg_as_int)
            .is_some_and(|value| value == EXIT_VALUE)
}

/// Interprets an OSC argument as an integer.
///
/// Floats are truncated toward zero and strings are parsed after trimming.
/// Returns `None` for types with no integer reading.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // truncation is the intended reading
pub fn arg_as_int(arg: &OscType) -> Option<i64> {
    match arg {
        OscType::Int(v) => Some(i64::from(*v)),
        OscType::Long(v) => Some(*v),
        OscType::Float(v) if v.is_finite() => Some(v.trunc() as i64),
        OscType::Double(v) if v.is_finite() => Some(v.trunc() as i64),
        OscType::Bool(b) => Some(i64::from(*b)),
        OscType::String(s) => s.trim().parse().ok(),
        OscType::Char(c) => c.to_digit(10).map(i64::from),
        _ => None,
    }
}
