//! Line-oriented input for the terminal host.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("type a command, or `help`")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("not an option: {0} (use a letter like B or a number like 2)")]
    InvalidOption(String),
    #[error("not a question number: {0}")]
    InvalidQuestion(String),
}

/// One parsed line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Pick an option (0-based) for the question on screen.
    Choose(usize),
    /// Jump to a question (0-based).
    GoTo(usize),
    Next,
    Previous,
    Show,
    Submit,
    Help,
}

pub const HELP: &str = "\
commands:
  choose <opt>   pick an option for this question (alias: c; A/B/... or 1/2/...)
  next           next question (alias: n)
  prev           previous question (alias: p)
  go <n>         jump to question n (alias: g)
  show           redraw the current question (alias: s)
  submit         hand in the exam
  help           this text (alias: ?)";

/// Parse one line.
///
/// # Errors
///
/// Returns `InputError` describing what was wrong with the line.
pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Err(InputError::Empty);
    };
    let arg = parts.next();

    match cmd.to_ascii_lowercase().as_str() {
        "choose" | "c" => {
            let raw = arg.ok_or(InputError::MissingArgument("choose"))?;
            parse_option(raw).map(Input::Choose)
        }
        "go" | "g" => {
            let raw = arg.ok_or(InputError::MissingArgument("go"))?;
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Input::GoTo(n - 1)),
                _ => Err(InputError::InvalidQuestion(raw.to_owned())),
            }
        }
        "next" | "n" => Ok(Input::Next),
        "prev" | "p" => Ok(Input::Previous),
        "show" | "s" => Ok(Input::Show),
        "submit" => Ok(Input::Submit),
        "help" | "?" => Ok(Input::Help),
        other => Err(InputError::Unknown(other.to_owned())),
    }
}

/// Accepts a letter (`A` is the first option) or a 1-based number.
fn parse_option(raw: &str) -> Result<usize, InputError> {
    let invalid = || InputError::InvalidOption(raw.to_owned());

    if let Ok(n) = raw.parse::<usize>() {
        return n.checked_sub(1).ok_or_else(invalid);
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Ok(usize::from(c.to_ascii_uppercase() as u8 - b'A'))
        }
        _ => Err(invalid()),
    }
}

/// Display label for an option index: `A`..`Z`, then numbers.
#[must_use]
pub fn option_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}
