//! Commit status states reported by GitHub, and the symbols used to display them.

use color_print::cformat;
use derive_more::Display;
use serde::Deserialize;

/// The state of a single check, or the combined state of all checks on a commit.
///
/// Decoding never fails: any string outside the four states GitHub documents
/// is kept as [`State::Unknown`] so that the caller decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deserialize)]
#[serde(from = "String")]
pub enum State {
    /// The check passed.
    #[display("success")]
    Success,

    /// The check has not reported a result yet.
    #[display("pending")]
    Pending,

    /// The check could not run.
    #[display("error")]
    Error,

    /// The check ran and failed.
    #[display("failure")]
    Failure,

    /// A state this version of ci-status does not recognize.
    #[display("{_0}")]
    Unknown(String),
}

impl State {
    /// The symbol used to display this state, if it is a known state.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            State::Success => Some(Symbol::Success),
            State::Pending => Some(Symbol::Warning),
            State::Error => Some(Symbol::Warning),
            State::Failure => Some(Symbol::Error),
            State::Unknown(_) => None,
        }
    }
}

impl From<String> for State {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => State::Success,
            "pending" => State::Pending,
            "error" => State::Error,
            "failure" => State::Failure,
            _ => State::Unknown(value),
        }
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        State::from(value.to_string())
    }
}

/// A colored glyph prefixed to report lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// Green check mark.
    Success,

    /// Yellow warning sign.
    Warning,

    /// Red cross.
    Error,
}

impl Symbol {
    /// The colored glyph on its own.
    pub fn glyph(self) -> String {
        match self {
            Symbol::Success => cformat!("<green>\u{2714}</green>"),
            Symbol::Warning => cformat!("<yellow>\u{26a0}</yellow>"),
            Symbol::Error => cformat!("<red>\u{2716}</red>"),
        }
    }

    /// The glyph followed by `message`, left uncolored.
    pub fn line(self, message: impl AsRef<str>) -> String {
        format!("{} {}", self.glyph(), message.as_ref())
    }

    /// The glyph followed by `message`, both in the symbol's color.
    pub fn highlight(self, message: impl AsRef<str>) -> String {
        let message = message.as_ref();
        let message = match self {
            Symbol::Success => cformat!("<green>{}</green>", message),
            Symbol::Warning => cformat!("<yellow>{}</yellow>", message),
            Symbol::Error => cformat!("<red>{}</red>", message),
        };
        format!("{} {message}", self.glyph())
    }
}
