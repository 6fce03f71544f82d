#![forbid(unsafe_code)]
use std::{ffi::OsStr, path::PathBuf};

use crate::mode::Mode;

pub use expand::expand_pid;
pub use tokens::{tokenize, Token};

mod expand;
mod tokens;

#[cfg(test)]
mod tests;

/// One parsed input line, ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Never empty; the first element is the program.
    pub argv: Vec<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub background: bool,
}

impl CommandDescriptor {
    /// Build a descriptor out of a token sequence.
    ///
    /// Returns `None` when there is nothing to run: no tokens at all, or a line that starts with
    /// a redirection or background token. `&` only takes effect if `mode` allows it.
    pub fn build(tokens: &[Token<'_>], mode: Mode) -> Option<Self> {
        let argv: Vec<String> = tokens
            .iter()
            .take_while(|token| !token.is_reserved())
            .map(|token| token.as_str().to_string())
            .collect();

        if argv.is_empty() {
            return None;
        }

        Some(Self {
            argv,
            input: redirect_target(tokens, Token::RedirectInput),
            output: redirect_target(tokens, Token::RedirectOutput),
            background: mode.allows_background() && tokens.contains(&Token::Background),
        })
    }

    /// Tokenize and build in one step.
    pub fn parse(line: &str, mode: Mode) -> Option<Self> {
        Self::build(&tokenize(line), mode)
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn arguments(&self) -> impl Iterator<Item = &OsStr> {
        self.argv[1..].iter().map(OsStr::new)
    }
}

/// The token right after the first `operator` that has one.
fn redirect_target(tokens: &[Token<'_>], operator: Token<'_>) -> Option<PathBuf> {
    tokens
        .windows(2)
        .find(|pair| pair[0] == operator)
        .map(|pair| PathBuf::from(pair[1].as_str()))
}
