//! Splitting a line into whitespace separated tokens.
//!
//! A [Token] is only a position inside the line it was cut from. [Argv] pairs the
//! tokens with that line again, so every argument is sliced through its own
//! offset and length and nothing outlives the line buffer.

use heapless::Vec;

/// One argument, as an offset/length view into its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Token {
    start: usize,
    len: usize,
}

impl Token {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// The text of this token. `None` if `line` is not the line it was cut from.
    pub fn slice<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.get(self.start..self.end())
    }
}

/// Result of [tokenize]: at most `MAX` tokens plus the number that did not fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<const MAX: usize> {
    tokens: Vec<Token, MAX>,
    dropped: usize,
}

impl<const MAX: usize> Tokens<MAX> {
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn argc(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens found beyond `MAX`.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }

    /// Binds the tokens back to the line they were cut from.
    pub fn argv<'a>(&'a self, line: &'a str) -> Argv<'a> {
        Argv::new(line, &self.tokens)
    }
}

fn is_separator(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Splits `line` on runs of spaces and tabs.
///
/// Leading and trailing whitespace produce no tokens, an empty or blank line
/// gives `argc == 0`.
pub fn tokenize<const MAX: usize>(line: &str) -> Tokens<MAX> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut dropped = 0;
    let mut i = 0;

    while i < bytes.len() {
        if is_separator(bytes[i]) {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && !is_separator(bytes[i]) {
            i += 1;
        }

        if tokens.push(Token::new(start, i - start)).is_err() {
            dropped += 1;
        }
    }

    Tokens { tokens, dropped }
}

/// The argument vector handed to a command. `argv[0]` is the command name.
#[derive(Debug, Clone, Copy)]
pub struct Argv<'a> {
    line: &'a str,
    tokens: &'a [Token],
}

impl<'a> Argv<'a> {
    pub fn new(line: &'a str, tokens: &'a [Token]) -> Self {
        Self { line, tokens }
    }

    pub fn argc(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).and_then(|t| t.slice(self.line))
    }

    /// `argv[0]`
    pub fn command(&self) -> Option<&'a str> {
        self.get(0)
    }

    /// All tokens, command name included.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        let line = self.line;
        self.tokens.iter().filter_map(move |t| t.slice(line))
    }

    /// The tokens after the command name.
    pub fn args(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().skip(1)
    }

    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    pub fn line(&self) -> &'a str {
        self.line
    }
}
