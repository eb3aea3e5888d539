//! The polling loop tying input, line editing, tokenizing and dispatch together.

use core::fmt::Write;

use crate::command::{dispatch, CommandSource, Dispatch};
use crate::error::ShellError;
use crate::io::{CharSource, Yielder};
use crate::line::{Feed, LineBuffer};
use crate::token::{tokenize, Tokens};

/// Runtime knobs of a [Shell].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: &'static str,
    /// printed once by [Shell::activate]
    pub banner: Option<&'static str>,
    /// echo typed characters back, for terminals without local echo
    pub echo: bool,
    /// maximum number of bytes taken from the source per [Shell::poll]
    pub poll_budget: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "> ",
            banner: None,
            echo: true,
            poll_budget: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellState {
    /// no partial line buffered
    Idle,
    Accumulating,
}

/// What feeding one byte into the shell led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// the line is still being typed
    Pending,
    Dispatched(Dispatch),
    /// the line got too long and is being dropped
    Overflow,
    /// end of a dropped line
    Discarded,
    Cancelled,
}

/// A command shell over a command table `C`.
///
/// `LINE` is the line buffer capacity in bytes and `ARGC` the maximum number
/// of tokens per line, command name included.
pub struct Shell<'a, C: CommandSource + ?Sized, const LINE: usize = 100, const ARGC: usize = 10> {
    commands: &'a C,
    line: LineBuffer<LINE>,
    config: ShellConfig,
}

impl<'a, C: CommandSource + ?Sized, const LINE: usize, const ARGC: usize> Shell<'a, C, LINE, ARGC> {
    pub fn new(commands: &'a C, config: ShellConfig) -> Self {
        Self {
            commands,
            line: LineBuffer::new(),
            config,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn state(&self) -> ShellState {
        if self.line.is_empty() && !self.line.is_discarding() {
            ShellState::Idle
        } else {
            ShellState::Accumulating
        }
    }

    /// Prints the banner, if any, and the first prompt.
    pub fn activate<W: Write>(&mut self, out: &mut W) -> Result<(), ShellError> {
        if let Some(banner) = self.config.banner {
            out.write_str(banner)?;
        }
        out.write_str(self.config.prompt)?;
        Ok(())
    }

    /// Processes a single input byte.
    ///
    /// Only printer failures come back as `Err`. The line state is already
    /// consistent when that happens, the shell can keep being fed.
    pub fn feed<W: Write>(&mut self, byte: u8, out: &mut W) -> Result<Event, ShellError> {
        match self.line.feed(byte) {
            Feed::Continue => Ok(Event::Pending),
            Feed::Appended(b) => {
                if self.config.echo {
                    out.write_char(b as char)?;
                }
                Ok(Event::Pending)
            }
            Feed::Erased => {
                if self.config.echo {
                    out.write_str("\x08 \x08")?;
                }
                Ok(Event::Pending)
            }
            Feed::Overflow => {
                let err = ShellError::Overflow {
                    capacity: self.line.capacity(),
                };
                warn!("{}", err);
                write!(out, "\r\nerror: {}\r\n", err)?;
                Ok(Event::Overflow)
            }
            Feed::Discarded => {
                out.write_str(self.config.prompt)?;
                Ok(Event::Discarded)
            }
            Feed::Cancelled => {
                if self.config.echo {
                    out.write_str("^C\r\n")?;
                }
                out.write_str(self.config.prompt)?;
                Ok(Event::Cancelled)
            }
            Feed::LineReady => {
                let res = self.execute(out);
                self.line.clear();
                let dispatched = res?;
                out.write_str(self.config.prompt)?;
                Ok(Event::Dispatched(dispatched))
            }
        }
    }

    fn execute<W: Write>(&mut self, out: &mut W) -> Result<Dispatch, ShellError> {
        if self.config.echo {
            out.write_str("\r\n")?;
        }

        let line = self.line.as_str();
        let tokens: Tokens<ARGC> = tokenize(line);
        if tokens.is_truncated() {
            let err = ShellError::TooManyTokens {
                max: ARGC,
                dropped: tokens.dropped(),
            };
            warn!("{}", err);
            write!(out, "warning: too many arguments, only the first {} are used\r\n", ARGC)?;
        }

        let argv = tokens.argv(line);
        self.commands.with_commands(|commands| dispatch(commands, &argv, out))
    }

    /// Takes at most `poll_budget` bytes from `source` and returns how many were processed.
    ///
    /// Returns early once a line is finished (dispatched, discarded or cancelled), so
    /// whoever drains `out` gets a turn before the next command prints.
    pub fn poll<S: CharSource, W: Write>(&mut self, source: &mut S, out: &mut W) -> Result<usize, ShellError> {
        let mut processed = 0;
        while processed < self.config.poll_budget && source.has_byte() {
            let byte = source.read_byte();
            processed += 1;
            match self.feed(byte, out)? {
                Event::Dispatched(_) | Event::Discarded | Event::Cancelled => break,
                Event::Pending | Event::Overflow => {}
            }
        }
        Ok(processed)
    }

    /// One turn of the loop: a [Shell::poll] followed by one yield.
    pub async fn step<S: CharSource, W: Write, Y: Yielder>(
        &mut self,
        source: &mut S,
        out: &mut W,
        yielder: &mut Y,
    ) -> Result<usize, ShellError> {
        let res = self.poll(source, out);
        yielder.yield_now().await;
        res
    }

    /// Serves the console forever, this future never completes. Printer failures
    /// are logged and otherwise ignored.
    pub async fn run<S: CharSource, W: Write, Y: Yielder>(&mut self, source: &mut S, out: &mut W, mut yielder: Y) {
        info!("shell running");
        loop {
            if let Err(err) = self.step(source, out, &mut yielder).await {
                error!("shell output failed: {}", err);
            }
        }
    }
}
