//! A small command shell for firmware consoles.
//!
//! Bytes are polled from a [CharSource], collected into a fixed size line by the
//! [LineBuffer], split into [Token]s and dispatched against a table of [Command]s.
//! Output goes to any [core::fmt::Write] printer. Nothing here allocates, and the
//! only suspension point is the [Yielder] handed to [Shell::run].
//!
//! ```ignore
//! static REGISTRY: Registry<CriticalSectionRawMutex, 4> = Registry::new(&BUILTINS);
//!
//! let mut shell: Shell<'_, _> = Shell::new(&REGISTRY, ShellConfig::default());
//! shell.run(&mut source, &mut printer, ExecutorYield).await
//! ```

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

// must come first so the logging macros are visible in the other modules
#[macro_use]
mod fmt;

pub mod builtins;
pub mod command;
pub mod error;
pub mod io;
pub mod line;
pub mod shell;
pub mod token;

pub use builtins::BUILTINS;
pub use command::{dispatch, Command, CommandList, CommandSource, Context, Dispatch, Handler, Registry};
pub use error::ShellError;
pub use io::{ChannelSource, CharSource, ExecutorYield, PipePrinter, Yielder};
pub use line::{Feed, LineBuffer};
pub use shell::{Event, Shell, ShellConfig, ShellState};
pub use token::{tokenize, Argv, Token, Tokens};
