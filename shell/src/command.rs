//! Command tables and the dispatcher.
//!
//! A table is a plain slice of [Command]s searched in order, first exact match
//! wins. A [Registry] adds a fixed number of commands registered at runtime on
//! top of a static table, behind an `embassy_sync` mutex so registration from
//! another task cannot race a running dispatch.

use core::cell::RefCell;
use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::error::ShellError;
use crate::token::Argv;

/// Signature of a command. `argv[0]` is the name the command was invoked with.
pub type Handler = fn(&mut Context<'_>, &Argv<'_>) -> Result<(), ShellError>;

/// One entry of a command table.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub handler: Handler,
    pub description: &'static str,
}

impl Command {
    pub const fn new(name: &'static str, handler: Handler, description: &'static str) -> Self {
        Self {
            name,
            handler,
            description,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
}

/// A consistent view of every command currently known: the static table
/// followed by the registered ones.
#[derive(Clone, Copy)]
pub struct CommandList<'a> {
    fixed: &'a [Command],
    registered: &'a [Command],
}

impl<'a> CommandList<'a> {
    pub fn new(fixed: &'a [Command], registered: &'a [Command]) -> Self {
        Self { fixed, registered }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Command> + 'a {
        self.fixed.iter().chain(self.registered.iter())
    }

    /// Case sensitive, whole-name lookup. Prefixes never match.
    pub fn find(&self, name: &str) -> Option<&'a Command> {
        self.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.fixed.len() + self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything the shell can look commands up in.
pub trait CommandSource {
    /// Runs `f` with a snapshot of the table that stays stable for the whole call.
    fn with_commands<R>(&self, f: impl FnOnce(CommandList<'_>) -> R) -> R;
}

impl CommandSource for [Command] {
    fn with_commands<R>(&self, f: impl FnOnce(CommandList<'_>) -> R) -> R {
        f(CommandList::new(self, &[]))
    }
}

impl<const N: usize> CommandSource for [Command; N] {
    fn with_commands<R>(&self, f: impl FnOnce(CommandList<'_>) -> R) -> R {
        f(CommandList::new(self, &[]))
    }
}

/// A static table plus up to `N` commands registered at runtime.
///
/// ```ignore
/// static REGISTRY: Registry<CriticalSectionRawMutex, 4> = Registry::new(&BUILTINS);
/// REGISTRY.register(Command::new("led", led, "Set the user LED"))?;
/// ```
pub struct Registry<M: RawMutex, const N: usize> {
    fixed: &'static [Command],
    registered: Mutex<M, RefCell<Vec<Command, N>>>,
}

impl<M: RawMutex, const N: usize> Registry<M, N> {
    pub const fn new(fixed: &'static [Command]) -> Self {
        Self {
            fixed,
            registered: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Adds a command behind the existing ones. May be called from a running
    /// command, the new entry is visible from the next dispatch on.
    pub fn register(&self, command: Command) -> Result<(), ShellError> {
        if !valid_name(command.name) {
            return Err(ShellError::InvalidName);
        }

        self.registered.lock(|cell| {
            let mut registered = cell.borrow_mut();

            if self.fixed.iter().chain(registered.iter()).any(|c| c.name == command.name) {
                return Err(ShellError::DuplicateName);
            }

            registered
                .push(command)
                .map_err(|_| ShellError::RegistryFull { capacity: N })?;
            debug!("registered command {}", command.name);
            Ok(())
        })
    }

    /// Number of commands registered at runtime.
    pub fn registered(&self) -> usize {
        self.registered.lock(|cell| cell.borrow().len())
    }
}

impl<M: RawMutex, const N: usize> CommandSource for Registry<M, N> {
    /// Copies the registered entries out of the lock, `f` runs unlocked.
    fn with_commands<R>(&self, f: impl FnOnce(CommandList<'_>) -> R) -> R {
        let registered: Vec<Command, N> = self.registered.lock(|cell| cell.borrow().clone());
        f(CommandList::new(self.fixed, &registered))
    }
}

/// What a command sees of the shell while it runs.
///
/// Writing to the context writes to the shell's printer.
pub struct Context<'a> {
    out: &'a mut dyn fmt::Write,
    commands: CommandList<'a>,
}

impl<'a> Context<'a> {
    pub fn new(out: &'a mut dyn fmt::Write, commands: CommandList<'a>) -> Self {
        Self { out, commands }
    }

    /// The table this command was dispatched from.
    pub fn commands(&self) -> CommandList<'a> {
        self.commands
    }
}

impl fmt::Write for Context<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_str(s)
    }
}

/// Outcome of [dispatch] for a line that was read without printer trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// blank line, nothing to do
    Empty,
    /// the named command ran and returned `Ok`
    Matched(&'static str),
    /// the named command ran and reported an error
    Failed(&'static str, ShellError),
    /// no command with that name, already reported on the console
    NotFound,
}

/// Looks up `argv[0]` and runs the matching command with the full `argv`.
///
/// Only a failing printer is returned as an error. Everything else ends up in
/// [Dispatch].
pub fn dispatch(
    commands: CommandList<'_>,
    argv: &Argv<'_>,
    out: &mut dyn fmt::Write,
) -> Result<Dispatch, ShellError> {
    let Some(name) = argv.command() else {
        return Ok(Dispatch::Empty);
    };

    let Some(command) = commands.find(name) else {
        info!("unknown command {}", name);
        write!(out, "{}: command not found\r\n", name)?;
        return Ok(Dispatch::NotFound);
    };

    debug!("dispatching {} with {} arguments", command.name, argv.argc() - 1);
    let mut ctx = Context::new(out, commands);
    match (command.handler)(&mut ctx, argv) {
        Ok(()) => Ok(Dispatch::Matched(command.name)),
        Err(ShellError::Output) => Err(ShellError::Output),
        Err(err) => {
            warn!("command {} failed: {}", command.name, err);
            Ok(Dispatch::Failed(command.name, err))
        }
    }
}
