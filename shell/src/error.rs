use thiserror::Error;

/// Everything that can go wrong while reading, parsing or running a command line.
///
/// None of these are fatal. The shell reports them on the console or the log and
/// goes back to waiting for the next line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellError {
    /// the line did not fit into the line buffer and was thrown away
    #[error("input exceeds {capacity} bytes, line discarded")]
    Overflow { capacity: usize },

    /// the first token is not the name of any command
    #[error("command not found")]
    NotFound,

    /// a command rejected its own arguments
    #[error("bad arguments")]
    BadArguments,

    /// more tokens than argv slots, the tail was dropped
    #[error("too many arguments, {dropped} beyond the first {max} dropped")]
    TooManyTokens { max: usize, dropped: usize },

    /// the printer refused output
    #[error("printer failed")]
    Output,

    #[error("command registry is full ({capacity} slots)")]
    RegistryFull { capacity: usize },

    #[error("command names must be non-empty and free of whitespace")]
    InvalidName,

    #[error("a command with that name already exists")]
    DuplicateName,
}

impl From<core::fmt::Error> for ShellError {
    fn from(_: core::fmt::Error) -> Self {
        ShellError::Output
    }
}
