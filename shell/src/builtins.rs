//! The commands every shell comes with.

use core::fmt::Write;

use crate::command::{Command, Context};
use crate::error::ShellError;
use crate::token::Argv;

pub const VERSION_BANNER: &str = concat!("cmdshell v", env!("CARGO_PKG_VERSION"), "\r\n");

const LS_VERSION: &str = "ls version 1.0.\r\n";

/// `ls`, `test`, `help` and `version`, in that order.
pub static BUILTINS: [Command; 4] = [
    Command::new("ls", ls, "List all commands"),
    Command::new("test", test, "Print the received arguments"),
    Command::new("help", help, "Show this help message"),
    Command::new("version", version, "Show version information"),
];

/// Lists whatever table the shell is running with, so it can't drift from it.
pub fn help(ctx: &mut Context<'_>, _argv: &Argv<'_>) -> Result<(), ShellError> {
    ctx.write_str("Available commands:\r\n")?;
    for command in ctx.commands().iter() {
        write!(ctx, "  {} - {}\r\n", command.name, command.description)?;
    }
    Ok(())
}

pub fn version(ctx: &mut Context<'_>, _argv: &Argv<'_>) -> Result<(), ShellError> {
    ctx.write_str(VERSION_BANNER)?;
    Ok(())
}

/// `ls cmd | -v | -h`
pub fn ls(ctx: &mut Context<'_>, argv: &Argv<'_>) -> Result<(), ShellError> {
    let Some(option) = argv.get(1) else {
        ctx.write_str("ls need more arguments!\r\n")?;
        return Err(ShellError::BadArguments);
    };

    match option {
        "cmd" => {
            for command in ctx.commands().iter() {
                write!(ctx, "{} : {}\r\n", command.name, command.description)?;
            }
        }
        "-v" => ctx.write_str(LS_VERSION)?,
        "-h" => {
            ctx.write_str("usage: ls [options]\r\n")?;
            ctx.write_str("options:\r\n")?;
            ctx.write_str("\t -h \t: show help\r\n")?;
            ctx.write_str("\t -v \t: show version\r\n")?;
            ctx.write_str("\t cmd \t: show all commands\r\n")?;
        }
        other => {
            write!(ctx, "ls: unknown option '{}', try 'ls -h'\r\n", other)?;
            return Err(ShellError::BadArguments);
        }
    }
    Ok(())
}

/// Echoes every argument with its position, `argv[1]` being position 0.
pub fn test(ctx: &mut Context<'_>, argv: &Argv<'_>) -> Result<(), ShellError> {
    for (i, arg) in argv.args().enumerate() {
        write!(ctx, "paras {}: {}\r\n", i, arg)?;
    }
    Ok(())
}
