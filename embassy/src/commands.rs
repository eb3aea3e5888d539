//! Shell commands of the board, registered next to the built-in ones.
//!
//! - `led [on|off|<ms>]` shows or changes the mode of [USER_LED]
//! - `uptime` prints the time since reset

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Instant;

use cmdshell::{Argv, Command, Context, Registry, ShellError};

use crate::led::{LedMode, USER_LED};

pub static BOARD_COMMANDS: [Command; 2] = [
    Command::new("led", led, "Show or set the LED: led [on|off|<ms>]"),
    Command::new("uptime", uptime, "Show the time since reset"),
];

pub fn register_board_commands<M: RawMutex, const N: usize>(registry: &Registry<M, N>) -> Result<(), ShellError> {
    for command in BOARD_COMMANDS.iter() {
        registry.register(*command)?;
    }
    Ok(())
}

fn led(ctx: &mut Context<'_>, argv: &Argv<'_>) -> Result<(), ShellError> {
    let Some(arg) = argv.get(1) else {
        match USER_LED.mode() {
            LedMode::Off => ctx.write_str("led is off\r\n")?,
            LedMode::On => ctx.write_str("led is on\r\n")?,
            LedMode::Blink(ms) => write!(ctx, "led blinks every {} ms\r\n", ms)?,
        }
        return Ok(());
    };

    match LedMode::parse(arg) {
        Some(mode) => {
            USER_LED.set(mode);
            Ok(())
        }
        None => {
            ctx.write_str("usage: led [on|off|<ms>], ms > 0\r\n")?;
            Err(ShellError::BadArguments)
        }
    }
}

fn uptime(ctx: &mut Context<'_>, _argv: &Argv<'_>) -> Result<(), ShellError> {
    let ms = Instant::now().as_millis();
    write!(ctx, "up {}.{:03} s\r\n", ms / 1000, ms % 1000)?;
    Ok(())
}
