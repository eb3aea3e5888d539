//! End to end console sessions: bytes in through a channel, text out through a pipe.

use core::fmt::Write;

use cmdshell::{
    Argv, ChannelSource, Command, Context, Dispatch, Event, PipePrinter, Registry, Shell, ShellConfig, ShellError,
    ShellState, BUILTINS,
};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;

const QUIET: ShellConfig = ShellConfig {
    prompt: "",
    banner: None,
    echo: false,
    poll_budget: 64,
};

/// Pushes `input` through a fresh shell over `BUILTINS` and returns the console output.
fn session(input: &[u8]) -> String {
    let rx: Channel<NoopRawMutex, u8, 256> = Channel::new();
    let tx: Pipe<NoopRawMutex, 1024> = Pipe::new();
    let mut shell: Shell<'_, _> = Shell::new(&BUILTINS, QUIET);

    let mut source = ChannelSource::new(&rx);
    let mut printer = PipePrinter::new(&tx);
    for chunk in input.chunks(32) {
        for b in chunk {
            rx.try_send(*b).unwrap();
        }
        while shell.poll(&mut source, &mut printer).unwrap() > 0 {}
    }

    let mut buf = [0u8; 1024];
    let n = tx.try_read(&mut buf).unwrap_or(0);
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

#[test]
fn help_lists_help_and_version() {
    let out = session(b"help\n");
    let lines: Vec<&str> = out.lines().map(str::trim).collect();
    assert!(lines.contains(&"help - Show this help message"));
    assert!(lines.contains(&"version - Show version information"));
}

#[test]
fn help_twice_prints_the_same_text() {
    let once = session(b"help\n");
    let twice = session(b"help\nhelp\n");
    assert_eq!(twice, format!("{once}{once}"));
}

#[test]
fn ls_cmd_lists_every_command() {
    let out = session(b"ls cmd\n");
    let expected: String = BUILTINS
        .iter()
        .map(|c| format!("{} : {}\r\n", c.name, c.description))
        .collect();
    assert_eq!(out, expected);
}

#[test]
fn ls_without_arguments() {
    assert_eq!(session(b"ls\n"), "ls need more arguments!\r\n");
}

#[test]
fn test_prints_one_line_per_argument() {
    let out = session(b"test a b c\n");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, ["paras 0: a", "paras 1: b", "paras 2: c"]);
}

#[test]
fn unknown_command_is_named() {
    let out = session(b"frobnicate\n");
    assert_eq!(out, "frobnicate: command not found\r\n");
    // the table is untouched and still works
    assert_eq!(session(b"frobnicate\nls -v\n"), "frobnicate: command not found\r\nls version 1.0.\r\n");
}

#[test]
fn backspace_first_is_a_noop() {
    let mut shell: Shell<'_, _> = Shell::new(&BUILTINS, QUIET);
    let mut out = String::new();
    assert_eq!(shell.feed(0x08, &mut out), Ok(Event::Pending));
    assert_eq!(shell.state(), ShellState::Idle);
    assert!(out.is_empty());

    // and the next line is unaffected
    assert_eq!(session(b"\x08\x7fversion\r\n"), cmdshell::builtins::VERSION_BANNER);
}

#[test]
fn overlong_input_without_terminator_never_dispatches() {
    let mut shell: Shell<'_, _, 32, 10> = Shell::new(&BUILTINS, QUIET);
    let mut out = String::new();

    let mut events = Vec::new();
    for _ in 0..3 {
        for b in b"test aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa " {
            events.push(shell.feed(*b, &mut out).unwrap());
        }
    }
    assert_eq!(events.iter().filter(|e| **e == Event::Overflow).count(), 1);
    assert!(!events.iter().any(|e| matches!(e, Event::Dispatched(_))));
    assert_eq!(out, "\r\nerror: input exceeds 32 bytes, line discarded\r\n");

    assert_eq!(shell.feed(b'\n', &mut out), Ok(Event::Discarded));
    assert_eq!(shell.state(), ShellState::Idle);
}

#[test]
fn blank_lines_print_nothing() {
    assert_eq!(session(b"\n \n\t\t\n\r\n"), "");
}

#[test]
fn interactive_session_with_echo() {
    let rx: Channel<NoopRawMutex, u8, 64> = Channel::new();
    let tx: Pipe<NoopRawMutex, 512> = Pipe::new();
    let config = ShellConfig {
        banner: Some("board ready\r\n"),
        ..ShellConfig::default()
    };
    let mut shell: Shell<'_, _> = Shell::new(&BUILTINS, config);
    let mut printer = PipePrinter::new(&tx);
    shell.activate(&mut printer).unwrap();

    for b in b"ls -v\r\n" {
        rx.try_send(*b).unwrap();
    }
    let mut source = ChannelSource::new(&rx);
    // the poll ends with the line, the trailing '\n' is swallowed by the next one
    assert_eq!(shell.poll(&mut source, &mut printer), Ok(6));
    assert_eq!(shell.poll(&mut source, &mut printer), Ok(1));

    let mut buf = [0u8; 512];
    let n = tx.try_read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"board ready\r\n> ls -v\r\nls version 1.0.\r\n> ");
}

static LED_ON: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

fn led(ctx: &mut Context<'_>, argv: &Argv<'_>) -> Result<(), ShellError> {
    match argv.get(1) {
        Some("on") => LED_ON.store(true, std::sync::atomic::Ordering::Relaxed),
        Some("off") => LED_ON.store(false, std::sync::atomic::Ordering::Relaxed),
        _ => {
            ctx.write_str("usage: led on|off\r\n")?;
            return Err(ShellError::BadArguments);
        }
    }
    Ok(())
}

static REGISTRY: Registry<CriticalSectionRawMutex, 2> = Registry::new(&BUILTINS);

#[test]
fn registered_commands_are_dispatched_and_listed() {
    REGISTRY.register(Command::new("led", led, "Switch the LED")).unwrap();

    let mut shell: Shell<'_, _> = Shell::new(&REGISTRY, QUIET);
    let mut out = String::new();
    let mut last = Event::Pending;
    for b in b"led on\n" {
        last = shell.feed(*b, &mut out).unwrap();
    }
    assert_eq!(last, Event::Dispatched(Dispatch::Matched("led")));
    assert!(LED_ON.load(std::sync::atomic::Ordering::Relaxed));

    for b in b"led\nls cmd\n" {
        shell.feed(*b, &mut out).unwrap();
    }
    assert!(out.starts_with("usage: led on|off\r\n"));
    assert!(out.ends_with("version : Show version information\r\nled : Switch the LED\r\n"));
}

fn board_led(_: &mut Context<'_>, _: &Argv<'_>) -> Result<(), ShellError> {
    Ok(())
}

static BOARD: Registry<CriticalSectionRawMutex, 4> = Registry::new(&BUILTINS);

/// Sizes of the NUCLEO console: 64 bytes in, 512 bytes out, drained between turns.
#[test]
fn pasted_commands_each_get_a_drained_console() {
    BOARD.register(Command::new("led", board_led, "Show or set the LED: led [on|off|<ms>]")).unwrap();
    BOARD.register(Command::new("uptime", board_led, "Show the time since reset")).unwrap();

    let rx: Channel<NoopRawMutex, u8, 64> = Channel::new();
    let tx: Pipe<NoopRawMutex, 512> = Pipe::new();
    let mut shell: Shell<'_, _> = Shell::new(&BOARD, ShellConfig::default());
    let mut source = ChannelSource::new(&rx);
    let mut printer = PipePrinter::new(&tx);

    for b in b"help\rhelp\rhelp\r" {
        rx.try_send(*b).unwrap();
    }

    let mut console = Vec::new();
    let mut buf = [0u8; 512];
    loop {
        let n = shell.poll(&mut source, &mut printer).unwrap();
        while let Ok(len) = tx.try_read(&mut buf) {
            console.extend_from_slice(&buf[..len]);
        }
        if n == 0 {
            break;
        }
    }

    let console = String::from_utf8(console).unwrap();
    assert_eq!(console.matches("Available commands:").count(), 3);
    assert_eq!(console.matches("uptime - Show the time since reset").count(), 3);
    assert!(console.ends_with("since reset\r\n> "));
}

/// A paste longer than the receive channel is taken in as fast as it is refilled.
#[test]
fn long_paste_through_a_small_channel() {
    let rx: Channel<NoopRawMutex, u8, 64> = Channel::new();
    let mut shell: Shell<'_, _> = Shell::new(&BUILTINS, QUIET);
    let mut source = ChannelSource::new(&rx);
    let mut out = String::new();

    let mut paste = Vec::new();
    for _ in 0..4 {
        paste.extend_from_slice(b"test alpha beta gamma delta epsilon\r");
    }
    paste.extend_from_slice(b"ls -v\r");
    let mut pending = paste.iter().copied().peekable();

    let mut turns = 0;
    while pending.peek().is_some() || !rx.is_empty() {
        while let Some(b) = pending.peek() {
            if rx.try_send(*b).is_err() {
                break;
            }
            pending.next();
        }
        shell.poll(&mut source, &mut out).unwrap();
        turns += 1;
    }

    assert_eq!(out.matches("paras 4: epsilon\r\n").count(), 4);
    assert!(out.ends_with("ls version 1.0.\r\n"));
    // each turn runs exactly one of the pasted lines
    assert_eq!(turns, 5);
}
