//! The LED example with a command shell on the ST-LINK virtual COM port (115200 8N1).
//!
//! Tasks: the LED driver, one UART task for each direction and the shell itself,
//! which polls the received bytes every few ms. Type `help` to get started.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{AnyPin, Level, Output, Pin, Speed};
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{Config as UsartConfig, RingBufferedUartRx, Uart, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;
use embassy_time::Duration;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cmdshell::{ChannelSource, PipePrinter, Registry, Shell, ShellConfig, BUILTINS};

use nucleo_f767zi::commands::register_board_commands;
use nucleo_f767zi::console::{self, ConsoleRx, ConsoleTx, ConsoleYield, RX_DMA_CAPACITY};
use nucleo_f767zi::led::{self, USER_LED};
use nucleo_f767zi::setup_usart_developer_console;

const POLL_INTERVAL_MS: u64 = 10;

const BANNER: &str = "\r\nNUCLEO-F767ZI shell, type 'help' for commands\r\n";

static CONSOLE_RX: ConsoleRx = Channel::new();
static CONSOLE_TX: ConsoleTx = Pipe::new();
static CONSOLE_RX_DMA: StaticCell<[u8; RX_DMA_CAPACITY]> = StaticCell::new();

static COMMANDS: Registry<CriticalSectionRawMutex, 4> = Registry::new(&BUILTINS);

#[embassy_executor::task]
async fn led_task(pin: AnyPin) {
    let led = Output::new(pin, Level::Low, Speed::Low);
    led::drive_led(led, &USER_LED).await;
}

#[embassy_executor::task]
async fn console_rx_task(mut usart_rx: RingBufferedUartRx<'static>) {
    console::pump_rx(&mut usart_rx, &CONSOLE_RX).await;
}

#[embassy_executor::task]
async fn console_tx_task(mut usart_tx: UartTx<'static, Async>) {
    console::drain_tx(&mut usart_tx, &CONSOLE_TX).await;
}

#[embassy_executor::task]
async fn shell_task() {
    let config = ShellConfig {
        banner: Some(BANNER),
        ..ShellConfig::default()
    };
    let mut shell: Shell<'_, _> = Shell::new(&COMMANDS, config);
    let mut source = ChannelSource::new(&CONSOLE_RX);
    let mut printer = PipePrinter::new(&CONSOLE_TX);

    if let Err(err) = shell.activate(&mut printer) {
        defmt::warn!("could not greet: {}", err);
    }
    let pause = ConsoleYield {
        rx: &CONSOLE_RX,
        tx: &CONSOLE_TX,
        idle: Duration::from_millis(POLL_INTERVAL_MS),
    };
    shell.run(&mut source, &mut printer, pause).await;
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    defmt::info!("RTT initialized");

    bind_interrupts!(struct Irqs {
        USART3 => embassy_stm32::usart::InterruptHandler<embassy_stm32::peripherals::USART3>;
    });

    register_board_commands(&COMMANDS).unwrap();

    spawner.spawn(led_task(p.PB0.degrade())).unwrap();

    let usart = setup_usart_developer_console!(p, Irqs, UsartConfig::default());
    let (tx, rx) = usart.split();
    let rx = rx.into_ring_buffered(CONSOLE_RX_DMA.init([0; RX_DMA_CAPACITY]));
    spawner.spawn(console_rx_task(rx)).unwrap();
    spawner.spawn(console_tx_task(tx)).unwrap();

    spawner.spawn(shell_task()).unwrap();
}
