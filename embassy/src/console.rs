//! The developer console on USART3, which the ST-LINK exposes as a virtual COM port.
//!
//! UART traffic is async while the shell polls synchronously, so two small tasks sit
//! in between: [pump_rx] moves received bytes into a [ConsoleRx] channel that the
//! shell reads through `ChannelSource`, [drain_tx] sends whatever the shell wrote
//! into the [ConsoleTx] pipe.
//!
//! Reception runs on a circular DMA buffer of [RX_DMA_CAPACITY] bytes, so the USART
//! keeps receiving while [pump_rx] waits for room in the channel.

use embassy_stm32::mode::Async;
use embassy_stm32::usart::{RingBufferedUartRx, UartTx};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;

use embassy_time::{Duration, Timer};

use cmdshell::Yielder;

pub const RX_CAPACITY: usize = 64;
pub const RX_DMA_CAPACITY: usize = 256;
pub const TX_CAPACITY: usize = 512;

/// how often [ConsoleYield] checks whether the last output went out
const TX_FLUSH_POLL: Duration = Duration::from_millis(1);

pub type ConsoleRx = Channel<CriticalSectionRawMutex, u8, RX_CAPACITY>;
pub type ConsoleTx = Pipe<CriticalSectionRawMutex, TX_CAPACITY>;

#[macro_export]
macro_rules! setup_usart_developer_console {
    ($p:ident, $irqs:ident, $config:expr) => {
        // setup usart
        Uart::new(
            $p.USART3,
            $p.PD9, // rx
            $p.PD8, // tx
            $irqs,
            $p.DMA1_CH4, // tx
            $p.DMA1_CH1, // rx
            $config,
        ).expect("USART generation failed")
    }
}

/// Forwards every received byte to `rx`. Waits while the shell has not caught up,
/// the DMA ring keeps filling meanwhile.
pub async fn pump_rx(usart_rx: &mut RingBufferedUartRx<'static>, rx: &ConsoleRx) {
    let mut buf: [u8; 32] = [0; 32];
    loop {
        match usart_rx.read(&mut buf).await {
            Ok(len) => {
                for byte in &buf[..len] {
                    rx.send(*byte).await;
                }
            }
            Err(err) => {
                defmt::warn!("USART receive error {}, input was lost", err);
            }
        }
    }
}

/// Writes everything the shell prints to the UART.
pub async fn drain_tx(usart_tx: &mut UartTx<'static, Async>, tx: &ConsoleTx) {
    let mut buf: [u8; 64] = [0; 64];
    loop {
        let len = tx.read(&mut buf).await;
        if let Err(err) = usart_tx.write(&buf[..len]).await {
            defmt::warn!("USART transmit error {}, {} bytes lost", err, len);
        }
    }
}

/// Pause between two shell polls: waits until the previous output left the pipe,
/// then sleeps `idle` if nothing was typed, otherwise only lets the other tasks run.
pub struct ConsoleYield<'a> {
    pub rx: &'a ConsoleRx,
    pub tx: &'a ConsoleTx,
    pub idle: Duration,
}

impl Yielder for ConsoleYield<'_> {
    async fn yield_now(&mut self) {
        while !self.tx.is_empty() {
            Timer::after(TX_FLUSH_POLL).await;
        }
        if self.rx.is_empty() {
            Timer::after(self.idle).await
        } else {
            embassy_futures::yield_now().await
        }
    }
}
