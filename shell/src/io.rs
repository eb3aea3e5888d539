//! The console seams of the shell: where bytes come from, where text goes to and
//! how the loop gives the processor back.
//!
//! Any [core::fmt::Write] is a printer. The adapters here connect the shell to
//! `embassy_sync` queues so the actual UART or RTT work can live in other tasks.

use core::fmt;
use core::future::Future;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;

use heapless::Deque;

/// A non-blocking source of input bytes.
pub trait CharSource {
    /// `true` when [CharSource::read_byte] has a byte to hand out.
    fn has_byte(&mut self) -> bool;

    /// Takes the next byte. Only meaningful right after `has_byte` returned `true`,
    /// an empty source returns 0.
    fn read_byte(&mut self) -> u8;
}

impl<const N: usize> CharSource for Deque<u8, N> {
    fn has_byte(&mut self) -> bool {
        !self.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.pop_front().unwrap_or(0)
    }
}

/// Reads the receiving end of a byte channel without ever waiting on it.
pub struct ChannelSource<'a, M: RawMutex, const N: usize> {
    channel: &'a Channel<M, u8, N>,
}

impl<'a, M: RawMutex, const N: usize> ChannelSource<'a, M, N> {
    pub fn new(channel: &'a Channel<M, u8, N>) -> Self {
        Self { channel }
    }
}

impl<M: RawMutex, const N: usize> CharSource for ChannelSource<'_, M, N> {
    fn has_byte(&mut self) -> bool {
        !self.channel.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.channel.try_receive().unwrap_or(0)
    }
}

/// Printer that pushes text into a pipe drained by some transmit task.
///
/// Writing never waits. If the pipe cannot take the whole string the write fails
/// with [fmt::Error] and whatever did fit stays in the pipe.
pub struct PipePrinter<'a, M: RawMutex, const N: usize> {
    pipe: &'a Pipe<M, N>,
}

impl<'a, M: RawMutex, const N: usize> PipePrinter<'a, M, N> {
    pub fn new(pipe: &'a Pipe<M, N>) -> Self {
        Self { pipe }
    }
}

impl<M: RawMutex, const N: usize> fmt::Write for PipePrinter<'_, M, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            match self.pipe.try_write(bytes) {
                Ok(n) => bytes = &bytes[n..],
                Err(_) => return Err(fmt::Error),
            }
        }
        Ok(())
    }
}

/// The cooperative suspension point of the shell loop.
///
/// [crate::Shell::run] awaits this once per poll so tasks of the same or lower
/// priority get to run between two polls.
pub trait Yielder {
    fn yield_now(&mut self) -> impl Future<Output = ()>;
}

/// Hands control back to the executor exactly once.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutorYield;

impl Yielder for ExecutorYield {
    fn yield_now(&mut self) -> impl Future<Output = ()> {
        embassy_futures::yield_now()
    }
}
