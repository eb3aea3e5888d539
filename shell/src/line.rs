//! Collects console bytes into one line at a time.
//!
//! Accepted input:
//! - printable ASCII `0x20..=0x7E` and tab, appended
//! - `\r` or `\n` ends the line, a `\n` directly after `\r` is swallowed
//! - backspace `0x08` / DEL `0x7F` erase the last byte
//! - Ctrl-C `0x03` cancels the line, an overflowed one included, Ctrl-U `0x15` clears it
//!
//! Everything else is ignored. A line that would grow beyond `N` bytes is
//! dropped as a whole, the bytes up to its terminator are swallowed too.

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;
const CTRL_C: u8 = 0x03;
const CTRL_U: u8 = 0x15;

/// What a single byte did to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feed {
    /// nothing visible happened
    Continue,
    /// the byte was appended
    Appended(u8),
    /// the last byte was removed
    Erased,
    /// a terminator arrived, [LineBuffer::as_str] holds the finished line
    LineReady,
    /// the line ran out of space and was dropped
    Overflow,
    /// terminator of a line that overflowed earlier
    Discarded,
    /// the partial line was cancelled with Ctrl-C
    Cancelled,
}

/// Fixed capacity line buffer.
///
/// After [Feed::LineReady] the buffer keeps the line until [LineBuffer::clear]
/// is called, so tokens can point into it.
pub struct LineBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
    discarding: bool,
    after_cr: bool,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            discarding: false,
            after_cr: false,
        }
    }

    pub fn feed(&mut self, byte: u8) -> Feed {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == b'\r');

        match byte {
            b'\n' if after_cr => Feed::Continue,
            b'\r' | b'\n' => {
                if self.discarding {
                    self.discarding = false;
                    self.len = 0;
                    Feed::Discarded
                } else {
                    Feed::LineReady
                }
            }
            CTRL_C => {
                self.discarding = false;
                self.len = 0;
                Feed::Cancelled
            }
            _ if self.discarding => Feed::Continue,
            BACKSPACE | DELETE => {
                if self.len > 0 {
                    self.len -= 1;
                    Feed::Erased
                } else {
                    Feed::Continue
                }
            }
            CTRL_U => {
                self.len = 0;
                Feed::Continue
            }
            b'\t' | 0x20..=0x7E => {
                if self.len < N {
                    self.buf[self.len] = byte;
                    self.len += 1;
                    Feed::Appended(byte)
                } else {
                    self.len = 0;
                    self.discarding = true;
                    Feed::Overflow
                }
            }
            _ => Feed::Continue,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The buffered line. Only printable ASCII is ever stored, so this is always valid.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// `true` while the rest of an overflowed line is being swallowed.
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}
