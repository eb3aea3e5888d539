//! Supports hardware agnostic control and synchronized state management for LEDs
//!
//! An LED is either off, on or blinking with a period in ms as encoded in [LedMode].
//! [LedControl] holds the mode so it can be changed from any task, or from a shell
//! command, and wakes the task driving the LED.
//!
//! The function [drive_led] may be wrapped by an embassy task to add the functionality to an LED

use core::cell::Cell;

use embassy_stm32::gpio::Output;

use embassy_time::{Duration, Timer};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use embassy_futures::select::select;

/// blink period of the board LED after reset
pub const DEFAULT_BLINK_MS: u32 = 2000;

#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LedMode {
    Off,
    On,
    /// the led toggles every specified amount of ms
    Blink(u32),
}

impl Default for LedMode {
    fn default() -> Self {
        LedMode::Blink(DEFAULT_BLINK_MS)
    }
}

impl LedMode {
    /// `on`, `off` or a blink period in ms. A period of 0 is rejected.
    pub fn parse(txt: &str) -> Option<LedMode> {
        match txt {
            "off" => Some(LedMode::Off),
            "on" => Some(LedMode::On),
            other => match other.parse() {
                Ok(0) | Err(_) => None,
                Ok(ms) => Some(LedMode::Blink(ms)),
            },
        }
    }
}

/// The user LED driven by the binaries, blinking after reset.
pub static USER_LED: LedControl = LedControl::new(LedMode::Blink(DEFAULT_BLINK_MS));

/// Shared mode of one LED plus the signal waking its driver.
pub struct LedControl {
    mode: Mutex<CriticalSectionRawMutex, Cell<LedMode>>,
    changed: Signal<CriticalSectionRawMutex, ()>,
}

impl LedControl {
    pub const fn new(mode: LedMode) -> Self {
        Self {
            mode: Mutex::new(Cell::new(mode)),
            changed: Signal::new(),
        }
    }

    pub fn mode(&self) -> LedMode {
        self.mode.lock(|m| m.get())
    }

    /// Never blocks, usable from interrupt context and shell commands alike.
    pub fn set(&self, mode: LedMode) {
        self.mode.lock(|m| m.set(mode));
        self.changed.signal(());
        defmt::info!("LED mode set to {}", mode);
    }
}

/// Applies the mode of `control` to `led`, forever.
pub async fn drive_led(mut led: Output<'_>, control: &LedControl) {
    loop {
        match control.mode() {
            LedMode::Off => {
                led.set_low();
                control.changed.wait().await;
            }
            LedMode::On => {
                led.set_high();
                control.changed.wait().await;
            }
            LedMode::Blink(ms) => {
                led.toggle();
                defmt::info!("LED toggled");
                let f1 = Timer::after(Duration::from_millis(ms.into()));
                let f2 = control.changed.wait();
                select(f1, f2).await;
            }
        }
    }
}
