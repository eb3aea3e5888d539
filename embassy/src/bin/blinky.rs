//! Plain LED example: the green user LED blinks, the user button makes it faster.
//!
//! This runs on a NUCLEO-F767ZI, progress is logged over RTT

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::{
    exti::ExtiInput,
    gpio::{AnyPin, Level, Output, Pin, Pull, Speed},
};
use {defmt_rtt as _, panic_probe as _};

use nucleo_f767zi::led::{self, LedMode, DEFAULT_BLINK_MS, USER_LED};

#[embassy_executor::task]
async fn led_task(pin: AnyPin) {
    let led = Output::new(pin, Level::Low, Speed::Low);
    led::drive_led(led, &USER_LED).await;
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    defmt::info!("RTT initialized");

    let mut button = ExtiInput::new(p.PC13, p.EXTI13, Pull::Down);

    spawner.spawn(led_task(p.PB0.degrade())).unwrap();

    let mut period = DEFAULT_BLINK_MS;
    loop {
        button.wait_for_rising_edge().await;
        period -= 300;
        if period < 500 {
            period = DEFAULT_BLINK_MS;
        }
        USER_LED.set(LedMode::Blink(period));
    }
}
