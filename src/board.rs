//! Board support: buttons, battery sensing, power-off and time.
//!
//! Buttons are active-low with internal pull-ups and are sampled once per
//! control loop iteration in [`BoardPower::update`]; the 100 ms loop
//! period doubles as the debounce interval.
//!
//! nRF52840 power modes used here:
//! - System ON: normal operation, BLE active
//! - System OFF: deep sleep (~0.3 µA), woken by the power button

use defmt::info;
use embassy_nrf::gpio::Input;
use embassy_nrf::pac;
use embassy_nrf::saadc::Saadc;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal_async::delay::DelayNs;

use one_button_keyboard::battery::millivolts_from_adc;
use one_button_keyboard::config::{POWER_BUTTON_PIN, POWER_LONG_PRESS_MS};
use one_button_keyboard::input::{ButtonPress, EdgeLatch, HoldTracker};
use one_button_keyboard::power::PowerManagement;
use one_button_keyboard::timer::Clock;

/// Raised when the power button is held long enough to switch off.
pub static POWER_OFF: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Buttons and battery sense of the board.
pub struct BoardPower {
    primary: Input<'static>,
    secondary: Input<'static>,
    power: Input<'static>,
    adc: Saadc<'static, 1>,
    primary_latch: EdgeLatch,
    secondary_latch: EdgeLatch,
    power_hold: HoldTracker,
    primary_pressed: bool,
    secondary_pressed: bool,
    power_press: ButtonPress,
}

impl BoardPower {
    pub fn new(
        primary: Input<'static>,
        secondary: Input<'static>,
        power: Input<'static>,
        adc: Saadc<'static, 1>,
    ) -> Self {
        let mut power_hold = HoldTracker::new(POWER_LONG_PRESS_MS);
        // The press that woke us from System OFF may still be held.
        if power.is_low() {
            power_hold.swallow_press(Instant::now().as_millis());
        }

        Self {
            primary,
            secondary,
            power,
            adc,
            primary_latch: EdgeLatch::new(),
            secondary_latch: EdgeLatch::new(),
            power_hold,
            primary_pressed: false,
            secondary_pressed: false,
            power_press: ButtonPress::None,
        }
    }
}

impl PowerManagement for BoardPower {
    fn update(&mut self) {
        let now = Instant::now().as_millis();
        self.primary_pressed = self.primary_latch.sample(self.primary.is_low());
        self.secondary_pressed = self.secondary_latch.sample(self.secondary.is_low());
        self.power_press = self.power_hold.sample(self.power.is_low(), now);

        if self.power_press == ButtonPress::Long {
            info!("Power button held, switching off");
            POWER_OFF.signal(());
        }
    }

    fn primary_pressed(&self) -> bool {
        self.primary_pressed
    }

    fn secondary_pressed(&self) -> bool {
        self.secondary_pressed
    }

    fn power_button(&self) -> ButtonPress {
        self.power_press
    }

    async fn battery_millivolts(&mut self) -> u16 {
        let mut buf = [0i16; 1];
        self.adc.sample(&mut buf).await;
        millivolts_from_adc(buf[0])
    }
}

/// Enter System OFF. A press of the power button resets the chip.
pub fn system_off() -> ! {
    info!("Entering System OFF");
    pac::P0.pin_cnf(POWER_BUTTON_PIN).write(|w| {
        w.set_dir(pac::gpio::vals::Dir::INPUT);
        w.set_input(pac::gpio::vals::Input::CONNECT);
        w.set_pull(pac::gpio::vals::Pull::PULLUP);
        w.set_sense(pac::gpio::vals::Sense::LOW);
    });

    // SAFETY: the SoftDevice is enabled, so System OFF must go through it.
    // It does not return on success.
    unsafe {
        nrf_softdevice::raw::sd_power_system_off();
    }
    loop {
        cortex_m::asm::wfe();
    }
}

/// Embassy time as the controller's clock and delay.
pub struct EmbassyTime;

impl Clock for EmbassyTime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

impl DelayNs for EmbassyTime {
    async fn delay_ns(&mut self, ns: u32) {
        Timer::after(Duration::from_nanos(u64::from(ns))).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        Timer::after(Duration::from_millis(u64::from(ms))).await;
    }
}
