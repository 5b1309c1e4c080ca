//! Main loop controller.
//!
//! One cooperative loop owns every piece of session state: the selected
//! [`Mode`], the display power state and the two deadlines. Each
//! [`Controller::step`] runs, in order:
//!
//! 1. latch this cycle's button flags,
//! 2. refresh the battery indicator when its deadline has passed,
//! 3. switch the display dark once the idle deadline has passed,
//! 4. send the selected shortcut on a trigger (primary button or a rising
//!    edge on either auxiliary input), ending the iteration,
//! 5. handle the secondary button (wake, or next mode),
//! 6. handle a short power-button press (wake, or previous mode).
//!
//! [`Controller::iterate`] follows each step with the fixed loop delay,
//! except after a trigger: the key hold already paced that iteration.

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::battery::percent_from_millivolts;
use crate::catalog::Catalog;
use crate::config::ControllerConfig;
use crate::display::{self, Panel};
use crate::emitter::{self, KeyboardLink};
use crate::input::{AuxInputs, AuxPin, ButtonPress};
use crate::mode::Mode;
use crate::power::{Backlight, PowerManagement};
use crate::storage::ModeStore;
use crate::timer::{Clock, Deadline};


/// Everything the controller drives.
pub struct Hardware<P, K, S, D, A, B, T> {
    pub power: P,
    pub keyboard: K,
    pub store: S,
    pub panel: D,
    pub aux: AuxInputs<A, B>,
    /// Millisecond clock and delay provider.
    pub time: T,
}

/// Mutable session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionState {
    pub mode: Mode,
    pub backlight: Backlight,
    pub idle_deadline: Deadline,
    /// `None` until the first refresh, which happens on the first step.
    pub battery_deadline: Option<Deadline>,
}

/// What one iteration did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// No input this iteration.
    Idle,
    /// The selected shortcut was handed to the keyboard link.
    Emitted,
    /// A mode button switched the display back on.
    Woke,
    /// A mode button selected a new mode.
    ModeChanged(Mode),
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

pub struct Controller<P, K, S, D, A, B, T> {
    hw: Hardware<P, K, S, D, A, B, T>,
    catalog: Catalog,
    config: ControllerConfig,
    state: SessionState,
}

impl<P, K, S, D, A, B, T> Controller<P, K, S, D, A, B, T>
where
    P: PowerManagement,
    K: KeyboardLink,
    S: ModeStore,
    D: Panel,
    A: InputPin,
    B: InputPin,
    T: Clock + DelayNs,
{
    pub fn new(hw: Hardware<P, K, S, D, A, B, T>, catalog: Catalog, config: ControllerConfig) -> Self {
        let now = hw.time.now_ms();
        Self {
            hw,
            catalog,
            config,
            state: SessionState {
                mode: Mode::FIRST,
                backlight: Backlight::On,
                idle_deadline: Deadline::after(now, config.idle_timeout_ms),
                battery_deadline: None,
            },
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn hardware(&self) -> &Hardware<P, K, S, D, A, B, T> {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut Hardware<P, K, S, D, A, B, T> {
        &mut self.hw
    }

    /// Restore the saved mode, light the display, publish the battery
    /// level and draw the first screen.
    pub async fn start(&mut self) {
        let stored = self.hw.store.load().await;
        if usize::from(stored) >= self.catalog.size() {
            warn!("Stored mode {} out of range, using first entry", stored);
        }
        self.state.mode = Mode::from_persisted(stored, self.catalog.size());

        let now = self.hw.time.now_ms();
        self.state.idle_deadline = Deadline::after(now, self.config.idle_timeout_ms);
        self.apply_backlight(Backlight::On);

        let percent = percent_from_millivolts(self.hw.power.battery_millivolts().await);
        self.hw.keyboard.set_battery_level(percent);

        self.redraw();
        info!(
            "Started in mode {}/{}",
            self.state.mode.position(),
            self.catalog.size()
        );
    }

    /// One loop iteration, without the trailing delay.
    pub async fn step(&mut self) -> Action {
        self.hw.power.update();
        let now = self.hw.time.now_ms();

        if self.state.battery_deadline.map_or(true, |due| due.has_passed(now)) {
            self.refresh_battery(now).await;
        }

        if self.state.idle_deadline.has_passed(now) {
            self.apply_backlight(Backlight::Off);
        }

        // Sample all three so both aux latches follow their pins.
        let primary = self.hw.power.primary_pressed();
        let aux_a = self.hw.aux.poll_aux(AuxPin::A);
        let aux_b = self.hw.aux.poll_aux(AuxPin::B);
        if primary | aux_a | aux_b {
            let shortcut = self.catalog.get(self.state.mode);
            emitter::send(
                &mut self.hw.keyboard,
                &mut self.hw.time,
                shortcut,
                self.config.key_hold_ms,
            )
            .await;
            return Action::Emitted;
        }

        let mut action = Action::Idle;
        if self.hw.power.secondary_pressed() {
            action = self.mode_button(Direction::Forward).await;
        }
        if self.hw.power.power_button() == ButtonPress::Short {
            action = self.mode_button(Direction::Backward).await;
        }
        action
    }

    /// One step, then the loop delay unless the step sent a shortcut.
    pub async fn iterate(&mut self) -> Action {
        let action = self.step().await;
        if action != Action::Emitted {
            self.hw.time.delay_ms(self.config.loop_interval_ms).await;
        }
        action
    }

    /// Start, then iterate forever.
    pub async fn run(&mut self) -> ! {
        self.start().await;
        loop {
            self.iterate().await;
        }
    }

    async fn mode_button(&mut self, direction: Direction) -> Action {
        let action = if self.state.backlight == Backlight::Off {
            self.apply_backlight(Backlight::On);
            Action::Woke
        } else {
            let size = self.catalog.size();
            self.state.mode = match direction {
                Direction::Forward => self.state.mode.next(size),
                Direction::Backward => self.state.mode.prev(size),
            };
            self.hw.store.save(self.state.mode.as_byte()).await;
            self.redraw();
            debug!("Mode {}/{}", self.state.mode.position(), size);
            Action::ModeChanged(self.state.mode)
        };

        let now = self.hw.time.now_ms();
        self.state.idle_deadline = Deadline::after(now, self.config.idle_timeout_ms);
        action
    }

    async fn refresh_battery(&mut self, now: u64) {
        let millivolts = self.hw.power.battery_millivolts().await;
        let percent = percent_from_millivolts(millivolts);
        debug!("Battery {} mV ({}%)", millivolts, percent);

        if display::render_battery(&mut self.hw.panel, percent).is_err() {
            warn!("Battery indicator draw failed");
        }
        self.hw.panel.present();
        self.hw.keyboard.set_battery_level(percent);

        self.state.battery_deadline = Some(Deadline::after(now, self.config.battery_refresh_ms));
    }

    /// Re-applied on every idle iteration; only transitions are logged.
    fn apply_backlight(&mut self, backlight: Backlight) {
        if self.state.backlight != backlight {
            info!("Display {}", backlight);
        }
        self.state.backlight = backlight;
        self.hw.panel.set_backlight(backlight == Backlight::On);
    }

    fn redraw(&mut self) {
        if display::render_index_and_title(&mut self.hw.panel, self.state.mode, &self.catalog).is_err() {
            warn!("Mode screen draw failed");
        }
        self.hw.panel.present();
    }
}
