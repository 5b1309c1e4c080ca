//! One Button Keyboard firmware for nRF52840.
//!
//! Task layout:
//! - `softdevice_task`: runs the SoftDevice event loop
//! - `ble_task`: advertising and the GATT server
//! - main: the shortcut control loop, until a long power press

#![no_std]
#![no_main]

mod ble;
mod board;
mod ui;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::{bind_interrupts, interrupt, peripherals, saadc, twim};
use nrf_softdevice::{Flash, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use one_button_keyboard::config::{self, ControllerConfig};
use one_button_keyboard::controller::{Controller, Hardware};
use one_button_keyboard::display::Panel;
use one_button_keyboard::input::AuxInputs;
use one_button_keyboard::storage::FlashModeStore;
use one_button_keyboard::Catalog;

use crate::ble::hid_service::Server;
use crate::ble::keyboard::BleKeyboard;
use crate::ble::LinkState;
use crate::board::{BoardPower, EmbassyTime};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server, link: &'static LinkState) -> ! {
    ble::run(sd, server, link).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("one-button-keyboard starting");

    // Priorities 0, 1 and 4 belong to the SoftDevice.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    nrf_config.hfclk_source = embassy_nrf::config::HfclkSource::ExternalXtal;
    nrf_config.dcdc.reg1 = true;
    let p = embassy_nrf::init(nrf_config);
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::TWISPI0.set_priority(Priority::P3);

    // BLE
    let sd = Softdevice::enable(&ble::softdevice_config());
    static SERVER: StaticCell<Server> = StaticCell::new();
    let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
    static LINK: StaticCell<LinkState> = StaticCell::new();
    let link: &'static LinkState = LINK.init(LinkState::new());
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(ble_task(sd, server, link)));

    // Buttons and aux inputs
    let primary = Input::new(p.P0_11, Pull::Up);
    let secondary = Input::new(p.P0_12, Pull::Up);
    let power_button = Input::new(p.P0_24, Pull::Up);
    let aux_a = Input::new(p.P0_02, Pull::Down);
    let aux_b = Input::new(p.P0_03, Pull::Down);

    // Battery sense on P0.29 / AIN5
    let channel = saadc::ChannelConfig::single_ended(p.P0_29);
    let mut adc = saadc::Saadc::new(p.SAADC, Irqs, saadc::Config::default(), [channel]);
    adc.calibrate().await;

    // Display
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let panel = unwrap!(ui::display::init(i2c));

    let store = FlashModeStore::new(Flash::take(sd), config::STORAGE_START..config::STORAGE_END);

    let hw = Hardware {
        power: BoardPower::new(primary, secondary, power_button, adc),
        keyboard: BleKeyboard::new(sd, server, link),
        store,
        panel,
        aux: AuxInputs::new(aux_a, aux_b),
        time: EmbassyTime,
    };
    let mut controller = Controller::new(hw, Catalog::builtin(), ControllerConfig::default());

    let outcome = select(controller.run(), board::POWER_OFF.wait()).await;
    if let Either::First(never) = outcome {
        match never {}
    }

    controller.hardware_mut().panel.set_backlight(false);
    board::system_off();
}
