//! Touch arcade firmware.
//!
//! - Boot splash, then the games in rotation
//! - Tap the SWITCH button or hold the top-left of the title bar to move on
//!   (with the `game-switch` feature)

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{
    Duration,
    Timer,
};
use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{
            FONT_6X10,
            FONT_10X20,
        },
    },
    pixelcolor::Rgb565,
    prelude::*,
};
use esp_backtrace as _;
use esp_hal::{
    rng::Rng,
    timer::timg::TimerGroup,
};
use esp_println as _;
use touch_arcade::{
    Backlight,
    Display,
    Touch,
    arcade,
    config::ArcadeConfig,
    gfx,
    mk_static,
    split_resources,
};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

fn splash(display: &mut Display<'static>) {
    let big = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);

    gfx::clear(display).unwrap();
    gfx::print(display, "Touch Game", 10, 10, big).unwrap();
    gfx::print(display, "Loading...", 10, 40, big).unwrap();
}

fn mirror_notice(display: &mut Display<'static>) {
    let big = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
    let small = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);

    gfx::clear(display).unwrap();
    gfx::print(display, "Touch Game", 10, 10, big).unwrap();
    gfx::print(display, "Mirror Fix Mode", 10, 40, big).unwrap();
    gfx::print(display, "Touch coordinates will be", 10, 70, small).unwrap();
    gfx::print(display, "automatically mirrored", 10, 85, small).unwrap();
}

#[embassy_executor::task]
async fn arcade_task(display: &'static mut Display<'static>, touch: &'static mut Touch<'static>, mut rng: Rng) {
    let config = ArcadeConfig::DEFAULT;
    let Err(_) = arcade::run(display, touch, &mut rng, &config).await;
    panic!("display write failed");
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = touch_arcade::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let display = mk_static!(Display<'static>, resources.display.into());
    let backlight = mk_static!(Backlight, resources.backlight.into());
    backlight.on();
    info!("Screen size: {}x{}", display.size().width, display.size().height);

    splash(display);
    Timer::after(Duration::from_secs(1)).await;

    let touch = mk_static!(Touch<'static>, resources.touch.into());
    if touch.probe() {
        info!("Touch controller initialized successfully");
    } else {
        info!("Touch controller not available, continuing without touch");
    }

    mirror_notice(display);
    Timer::after(Duration::from_secs(2)).await;

    spawner.must_spawn(arcade_task(display, touch, Rng::new()));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
