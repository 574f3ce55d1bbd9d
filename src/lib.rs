//! # touch-arcade
//!
//! Four reflex mini-games for a 320×240 touchscreen, with particle bursts and
//! ripples as hit feedback.
//!
//! The game core is hardware independent: it draws on any
//! `embedded_graphics` [`DrawTarget`](embedded_graphics::draw_target::DrawTarget)
//! in `Rgb565`, reads touches through [`touch::PointerSampler`] and gets its
//! randomness from [`rng::Entropy`]. With the `board` feature the crate also
//! brings up the ESP32-S3 target:
//! - **Display**: 240×320 ILI9341 over SPI with DMA, used in landscape
//! - **Touch**: XPT2046 resistive controller on its own SPI bus
//! - **Backlight**: GPIO-driven, configurable active level
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = touch_arcade::init();
//! let resources = touch_arcade::split_resources!(peripherals);
//!
//! let mut display: touch_arcade::Display = resources.display.into();
//! let mut touch: touch_arcade::Touch = resources.touch.into();
//! let mut rng = esp_hal::rng::Rng::new();
//! touch_arcade::arcade::run(&mut display, &mut touch, &mut rng, &ArcadeConfig::DEFAULT).await;
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod arcade;
pub mod config;
pub mod effects;
pub mod games;
pub mod gfx;
pub mod hud;
pub mod rng;
pub mod session;
pub mod switch;
pub mod touch;
pub mod xpt2046;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(feature = "board")]
mod backlight;
#[cfg(feature = "board")]
mod display;

#[cfg(feature = "board")]
pub use board::*;

#[cfg(feature = "board")]
mod board {
    use embedded_hal_bus::spi::ExclusiveDevice;
    use esp_hal::{
        Blocking,
        assign_resources,
        clock::CpuClock,
        delay::Delay,
        gpio::{
            Level,
            Output,
            OutputConfig,
        },
        spi::master::{
            Config,
            Spi,
        },
        time::Rate,
    };

    pub use crate::{
        backlight::Backlight,
        display::Display,
    };
    use crate::{
        config::SCREEN,
        xpt2046::{
            Calibration,
            Xpt2046,
        },
    };

    /// The touch controller on its dedicated SPI bus.
    pub type Touch<'a> = Xpt2046<ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, Delay>>;

    /// StaticCell helper: allocates a value into a `static` exactly once.
    #[macro_export]
    macro_rules! mk_static {
        ($t:ty, $val:expr) => {{
            static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
            #[deny(unused_attributes)]
            let x = STATIC_CELL.uninit().write($val);
            x
        }};
    }

    // ── Pin / peripheral assignments ────────────────────────────────────────

    assign_resources! {
        pub Resources<'d> {
            display: DisplayResources<'d> {
                dc: GPIO4,
                rst: GPIO5,
                sck: GPIO2,
                cs: GPIO3,
                miso: GPIO8,
                mosi: GPIO1,
                spi: SPI2,
                dma: DMA_CH0,
            },
            backlight: BacklightResources<'d> {
                led: GPIO6,
            },
            touch: TouchResources<'d> {
                cs: GPIO7,
                sck: GPIO42,
                mosi: GPIO45,
                miso: GPIO46,
                spi: SPI3,
            }
        }
    }

    // ── Board initialisation ────────────────────────────────────────────────

    /// Initialise the hardware and return the raw peripheral set.
    ///
    /// Call this once at the top of `main`, then use [`split_resources!`] to
    /// break the peripherals into typed resource groups.
    #[must_use]
    pub fn init() -> esp_hal::peripherals::Peripherals {
        let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
        esp_hal::init(config)
    }

    // ── Resource → peripheral conversions ───────────────────────────────────

    impl From<esp_hal::peripherals::Peripherals> for Resources<'_> {
        fn from(peripherals: esp_hal::peripherals::Peripherals) -> Self {
            split_resources!(peripherals)
        }
    }

    impl<'a> From<TouchResources<'a>> for Touch<'a> {
        fn from(res: TouchResources<'a>) -> Self {
            let spi = Spi::new(res.spi, Config::default().with_frequency(Rate::from_mhz(1)))
                .unwrap()
                .with_sck(res.sck)
                .with_mosi(res.mosi)
                .with_miso(res.miso);
            let cs = Output::new(res.cs, Level::High, OutputConfig::default());
            let device = ExclusiveDevice::new(spi, cs, Delay::new()).unwrap();
            Xpt2046::new(device, Calibration::DEFAULT, SCREEN)
        }
    }
}
