//! Panel backlight on a plain GPIO.

use esp_hal::gpio::{
    Level,
    Output,
    OutputConfig,
};

use crate::BacklightResources;

/// Backlight switch. Some panels light up on a low pin, so the active level
/// is part of the state.
pub struct Backlight {
    pin: Output<'static>,
    active: Level,
}

impl Backlight {
    /// Take the pin and switch the light on.
    pub fn new(res: BacklightResources<'static>, active: Level) -> Self {
        Self {
            pin: Output::new(res.led, active, OutputConfig::default()),
            active,
        }
    }

    pub fn on(&mut self) {
        self.pin.set_level(self.active);
    }

    pub fn off(&mut self) {
        let idle = match self.active {
            Level::High => Level::Low,
            Level::Low => Level::High,
        };
        self.pin.set_level(idle);
    }

    pub fn is_on(&self) -> bool {
        self.pin.is_set_high() == (self.active == Level::High)
    }
}

impl From<BacklightResources<'static>> for Backlight {
    fn from(res: BacklightResources<'static>) -> Self {
        Self::new(res, Level::High)
    }
}
