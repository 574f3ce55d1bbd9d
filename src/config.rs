//! Compile-time settings for the arcade.

use embassy_time::Duration;
use embedded_graphics::prelude::Size;

use crate::{
    games::GameKind,
    switch::SwitchConfig,
    touch::TouchTransform,
};

/// Landscape panel size after rotation.
pub const SCREEN: Size = Size::new(320, 240);

/// Frame period, roughly 60 Hz.
pub const TICK: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy)]
pub struct ArcadeConfig {
    pub tick: Duration,
    pub touch: TouchTransform,
    pub switch: SwitchConfig,
    /// Game shown after boot, and the only one when switching is off.
    pub first_game: GameKind,
}

impl ArcadeConfig {
    pub const DEFAULT: Self = Self {
        tick: TICK,
        touch: TouchTransform::MIRROR_X,
        switch: if cfg!(feature = "game-switch") {
            SwitchConfig::BUTTON_AND_HOLD
        } else {
            SwitchConfig::DISABLED
        },
        first_game: GameKind::TapBall,
    };
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
