//! "Next game" signal.
//!
//! Two ways to leave a game: tap the SWITCH button in the title bar, or keep
//! a finger on a fixed region for a while. Either one is checked against the
//! corrected touch sample before the game sees it.

use embassy_time::{
    Duration,
    Instant,
};
use embedded_graphics::{
    prelude::*,
    primitives::Rectangle,
};

use crate::hud::HUD_HEIGHT;

pub const BUTTON_WIDTH: i32 = 50;
pub const BUTTON_HEIGHT: i32 = 16;
/// Gap between the button and the right/top edges.
pub const BUTTON_PAD: i32 = 2;

/// Where the SWITCH button sits on a screen of the given size.
#[must_use]
pub fn button_area(screen: Size) -> Rectangle {
    let x = screen.width as i32 - BUTTON_WIDTH - BUTTON_PAD;
    let y = ((HUD_HEIGHT - BUTTON_HEIGHT) / 2).max(0);
    Rectangle::new(
        Point::new(x, y),
        Size::new(BUTTON_WIDTH as u32, BUTTON_HEIGHT as u32),
    )
}

/// Press-and-hold over `region` for at least `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldGesture {
    pub region: Rectangle,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchConfig {
    pub button: bool,
    pub hold: Option<HoldGesture>,
}

impl SwitchConfig {
    /// Single-game builds: the loop never returns.
    pub const DISABLED: Self = Self {
        button: false,
        hold: None,
    };

    /// Button plus a 1.5 s hold on the left half of the title bar.
    pub const BUTTON_AND_HOLD: Self = Self {
        button: true,
        hold: Some(HoldGesture {
            region: Rectangle::new(Point::new(0, 0), Size::new(120, HUD_HEIGHT as u32)),
            duration: Duration::from_millis(1500),
        }),
    };

    pub const fn enabled(&self) -> bool {
        self.button || self.hold.is_some()
    }
}

/// Tracks presses across frames.
///
/// The button fires on the frame a press lands on it, not while the finger
/// stays there. After either trigger fires, nothing else fires until the
/// finger lifts. A new detector starts in that state too, so a press carried
/// over from the previous game cannot switch again.
#[derive(Debug, Clone)]
pub struct SwitchDetector {
    config: SwitchConfig,
    screen: Size,
    held_since: Option<Instant>,
    touching: bool,
    latched: bool,
}

impl SwitchDetector {
    pub const fn new(config: SwitchConfig, screen: Size) -> Self {
        Self {
            config,
            screen,
            held_since: None,
            touching: true,
            latched: true,
        }
    }

    /// Feed this frame's (corrected) sample. Returns `true` when the player
    /// asked for the next game.
    pub fn poll(&mut self, touch: Option<Point>, now: Instant) -> bool {
        let Some(p) = touch else {
            self.held_since = None;
            self.touching = false;
            self.latched = false;
            return false;
        };
        let pressed = !self.touching;
        self.touching = true;
        if self.latched {
            return false;
        }

        if self.config.button && pressed && button_area(self.screen).contains(p) {
            self.fire();
            return true;
        }

        let Some(hold) = self.config.hold else {
            return false;
        };
        if !hold.region.contains(p) {
            self.held_since = None;
            return false;
        }
        let since = *self.held_since.get_or_insert(now);
        if now.saturating_duration_since(since) >= hold.duration {
            self.fire();
            return true;
        }
        false
    }

    fn fire(&mut self) {
        self.held_since = None;
        self.latched = true;
    }
}
