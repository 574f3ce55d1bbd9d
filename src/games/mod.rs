//! The four mini-games.
//!
//! Each game is a plain struct holding its whole state. The frame driver
//! ([`crate::session`]) owns one for as long as the game runs and calls
//! [`Game::update`] then [`Game::draw`] once per frame.

use embassy_time::Instant;
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

use crate::{
    effects::Effects,
    hud::{
        MissWarning,
        Scoreboard,
    },
    rng::Entropy,
};

pub mod memory_grid;
pub mod rain_catch;
pub mod tap_ball;
pub mod whack;

pub use memory_grid::MemoryGrid;
pub use rain_catch::RainCatch;
pub use tap_ball::TapBall;
pub use whack::Whack;

/// Everything a game gets to look at and touch during one update.
pub struct Frame<'a, E> {
    pub now: Instant,
    /// Corrected touch sample for this frame, if any.
    pub touch: Option<Point>,
    pub effects: &'a mut Effects,
    pub rng: &'a mut E,
}

pub trait Game {
    /// Name in the title bar.
    const LABEL: &'static str;

    /// Banner shown once misses reach a threshold.
    const MISS_WARNING: Option<MissWarning> = None;

    /// Fresh game with score and misses at zero.
    fn start<E: Entropy>(screen: Size, now: Instant, rng: &mut E) -> Self
    where
        Self: Sized;

    fn scoreboard(&self) -> Scoreboard;

    /// Paint the game's initial picture onto a cleared screen.
    fn draw_initial<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    /// Advance one frame: timers, input, scoring.
    fn update<E: Entropy>(&mut self, frame: &mut Frame<'_, E>);

    /// Redraw whatever `update` changed.
    fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// Rotation order of the arcade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameKind {
    TapBall,
    Whack,
    MemoryGrid,
    RainCatch,
}

impl GameKind {
    pub const ALL: [Self; 4] = [Self::TapBall, Self::Whack, Self::MemoryGrid, Self::RainCatch];

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::TapBall => Self::Whack,
            Self::Whack => Self::MemoryGrid,
            Self::MemoryGrid => Self::RainCatch,
            Self::RainCatch => Self::TapBall,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TapBall => TapBall::LABEL,
            Self::Whack => Whack::LABEL,
            Self::MemoryGrid => MemoryGrid::LABEL,
            Self::RainCatch => RainCatch::LABEL,
        }
    }
}

/// Time elapsed from `since` to `now` in milliseconds, zero if `since` is later.
pub(crate) fn millis_since(now: Instant, since: Instant) -> u64 {
    now.saturating_duration_since(since).as_millis()
}

/// Squared-distance test used by every circular target.
pub(crate) const fn inside_circle(p: Point, center: Point, radius: i32) -> bool {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_visits_every_game_once() {
        let mut kind = GameKind::TapBall;
        for expected in GameKind::ALL {
            assert_eq!(kind, expected);
            kind = kind.next();
        }
        assert_eq!(kind, GameKind::TapBall);
    }

    #[test]
    fn circle_edge_counts_as_inside() {
        let c = Point::new(50, 50);
        assert!(inside_circle(Point::new(66, 50), c, 16));
        assert!(!inside_circle(Point::new(67, 50), c, 16));
        assert!(!inside_circle(Point::new(62, 62), c, 16));
    }
}
