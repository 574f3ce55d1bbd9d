//! Game 2: whack-a-mole.
//!
//! One target at a time. Tap it before its time-to-live runs out to score;
//! let it expire and it counts as a miss and pops up somewhere else.

use embassy_time::{
    Duration,
    Instant,
};
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

use super::{
    Frame,
    Game,
    inside_circle,
    millis_since,
};
use crate::{
    gfx::{
        self,
        BACKGROUND,
        DARK_GREEN,
    },
    hud::{
        HUD_HEIGHT,
        MissWarning,
        Scoreboard,
    },
    rng::Entropy,
};

pub const TARGET_RADIUS: i32 = 16;
pub const TARGET_TTL: Duration = Duration::from_millis(1200);
const TAP_RIPPLE_INTERVAL_MS: u64 = 80;

pub struct Whack {
    screen: Size,
    target: Point,
    spawned_at: Instant,
    ttl: Duration,
    score: u32,
    misses: u32,
    last_tap_ripple: Option<Instant>,
    drawn: Option<Point>,
}

impl Whack {
    pub const fn target(&self) -> Point {
        self.target
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn random_spot<E: Entropy>(screen: Size, rng: &mut E) -> Point {
        let r = TARGET_RADIUS;
        Point::new(
            rng.int_range(r, screen.width as i32 - r),
            rng.int_range(r + HUD_HEIGHT, screen.height as i32 - r),
        )
    }

    /// Move the target, never onto the spot it just left.
    fn respawn<E: Entropy>(&mut self, now: Instant, rng: &mut E) {
        let mut next = Self::random_spot(self.screen, rng);
        if next == self.target {
            let max_x = self.screen.width as i32 - TARGET_RADIUS;
            next.x = if next.x < max_x { next.x + 1 } else { TARGET_RADIUS };
        }
        self.target = next;
        self.spawned_at = now;
    }
}

impl Game for Whack {
    const LABEL: &'static str = "Game 2";
    const MISS_WARNING: Option<MissWarning> = Some(MissWarning {
        threshold: 5,
        from_bottom: 20,
    });

    fn start<E: Entropy>(screen: Size, now: Instant, rng: &mut E) -> Self {
        Self {
            screen,
            target: Self::random_spot(screen, rng),
            spawned_at: now,
            ttl: TARGET_TTL,
            score: 0,
            misses: 0,
            last_tap_ripple: None,
            drawn: None,
        }
    }

    fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            score: self.score,
            misses: Some(self.misses),
        }
    }

    fn draw_initial<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.draw(display)
    }

    fn update<E: Entropy>(&mut self, frame: &mut Frame<'_, E>) {
        let now = frame.now;

        if millis_since(now, self.spawned_at) > self.ttl.as_millis() {
            self.misses += 1;
            debug!("whack: timeout, misses {}", self.misses);
            self.respawn(now, frame.rng);
        }

        let Some(touch) = frame.touch else {
            return;
        };
        if inside_circle(touch, self.target, TARGET_RADIUS) {
            self.score += 1;
            debug!("whack: hit, score {}", self.score);
            let color = frame.rng.color(64, 255);
            frame.effects.celebrate(self.target, touch, color, frame.rng);
            self.respawn(now, frame.rng);
        } else if self
            .last_tap_ripple
            .is_none_or(|t| millis_since(now, t) > TAP_RIPPLE_INTERVAL_MS)
        {
            frame.effects.tap(touch);
            self.last_tap_ripple = Some(now);
        }
    }

    fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if let Some(old) = self.drawn.filter(|&p| p != self.target) {
            gfx::fill_circle(display, old, TARGET_RADIUS + 2, BACKGROUND)?;
        }
        // Repainted every frame: effect erasure may have chipped it.
        gfx::fill_circle(display, self.target, TARGET_RADIUS, Rgb565::GREEN)?;
        gfx::draw_circle(display, self.target, TARGET_RADIUS + 1, DARK_GREEN)?;
        self.drawn = Some(self.target);
        Ok(())
    }
}
