//! Game 4: catch the falling orbs.
//!
//! Orbs drop from under the title bar and accelerate as they fall. Drag the
//! paddle under them; anything that falls off the bottom is a miss. Orbs
//! spawn faster and start quicker as the score climbs.

use embassy_time::{
    Duration,
    Instant,
};
use embedded_graphics::{
    mono_font::{
        MonoTextStyleBuilder,
        ascii::FONT_6X10,
    },
    pixelcolor::Rgb565,
    prelude::*,
};

use super::{
    Frame,
    Game,
};
use crate::{
    gfx::{
        self,
        BACKGROUND,
        DARK_GREY,
    },
    hud::{
        MissWarning,
        Scoreboard,
    },
    rng::Entropy,
};

pub const MAX_DROPS: usize = 6;
pub const DROP_RADIUS: i32 = 8;
const DROP_SPAWN_Y: f32 = 24.0;
const DROP_MARGIN: i32 = 12;
const GRAVITY: f32 = 0.05;
const FIRST_SPAWN_MS: u64 = 400;

const PADDLE_HEIGHT: i32 = 12;
const PADDLE_FROM_BOTTOM: i32 = 28;
const PADDLE_STEP: i32 = 6;
const PADDLE_MIN_WIDTH: i32 = 48;
/// Touches at or above this row never move the paddle.
const STEERING_MIN_Y: i32 = 22;

const HINT: &str = "Catch the falling orbs!";

/// Milliseconds until the next orb.
#[must_use]
pub fn spawn_interval_ms(score: u32) -> u64 {
    let accel = score.saturating_mul(35).min(600);
    u64::from((1100 - accel).max(320))
}

/// Starting fall speed in pixels per frame.
#[must_use]
pub fn initial_speed(score: u32) -> f32 {
    1.4 + score.min(20) as f32 * 0.08
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raindrop {
    pub x: i32,
    pub y: f32,
    pub vy: f32,
    pub color: Rgb565,
    pub active: bool,
    /// Centre of the orb currently on screen.
    drawn: Option<Point>,
}

impl Raindrop {
    const IDLE: Self = Self {
        x: 0,
        y: 0.0,
        vy: 0.0,
        color: BACKGROUND,
        active: false,
        drawn: None,
    };

    /// Rounded row of the centre.
    pub fn row(&self) -> i32 {
        (self.y + 0.5) as i32
    }

    fn center(&self) -> Point {
        Point::new(self.x, self.row())
    }
}

pub struct RainCatch {
    screen: Size,
    drops: [Raindrop; MAX_DROPS],
    next_spawn: Instant,
    paddle_x: i32,
    target_x: i32,
    paddle_w: i32,
    paddle_y: i32,
    drawn_paddle_x: Option<i32>,
    score: u32,
    misses: u32,
}

impl RainCatch {
    pub fn drops(&self) -> impl Iterator<Item = &Raindrop> {
        self.drops.iter().filter(|d| d.active)
    }

    pub const fn paddle_x(&self) -> i32 {
        self.paddle_x
    }

    pub const fn paddle_width(&self) -> i32 {
        self.paddle_w
    }

    pub const fn paddle_y(&self) -> i32 {
        self.paddle_y
    }

    fn spawn_drop<E: Entropy>(&mut self, rng: &mut E) {
        let w = self.screen.width as i32;
        let speed = initial_speed(self.score);
        let Some(slot) = self.drops.iter_mut().find(|d| !d.active && d.drawn.is_none()) else {
            return;
        };
        slot.x = rng.int_range(DROP_MARGIN, w - DROP_MARGIN);
        slot.y = DROP_SPAWN_Y;
        slot.vy = speed;
        slot.color = rng.color(120, 255);
        slot.active = true;
    }

    fn steer(&mut self, touch: Point) {
        if touch.y <= STEERING_MIN_Y {
            return;
        }
        let max_x = self.screen.width as i32 - self.paddle_w;
        self.target_x = (touch.x - self.paddle_w / 2).clamp(0, max_x.max(0));
    }

    fn move_paddle(&mut self) {
        if self.paddle_x < self.target_x {
            self.paddle_x = self.target_x.min(self.paddle_x + PADDLE_STEP);
        } else if self.paddle_x > self.target_x {
            self.paddle_x = self.target_x.max(self.paddle_x - PADDLE_STEP);
        }
    }

    const fn is_caught(&self, x: i32, row: i32) -> bool {
        let r = DROP_RADIUS;
        let band = row + r >= self.paddle_y && row - r <= self.paddle_y + PADDLE_HEIGHT;
        band && x >= self.paddle_x - r && x <= self.paddle_x + self.paddle_w + r
    }

    fn draw_paddle<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let (px, py, pw, ph) = (self.paddle_x, self.paddle_y, self.paddle_w, PADDLE_HEIGHT);
        if self.drawn_paddle_x != Some(px) {
            gfx::fill_rect(display, 0, py - 2, self.screen.width as i32, ph + 6, BACKGROUND)?;
            self.drawn_paddle_x = Some(px);
        }
        // Falling orbs and bursts pass over the paddle, so it is repainted
        // every frame.
        gfx::fill_round_rect(display, px, py, pw, ph, 4, gfx::rgb(70, 200, 140))?;
        gfx::fill_round_rect(display, px, py + ph - 4, pw, 4, 3, gfx::rgb(40, 120, 90))?;
        gfx::draw_round_rect(display, px - 1, py - 1, pw + 2, ph + 2, 5, Rgb565::WHITE)
    }
}

impl Game for RainCatch {
    const LABEL: &'static str = "Game 4";
    const MISS_WARNING: Option<MissWarning> = Some(MissWarning {
        threshold: 6,
        from_bottom: 16,
    });

    fn start<E: Entropy>(screen: Size, now: Instant, _rng: &mut E) -> Self {
        let (w, h) = (screen.width as i32, screen.height as i32);
        let paddle_w = PADDLE_MIN_WIDTH.max(w / 5);
        let paddle_x = w / 2 - paddle_w / 2;
        Self {
            screen,
            drops: [Raindrop::IDLE; MAX_DROPS],
            next_spawn: now + Duration::from_millis(FIRST_SPAWN_MS),
            paddle_x,
            target_x: paddle_x,
            paddle_w,
            paddle_y: h - PADDLE_FROM_BOTTOM,
            drawn_paddle_x: None,
            score: 0,
            misses: 0,
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
        self.drawn_paddle_x = None;
        self.draw_paddle(display)?;
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(DARK_GREY)
            .background_color(BACKGROUND)
            .build();
        gfx::print(display, HINT, 8, 22, style)
    }

    fn update<E: Entropy>(&mut self, frame: &mut Frame<'_, E>) {
        let now = frame.now;

        if now >= self.next_spawn {
            self.spawn_drop(frame.rng);
            self.next_spawn = now + Duration::from_millis(spawn_interval_ms(self.score));
        }

        if let Some(touch) = frame.touch {
            self.steer(touch);
        }
        self.move_paddle();

        let h = self.screen.height as i32;
        for i in 0..MAX_DROPS {
            let mut d = self.drops[i];
            if !d.active {
                continue;
            }
            d.y += d.vy;
            d.vy += GRAVITY;
            let row = d.row();

            if self.is_caught(d.x, row) {
                self.score += 1;
                d.active = false;
                debug!("rain-catch: caught, score {}", self.score);
                let at = Point::new(d.x, self.paddle_y);
                frame.effects.celebrate(at, at, d.color, frame.rng);
            } else if row - DROP_RADIUS > h {
                self.misses += 1;
                d.active = false;
                info!("rain-catch: miss (dropped)");
            }
            self.drops[i] = d;
        }
    }

    fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for d in &mut self.drops {
            let now_at = d.active.then(|| d.center());
            if let Some(old) = d.drawn.filter(|&p| Some(p) != now_at) {
                gfx::fill_circle(display, old, DROP_RADIUS + 1, BACKGROUND)?;
            }
            if let Some(p) = now_at {
                gfx::fill_circle(display, p, DROP_RADIUS, d.color)?;
            }
            d.drawn = now_at;
        }
        self.draw_paddle(display)
    }
}
