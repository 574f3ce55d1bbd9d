//! Game 1: tap the bouncing ball.
//!
//! The ball bounces around the play area. Hitting it scores, bursts
//! particles at the finger and respawns a new ball somewhere else with a new
//! size, speed and colour. Leave it alone for five seconds and it respawns on
//! its own.

use embassy_time::Instant;
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
    },
    hud::{
        HUD_HEIGHT,
        Scoreboard,
    },
    rng::Entropy,
};

const START_RADIUS: i32 = 22;
const MIN_RADIUS: i32 = 16;
const MAX_RADIUS: i32 = 28;
const START_MAX_SPEED: i32 = 4;
const MAX_SPEED: i32 = 5;
const MIN_SPEED: i32 = 2;
const IDLE_RESPAWN_MS: u64 = 5000;
const TAP_RIPPLE_INTERVAL_MS: u64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    pub pos: Point,
    /// Pixels per frame.
    pub velocity: Point,
    pub radius: i32,
    pub color: Rgb565,
}

impl Ball {
    fn random<E: Entropy>(radius: i32, max_speed: i32, screen: Size, rng: &mut E) -> Self {
        let (w, h) = (screen.width as i32, screen.height as i32);
        let x = rng.int_range(radius, w - radius);
        let y = rng.int_range(radius + HUD_HEIGHT, h - radius);
        let vx = rng.sign() * rng.int_range(MIN_SPEED, max_speed);
        let vy = rng.sign() * rng.int_range(MIN_SPEED, max_speed);
        Self {
            pos: Point::new(x, y),
            velocity: Point::new(vx, vy),
            radius,
            color: rng.color(100, 255),
        }
    }

    /// Move one frame inside `[0, w) x [HUD_HEIGHT, h)`, flipping whichever
    /// velocity component would carry the ball past an edge.
    pub fn step(&mut self, screen: Size) {
        let (w, h) = (screen.width as i32, screen.height as i32);
        let r = self.radius;
        let mut next = self.pos + self.velocity;
        if next.x - r < 0 || next.x + r >= w {
            self.velocity.x = -self.velocity.x;
            next.x = self.pos.x + self.velocity.x;
        }
        if next.y - r < HUD_HEIGHT || next.y + r >= h {
            self.velocity.y = -self.velocity.y;
            next.y = self.pos.y + self.velocity.y;
        }
        self.pos = next;
    }
}

pub struct TapBall {
    screen: Size,
    ball: Ball,
    score: u32,
    last_spawn: Instant,
    last_tap_ripple: Option<Instant>,
    /// Centre and radius of the ball currently on screen.
    drawn: Option<(Point, i32)>,
}

impl TapBall {
    pub const fn ball(&self) -> &Ball {
        &self.ball
    }

    pub const fn last_spawn(&self) -> Instant {
        self.last_spawn
    }

    fn respawn<E: Entropy>(&mut self, now: Instant, rng: &mut E) {
        let radius = rng.int_range(MIN_RADIUS, MAX_RADIUS);
        self.ball = Ball::random(radius, MAX_SPEED, self.screen, rng);
        self.last_spawn = now;
    }
}

impl Game for TapBall {
    const LABEL: &'static str = "Game 1";

    fn start<E: Entropy>(screen: Size, now: Instant, rng: &mut E) -> Self {
        Self {
            screen,
            ball: Ball::random(START_RADIUS, START_MAX_SPEED, screen, rng),
            score: 0,
            last_spawn: now,
            last_tap_ripple: None,
            drawn: None,
        }
    }

    fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            score: self.score,
            misses: None,
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
        self.ball.step(self.screen);

        if let Some(touch) = frame.touch {
            let ripple_due = self
                .last_tap_ripple
                .is_none_or(|t| millis_since(now, t) > TAP_RIPPLE_INTERVAL_MS);
            if ripple_due {
                frame.effects.tap(touch);
                self.last_tap_ripple = Some(now);
            }

            if inside_circle(touch, self.ball.pos, self.ball.radius) {
                self.score += 1;
                debug!("tap-ball: hit, score {}", self.score);
                self.respawn(now, frame.rng);
                let burst = frame.rng.color(0, 255);
                frame.effects.celebrate(touch, touch, burst, frame.rng);
            }
        }

        if millis_since(now, self.last_spawn) > IDLE_RESPAWN_MS {
            debug!("tap-ball: idle respawn");
            self.respawn(now, frame.rng);
        }
    }

    fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if let Some((pos, radius)) = self.drawn {
            gfx::fill_circle(display, pos, radius + 2, BACKGROUND)?;
        }
        gfx::fill_circle(display, self.ball.pos, self.ball.radius, self.ball.color)?;
        self.drawn = Some((self.ball.pos, self.ball.radius));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_core::SeedableRng as _;

    use super::*;
    use crate::{
        effects::Effects,
        rng::Pcg32,
    };

    const SCREEN: Size = Size::new(320, 240);

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn tick(game: &mut TapBall, fx: &mut Effects, rng: &mut Pcg32, now: Instant, touch: Option<Point>) {
        game.update(&mut Frame {
            now,
            touch,
            effects: fx,
            rng,
        });
    }

    #[test]
    fn starting_ball_is_inside_play_area() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let game = TapBall::start(SCREEN, at(0), &mut rng);
            let b = game.ball();
            assert_eq!(b.radius, START_RADIUS);
            assert!(b.pos.x >= b.radius && b.pos.x <= 320 - b.radius);
            assert!(b.pos.y >= b.radius + HUD_HEIGHT && b.pos.y <= 240 - b.radius);
            assert!((MIN_SPEED..=START_MAX_SPEED).contains(&b.velocity.x.abs()));
            assert!((MIN_SPEED..=START_MAX_SPEED).contains(&b.velocity.y.abs()));
        }
    }

    #[test]
    fn bounces_off_right_edge() {
        let mut ball = Ball {
            pos: Point::new(295, 100),
            velocity: Point::new(4, 2),
            radius: 22,
            color: Rgb565::RED,
        };
        ball.step(SCREEN);
        assert_eq!(ball.velocity, Point::new(-4, 2));
        assert_eq!(ball.pos, Point::new(291, 102));
    }

    #[test]
    fn bounces_off_hud_bar() {
        let mut ball = Ball {
            pos: Point::new(100, HUD_HEIGHT + 20),
            velocity: Point::new(-3, -3),
            radius: 20,
            color: Rgb565::RED,
        };
        ball.step(SCREEN);
        assert_eq!(ball.velocity, Point::new(-3, 3));
        assert_eq!(ball.pos, Point::new(97, HUD_HEIGHT + 23));
    }

    #[test]
    fn tap_on_centre_scores_and_celebrates() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut fx = Effects::new(SCREEN);
        let mut game = TapBall::start(SCREEN, at(0), &mut rng);
        let centre = game.ball().pos;

        tick(&mut game, &mut fx, &mut rng, at(16), Some(centre));

        assert_eq!(game.scoreboard(), Scoreboard {
            score: 1,
            misses: None
        });
        assert_eq!(fx.particles.active_count(), 24);
        // Neutral tap ripple plus the coloured one.
        assert_eq!(fx.ripples.active_count(), 2);
        assert_eq!(game.last_spawn(), at(16));
        assert!((MIN_RADIUS..=MAX_RADIUS).contains(&game.ball().radius));
    }

    #[test]
    fn miss_only_ripples_and_is_rate_limited() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut fx = Effects::new(SCREEN);
        let mut game = TapBall::start(SCREEN, at(0), &mut rng);
        let ball = *game.ball();
        // Opposite side of the screen from the ball.
        let away = Point::new(
            if ball.pos.x < 160 { 310 } else { 10 },
            if ball.pos.y < 130 { 230 } else { 30 },
        );

        tick(&mut game, &mut fx, &mut rng, at(16), Some(away));
        tick(&mut game, &mut fx, &mut rng, at(32), Some(away));
        assert_eq!(fx.ripples.active_count(), 1);
        tick(&mut game, &mut fx, &mut rng, at(100), Some(away));
        assert_eq!(fx.ripples.active_count(), 2);
        assert_eq!(game.scoreboard().score, 0);
        assert_eq!(fx.particles.active_count(), 0);
    }

    #[test]
    fn idle_ball_respawns_without_scoring() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut fx = Effects::new(SCREEN);
        let mut game = TapBall::start(SCREEN, at(0), &mut rng);

        tick(&mut game, &mut fx, &mut rng, at(5000), None);
        assert_eq!(game.last_spawn(), at(0));
        tick(&mut game, &mut fx, &mut rng, at(5001), None);
        assert_eq!(game.last_spawn(), at(5001));
        assert_eq!(game.scoreboard().score, 0);
    }

    proptest! {
        #[test]
        fn ball_never_leaves_play_area(
            radius in MIN_RADIUS..=MAX_RADIUS,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            vx in MIN_SPEED..=MAX_SPEED,
            vy in MIN_SPEED..=MAX_SPEED,
            sx in any::<bool>(),
            sy in any::<bool>(),
        ) {
            let (w, h) = (320, 240);
            let x = radius + ((w - 2 * radius - 1) as f64 * fx) as i32;
            let y = HUD_HEIGHT + radius + ((h - HUD_HEIGHT - 2 * radius - 1) as f64 * fy) as i32;
            let mut ball = Ball {
                pos: Point::new(x, y),
                velocity: Point::new(if sx { vx } else { -vx }, if sy { vy } else { -vy }),
                radius,
                color: Rgb565::RED,
            };
            for _ in 0..200 {
                ball.step(SCREEN);
                prop_assert!(ball.pos.x - radius >= 0 && ball.pos.x + radius < w);
                prop_assert!(ball.pos.y - radius >= HUD_HEIGHT && ball.pos.y + radius < h);
            }
        }
    }
}
