//! Particle bursts and expanding ripples.
//!
//! Both live in fixed-capacity pools: a slot is either idle or active, spawn
//! takes the first idle slots it finds, and requests beyond capacity are
//! dropped. There is no off-screen buffer, so each frame the last drawn
//! footprint of every active entry is painted over with the background
//! ([`Effects::erase`]) before the entry moves ([`Effects::advance`]) and is
//! drawn again ([`Effects::draw`]).

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

use crate::{
    gfx::{
        self,
        BACKGROUND,
        DARK_GREY,
    },
    rng::Entropy,
};

/// Particle pool capacity.
pub const MAX_PARTICLES: usize = 48;

/// Ripple pool capacity.
pub const MAX_RIPPLES: usize = 6;

/// Most particles a single burst activates.
pub const BURST_SIZE: usize = 24;

/// Ripple growth per frame, in pixels.
pub const RIPPLE_STEP: i32 = 2;

/// Starting radius of a fresh ripple.
pub const RIPPLE_START_RADIUS: i32 = 2;

/// Bounds on a ripple's final radius.
pub const RIPPLE_MIN_MAX_RADIUS: i32 = 12;
pub const RIPPLE_MAX_MAX_RADIUS: i32 = 48;

// ── Particles ───────────────────────────────────────────────────────────────

/// One spark of a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub pos: Point,
    /// Where the particle was last drawn.
    pub prev_pos: Point,
    /// Pixels per frame.
    pub velocity: Point,
    pub radius: i32,
    /// Radius it was last drawn with.
    pub prev_radius: i32,
    /// Remaining frames.
    pub life: i32,
    pub color: Rgb565,
    pub active: bool,
}

impl Particle {
    const IDLE: Self = Self {
        pos: Point::zero(),
        prev_pos: Point::zero(),
        velocity: Point::zero(),
        radius: 0,
        prev_radius: 0,
        life: 0,
        color: BACKGROUND,
        active: false,
    };

    /// One frame of motion. Shrinks on even lifetimes, retires when either
    /// lifetime or radius runs out.
    fn advance(&mut self) {
        self.pos += self.velocity;
        if self.life & 1 == 0 && self.radius > 0 {
            self.radius -= 1;
        }
        self.life -= 1;
        if self.life <= 0 || self.radius <= 0 {
            self.active = false;
        }
    }
}

/// Fixed pool of [`Particle`]s.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: [Particle; MAX_PARTICLES],
}

impl ParticlePool {
    pub const fn new() -> Self {
        Self {
            slots: [Particle::IDLE; MAX_PARTICLES],
        }
    }

    /// Burst of up to [`BURST_SIZE`] particles from `center`, coloured around
    /// `base`. Returns how many slots were activated.
    pub fn spawn<E: Entropy>(&mut self, center: Point, base: Rgb565, rng: &mut E) -> usize {
        let mut spawned = 0;
        for slot in self.slots.iter_mut().filter(|p| !p.active) {
            if spawned == BURST_SIZE {
                break;
            }
            let mut velocity = Point::new(rng.int_range(-3, 3), rng.int_range(-3, 3));
            if velocity == Point::zero() {
                velocity.x = 1;
            }
            let radius = rng.int_range(2, 4);
            let life = rng.int_range(14, 22);
            *slot = Particle {
                pos: center,
                prev_pos: center,
                velocity,
                radius,
                prev_radius: radius,
                life,
                color: jitter(base, rng),
                active: true,
            };
            spawned += 1;
        }
        spawned
    }

    pub fn advance(&mut self) {
        for p in self.slots.iter_mut().filter(|p| p.active) {
            p.advance();
        }
    }

    /// Paint over the last drawn footprint of every active particle.
    pub fn erase<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for p in self.active() {
            gfx::fill_circle(display, p.prev_pos, p.prev_radius + 1, BACKGROUND)?;
        }
        Ok(())
    }

    pub fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for p in self.slots.iter_mut().filter(|p| p.active) {
            gfx::fill_circle(display, p.pos, p.radius, p.color)?;
            p.prev_pos = p.pos;
            p.prev_radius = p.radius;
        }
        Ok(())
    }

    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Nudge each 565 channel of `base` by a small random amount.
fn jitter<E: Entropy>(base: Rgb565, rng: &mut E) -> Rgb565 {
    let dr = rng.int_range(-3, 3);
    let dg = rng.int_range(-6, 6);
    let db = rng.int_range(-3, 3);
    Rgb565::new(
        (i32::from(base.r()) + dr).clamp(0, 31) as u8,
        (i32::from(base.g()) + dg).clamp(0, 63) as u8,
        (i32::from(base.b()) + db).clamp(0, 31) as u8,
    )
}

// ── Ripples ─────────────────────────────────────────────────────────────────

/// Expanding double ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ripple {
    pub center: Point,
    pub radius: i32,
    /// Radius last drawn, zero before the first draw.
    pub prev_radius: i32,
    pub max_radius: i32,
    pub color: Rgb565,
    pub active: bool,
}

impl Ripple {
    const IDLE: Self = Self {
        center: Point::zero(),
        radius: 0,
        prev_radius: 0,
        max_radius: 0,
        color: BACKGROUND,
        active: false,
    };
}

/// Final radius of a ripple at `center`: distance to the nearest screen edge,
/// clamped to `[12, 48]`.
#[must_use]
pub fn ripple_max_radius(center: Point, screen: Size) -> i32 {
    let (w, h) = (screen.width as i32, screen.height as i32);
    let nearest = center.x.min(w - center.x).min(center.y).min(h - center.y);
    nearest.clamp(RIPPLE_MIN_MAX_RADIUS, RIPPLE_MAX_MAX_RADIUS)
}

/// Fixed pool of [`Ripple`]s.
#[derive(Debug, Clone)]
pub struct RipplePool {
    slots: [Ripple; MAX_RIPPLES],
}

impl RipplePool {
    pub const fn new() -> Self {
        Self {
            slots: [Ripple::IDLE; MAX_RIPPLES],
        }
    }

    /// Start a ripple in the first idle slot. Returns `false` when the pool is
    /// full and the request was dropped.
    pub fn spawn(&mut self, center: Point, screen: Size, color: Rgb565) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|r| !r.active) else {
            return false;
        };
        *slot = Ripple {
            center,
            radius: RIPPLE_START_RADIUS,
            prev_radius: 0,
            max_radius: ripple_max_radius(center, screen),
            color,
            active: true,
        };
        true
    }

    pub fn advance(&mut self) {
        for r in self.slots.iter_mut().filter(|r| r.active) {
            r.radius += RIPPLE_STEP;
            if r.radius >= r.max_radius {
                r.active = false;
            }
        }
    }

    pub fn erase<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for r in self.active().filter(|r| r.prev_radius > 0) {
            gfx::draw_circle(display, r.center, r.prev_radius, BACKGROUND)?;
            gfx::draw_circle(display, r.center, r.prev_radius - 1, BACKGROUND)?;
        }
        Ok(())
    }

    pub fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for r in self.slots.iter_mut().filter(|r| r.active) {
            gfx::draw_circle(display, r.center, r.radius, r.color)?;
            gfx::draw_circle(display, r.center, r.radius - 1, r.color)?;
            r.prev_radius = r.radius;
        }
        Ok(())
    }

    pub fn active(&self) -> impl Iterator<Item = &Ripple> {
        self.slots.iter().filter(|r| r.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

impl Default for RipplePool {
    fn default() -> Self {
        Self::new()
    }
}

// ── Both pools together ─────────────────────────────────────────────────────

/// The effect layer each game owns for the duration of its loop.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub particles: ParticlePool,
    pub ripples: RipplePool,
    screen: Size,
}

impl Effects {
    pub const fn new(screen: Size) -> Self {
        Self {
            particles: ParticlePool::new(),
            ripples: RipplePool::new(),
            screen,
        }
    }

    pub const fn screen(&self) -> Size {
        self.screen
    }

    /// Scoring feedback: particle burst at `burst_at`, coloured ripple at
    /// `ripple_at`.
    pub fn celebrate<E: Entropy>(&mut self, burst_at: Point, ripple_at: Point, color: Rgb565, rng: &mut E) {
        self.particles.spawn(burst_at, color, rng);
        self.ripples.spawn(ripple_at, self.screen, color);
    }

    /// Neutral grey ripple for a touch that did not score.
    pub fn tap(&mut self, at: Point) {
        self.ripples.spawn(at, self.screen, DARK_GREY);
    }

    pub fn erase<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.particles.erase(display)?;
        self.ripples.erase(display)
    }

    pub fn advance(&mut self) {
        self.particles.advance();
        self.ripples.advance();
    }

    /// Whether any live effect, as last drawn or as it will be drawn next,
    /// pokes above row `y`. Used to know when the title bar got painted over.
    pub fn reaches_above(&self, y: i32) -> bool {
        let particles = self.particles.active().any(|p| {
            p.pos.y - p.radius - 1 < y || p.prev_pos.y - p.prev_radius - 1 < y
        });
        let ripples = self
            .ripples
            .active()
            .any(|r| r.center.y - r.radius.max(r.prev_radius) < y);
        particles || ripples
    }

    pub fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.particles.draw(display)?;
        self.ripples.draw(display)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_core::SeedableRng as _;

    use super::*;
    use crate::{
        rng::{
            Pcg32,
            testing::Scripted,
        },
        testing::Canvas,
    };

    const SCREEN: Size = Size::new(320, 240);

    #[test]
    fn burst_is_capped_at_24() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ParticlePool::new();
        assert_eq!(pool.spawn(Point::new(50, 50), Rgb565::RED, &mut rng), BURST_SIZE);
        assert_eq!(pool.spawn(Point::new(50, 50), Rgb565::RED, &mut rng), BURST_SIZE);
        // Pool is full now; further bursts are dropped.
        assert_eq!(pool.spawn(Point::new(50, 50), Rgb565::RED, &mut rng), 0);
        assert_eq!(pool.active_count(), MAX_PARTICLES);
    }

    #[test]
    fn zero_velocity_is_nudged() {
        // Raw 3 maps to 0 in [-3, 3]; then radius 2, life 14, no colour shift.
        let mut rng = Scripted::new(&[3, 3, 0, 0, 3, 6, 3]);
        let mut pool = ParticlePool::new();
        pool.spawn(Point::new(10, 10), Rgb565::new(10, 20, 10), &mut rng);
        let p = pool.active().next().unwrap();
        assert_eq!(p.velocity, Point::new(1, 0));
        assert_eq!(p.radius, 2);
        assert_eq!(p.life, 14);
        assert_eq!(p.color, Rgb565::new(10, 20, 10));
    }

    #[test]
    fn jitter_clamps_to_channel_depth() {
        // Largest positive delta on every channel.
        let mut rng = Scripted::new(&[6, 12, 6]);
        assert_eq!(jitter(Rgb565::WHITE, &mut rng), Rgb565::WHITE);
        // Largest negative delta.
        let mut rng = Scripted::new(&[0, 0, 0]);
        assert_eq!(jitter(Rgb565::BLACK, &mut rng), Rgb565::BLACK);
    }

    #[test]
    fn particle_shrinks_on_even_lifetimes() {
        let mut p = Particle {
            pos: Point::new(0, 0),
            prev_pos: Point::new(0, 0),
            velocity: Point::new(2, -1),
            radius: 4,
            prev_radius: 4,
            life: 20,
            color: Rgb565::RED,
            active: true,
        };
        p.advance();
        assert_eq!((p.pos, p.radius, p.life), (Point::new(2, -1), 3, 19));
        p.advance();
        assert_eq!((p.pos, p.radius, p.life), (Point::new(4, -2), 3, 18));
        assert!(p.active);
    }

    #[test]
    fn particle_retires_when_radius_runs_out() {
        let mut p = Particle {
            radius: 1,
            life: 10,
            active: true,
            ..Particle::IDLE
        };
        p.advance();
        assert_eq!(p.radius, 0);
        assert!(!p.active);
    }

    #[test]
    fn ripple_max_radius_follows_nearest_edge() {
        assert_eq!(ripple_max_radius(Point::new(160, 120), SCREEN), 48);
        assert_eq!(ripple_max_radius(Point::new(30, 120), SCREEN), 30);
        assert_eq!(ripple_max_radius(Point::new(3, 120), SCREEN), 12);
        assert_eq!(ripple_max_radius(Point::new(160, 236), SCREEN), 12);
    }

    #[test]
    fn ripple_pool_drops_when_full() {
        let mut pool = RipplePool::new();
        for _ in 0..MAX_RIPPLES {
            assert!(pool.spawn(Point::new(100, 100), SCREEN, Rgb565::BLUE));
        }
        assert!(!pool.spawn(Point::new(100, 100), SCREEN, Rgb565::BLUE));
        assert_eq!(pool.active_count(), MAX_RIPPLES);
    }

    #[test]
    fn ripple_grows_by_two_until_max() {
        let mut pool = RipplePool::new();
        pool.spawn(Point::new(20, 100), SCREEN, Rgb565::BLUE);
        let max = pool.active().next().unwrap().max_radius;
        assert_eq!(max, 20);
        let mut frames = 0;
        while pool.active_count() > 0 {
            let before = pool.active().next().unwrap().radius;
            pool.advance();
            frames += 1;
            if let Some(r) = pool.active().next() {
                assert_eq!(r.radius, before + RIPPLE_STEP);
                assert!(r.radius < max);
            }
        }
        // 2 -> 20 in steps of 2.
        assert_eq!(frames, 9);
    }

    #[test]
    fn erase_then_draw_leaves_no_trail() {
        let mut canvas = Canvas::new(320, 240);
        let mut fx = Effects::new(SCREEN);
        let mut rng = Pcg32::seed_from_u64(11);
        fx.celebrate(Point::new(160, 120), Point::new(160, 120), Rgb565::CYAN, &mut rng);
        for _ in 0..40 {
            fx.erase(&mut canvas).unwrap();
            fx.advance();
            fx.draw(&mut canvas).unwrap();
        }
        assert_eq!(fx.particles.active_count(), 0);
        assert_eq!(fx.ripples.active_count(), 0);
        assert_eq!(canvas.count(BACKGROUND), 320 * 240);
    }

    #[test]
    fn effects_near_the_top_are_reported() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut fx = Effects::new(SCREEN);
        assert!(!fx.reaches_above(18));
        fx.tap(Point::new(160, 200));
        assert!(!fx.reaches_above(18));
        fx.tap(Point::new(160, 19));
        assert!(fx.reaches_above(18));

        let mut fx = Effects::new(SCREEN);
        fx.particles.spawn(Point::new(100, 20), Rgb565::RED, &mut rng);
        assert!(fx.reaches_above(18));
    }

    proptest! {
        #[test]
        fn burst_fills_min_of_24_and_free_slots(seed in any::<u64>(), pre in 0usize..=2) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pool = ParticlePool::new();
            for _ in 0..pre {
                pool.spawn(Point::new(5, 5), Rgb565::GREEN, &mut rng);
            }
            let free = MAX_PARTICLES - pool.active_count();
            let spawned = pool.spawn(Point::new(5, 5), Rgb565::GREEN, &mut rng);
            prop_assert_eq!(spawned, free.min(BURST_SIZE));
        }

        #[test]
        fn particle_lifetime_ticks_down_by_one(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pool = ParticlePool::new();
            pool.spawn(Point::new(100, 100), Rgb565::RED, &mut rng);
            for p in pool.active() {
                prop_assert!(p.velocity != Point::zero());
                prop_assert!((2..=4).contains(&p.radius));
                prop_assert!((14..=22).contains(&p.life));
            }
            while pool.active_count() > 0 {
                let before: std::vec::Vec<(usize, i32)> = pool
                    .slots()
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.active)
                    .map(|(i, p)| (i, p.life))
                    .collect();
                pool.advance();
                for (i, life) in before {
                    let p = &pool.slots()[i];
                    prop_assert_eq!(p.life, life - 1);
                    prop_assert!(p.life >= 0);
                }
            }
        }

        #[test]
        fn ripple_max_radius_is_bounded(x in 0i32..320, y in 0i32..240) {
            let max = ripple_max_radius(Point::new(x, y), SCREEN);
            prop_assert!((RIPPLE_MIN_MAX_RADIUS..=RIPPLE_MAX_MAX_RADIUS).contains(&max));
            let edge = x.min(320 - x).min(y).min(240 - y);
            if edge >= RIPPLE_MIN_MAX_RADIUS {
                prop_assert!(max <= edge);
            }
        }
    }
}
