//! Game 3: memory grid.
//!
//! A 3×3 board lights up one cell at a time. Tap the lit cell before it goes
//! dark to score; every hit shortens how long the next cell stays lit.
//! Tapping the wrong cell, or letting the lit one time out, is a miss.

use embassy_time::{
    Duration,
    Instant,
};
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};

use super::{
    Frame,
    Game,
    millis_since,
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

pub const COLS: usize = 3;
pub const ROWS: usize = 3;
pub const CELLS: usize = COLS * ROWS;

const GRID_TOP: i32 = 24;
const GRID_SIDE_MARGIN: i32 = 12;
const GRID_BOTTOM_MARGIN: i32 = 12;

pub const START_TTL_MS: u32 = 1500;
pub const TTL_STEP_MS: u32 = 20;
pub const TTL_FLOOR_MS: u32 = 650;
const FLASH_MS: u64 = 220;
const HIT_COOLDOWN_MS: u64 = 300;
const MISS_COOLDOWN_MS: u64 = 350;

/// Next time-to-live after a correct hit.
#[must_use]
pub const fn shortened_ttl(ttl_ms: u32) -> u32 {
    let next = ttl_ms.saturating_sub(TTL_STEP_MS);
    if next < TTL_FLOOR_MS { TTL_FLOOR_MS } else { next }
}

// ── Geometry ────────────────────────────────────────────────────────────────

/// Cell layout. The last column and row absorb any rounding remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    cell_w: i32,
    cell_h: i32,
}

impl Grid {
    pub const fn new(screen: Size) -> Self {
        let width = screen.width as i32 - GRID_SIDE_MARGIN * 2;
        let height = screen.height as i32 - GRID_TOP - GRID_BOTTOM_MARGIN;
        Self {
            left: GRID_SIDE_MARGIN,
            top: GRID_TOP,
            width,
            height,
            cell_w: width / COLS as i32,
            cell_h: height / ROWS as i32,
        }
    }

    pub const fn cell_bounds(&self, idx: usize) -> Rectangle {
        let row = (idx / COLS) as i32;
        let col = (idx % COLS) as i32;
        let w = if col == COLS as i32 - 1 {
            self.width - col * self.cell_w
        } else {
            self.cell_w
        };
        let h = if row == ROWS as i32 - 1 {
            self.height - row * self.cell_h
        } else {
            self.cell_h
        };
        Rectangle::new(
            Point::new(self.left + col * self.cell_w, self.top + row * self.cell_h),
            Size::new(w as u32, h as u32),
        )
    }

    /// Cell under `p`, if any.
    pub fn cell_at(&self, p: Point) -> Option<usize> {
        if p.x < self.left || p.y < self.top {
            return None;
        }
        if p.x >= self.left + self.width || p.y >= self.top + self.height {
            return None;
        }
        let col = ((p.x - self.left) / self.cell_w.max(1)).min(COLS as i32 - 1);
        let row = ((p.y - self.top) / self.cell_h.max(1)).min(ROWS as i32 - 1);
        Some(row as usize * COLS + col as usize)
    }

    pub const fn top(&self) -> i32 {
        self.top
    }
}

// ── Game ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLook {
    Idle,
    Active,
    Hit,
    Miss,
}

impl CellLook {
    fn colors(self) -> (Rgb565, Rgb565) {
        match self {
            Self::Idle => (gfx::rgb(45, 45, 45), DARK_GREY),
            Self::Active => (gfx::rgb(80, 170, 255), Rgb565::WHITE),
            Self::Hit => (Rgb565::GREEN, Rgb565::WHITE),
            Self::Miss => (gfx::rgb(200, 50, 50), Rgb565::RED),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Flash {
    cell: usize,
    good: bool,
    until: Instant,
}

pub struct MemoryGrid {
    grid: Grid,
    active: Option<usize>,
    last_active: Option<usize>,
    appeared_at: Instant,
    ttl_ms: u32,
    next_spawn: Instant,
    flash: Option<Flash>,
    score: u32,
    misses: u32,
    touching: bool,
    shown: [Option<CellLook>; CELLS],
}

impl MemoryGrid {
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub const fn active_cell(&self) -> Option<usize> {
        self.active
    }

    pub const fn ttl_ms(&self) -> u32 {
        self.ttl_ms
    }

    /// How `idx` should look right now.
    pub fn look(&self, idx: usize) -> CellLook {
        match self.flash {
            Some(f) if f.cell == idx && f.good => CellLook::Hit,
            _ if self.active == Some(idx) => CellLook::Active,
            Some(f) if f.cell == idx => CellLook::Miss,
            _ => CellLook::Idle,
        }
    }

    fn spawn<E: Entropy>(&mut self, now: Instant, rng: &mut E) {
        let mut next = rng.int_range(0, CELLS as i32 - 1) as usize;
        if Some(next) == self.last_active {
            next = (next + 1) % CELLS;
        }
        self.active = Some(next);
        self.last_active = Some(next);
        self.appeared_at = now;
    }

    fn flash(&mut self, cell: usize, good: bool, now: Instant) {
        self.flash = Some(Flash {
            cell,
            good,
            until: now + Duration::from_millis(FLASH_MS),
        });
    }

    fn tap(&mut self, p: Point, now: Instant) {
        if p.y < self.grid.top() {
            return;
        }
        let Some(idx) = self.grid.cell_at(p) else {
            return;
        };
        if self.active == Some(idx) {
            self.score += 1;
            self.flash(idx, true, now);
            self.active = None;
            self.next_spawn = now + Duration::from_millis(HIT_COOLDOWN_MS);
            self.ttl_ms = shortened_ttl(self.ttl_ms);
            debug!("memory-grid: hit, ttl now {}", self.ttl_ms);
        } else {
            self.misses += 1;
            self.flash(idx, false, now);
            info!("memory-grid: miss (wrong cell)");
        }
    }

    fn draw_cell<D>(&self, display: &mut D, idx: usize, look: CellLook) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = self.grid.cell_bounds(idx);
        let (x, y) = (area.top_left.x, area.top_left.y);
        let (w, h) = (area.size.width as i32, area.size.height as i32);
        let (fill, border) = look.colors();
        gfx::fill_rect(display, x, y, w, h, BACKGROUND)?;
        if w > 6 && h > 6 {
            gfx::fill_round_rect(display, x + 2, y + 2, w - 4, h - 4, 4, fill)?;
            gfx::draw_round_rect(display, x + 1, y + 1, w - 2, h - 2, 4, border)
        } else {
            gfx::fill_rect(display, x, y, w, h, fill)
        }
    }
}

impl Game for MemoryGrid {
    const LABEL: &'static str = "Game 3";
    const MISS_WARNING: Option<MissWarning> = Some(MissWarning {
        threshold: 8,
        from_bottom: 20,
    });

    fn start<E: Entropy>(screen: Size, now: Instant, _rng: &mut E) -> Self {
        Self {
            grid: Grid::new(screen),
            active: None,
            last_active: None,
            appeared_at: now,
            ttl_ms: START_TTL_MS,
            next_spawn: now,
            flash: None,
            score: 0,
            misses: 0,
            touching: false,
            shown: [None; CELLS],
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
        self.shown = [None; CELLS];
        self.draw(display)
    }

    fn update<E: Entropy>(&mut self, frame: &mut Frame<'_, E>) {
        let now = frame.now;

        if self.flash.is_some_and(|f| now >= f.until) {
            self.flash = None;
        }

        match self.active {
            None if now >= self.next_spawn => self.spawn(now, frame.rng),
            Some(idx) if millis_since(now, self.appeared_at) > u64::from(self.ttl_ms) => {
                self.misses += 1;
                self.flash(idx, false, now);
                self.active = None;
                self.next_spawn = now + Duration::from_millis(MISS_COOLDOWN_MS);
                info!("memory-grid: miss (timeout)");
            }
            _ => {}
        }

        // Only the first frame of a press counts as a tap.
        let pressed = frame.touch.filter(|_| !self.touching);
        self.touching = frame.touch.is_some();
        if let Some(p) = pressed {
            self.tap(p, now);
        }
    }

    fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for idx in 0..CELLS {
            let look = self.look(idx);
            if self.shown[idx] != Some(look) {
                self.draw_cell(display, idx, look)?;
                self.shown[idx] = Some(look);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand_core::SeedableRng as _;

    use super::*;
    use crate::{
        effects::Effects,
        rng::{
            Pcg32,
            testing::Scripted,
        },
        testing::Canvas,
    };

    const SCREEN: Size = Size::new(320, 240);

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn tick<E: Entropy>(game: &mut MemoryGrid, rng: &mut E, now: Instant, touch: Option<Point>) {
        let mut fx = Effects::new(SCREEN);
        game.update(&mut Frame {
            now,
            touch,
            effects: &mut fx,
            rng,
        });
    }

    fn centre(game: &MemoryGrid, idx: usize) -> Point {
        game.grid().cell_bounds(idx).center()
    }

    #[test]
    fn grid_covers_the_play_area() {
        let grid = Grid::new(SCREEN);
        assert_eq!(grid.cell_bounds(0).top_left, Point::new(12, 24));
        let last = grid.cell_bounds(CELLS - 1);
        assert_eq!(last.bottom_right(), Some(Point::new(307, 227)));
        assert_eq!(grid.cell_at(Point::new(12, 24)), Some(0));
        assert_eq!(grid.cell_at(Point::new(307, 227)), Some(8));
        assert_eq!(grid.cell_at(Point::new(11, 100)), None);
        assert_eq!(grid.cell_at(Point::new(200, 228)), None);
        for idx in 0..CELLS {
            assert_eq!(grid.cell_at(grid.cell_bounds(idx).center()), Some(idx));
        }
    }

    #[test]
    fn ttl_shrinks_to_floor_and_stops() {
        let mut ttl = START_TTL_MS;
        for _ in 0..10 {
            ttl = shortened_ttl(ttl);
        }
        assert_eq!(ttl, 1300);
        for _ in 0..100 {
            ttl = shortened_ttl(ttl);
            assert!(ttl >= TTL_FLOOR_MS);
        }
        assert_eq!(ttl, TTL_FLOOR_MS);
    }

    #[test]
    fn correct_tap_scores_and_shortens_ttl() {
        let mut rng = Pcg32::seed_from_u64(17);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        tick(&mut game, &mut rng, at(0), None);
        let idx = game.active_cell().unwrap();

        let p = centre(&game, idx);
        tick(&mut game, &mut rng, at(100), Some(p));

        assert_eq!(game.scoreboard(), Scoreboard {
            score: 1,
            misses: Some(0)
        });
        assert_eq!(game.ttl_ms(), START_TTL_MS - TTL_STEP_MS);
        assert_eq!(game.active_cell(), None);
        assert_eq!(game.look(idx), CellLook::Hit);

        // Flash fades after 220 ms; the next cell arrives after 300 ms.
        tick(&mut game, &mut rng, at(320), None);
        assert_eq!(game.look(idx), CellLook::Idle);
        assert_eq!(game.active_cell(), None);
        tick(&mut game, &mut rng, at(400), None);
        let next = game.active_cell().unwrap();
        assert_ne!(next, idx);
    }

    #[test]
    fn holding_a_finger_counts_once() {
        let mut rng = Pcg32::seed_from_u64(23);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        tick(&mut game, &mut rng, at(0), None);
        let idx = game.active_cell().unwrap();
        let p = centre(&game, idx);
        for ms in [16, 32, 48, 64] {
            tick(&mut game, &mut rng, at(ms), Some(p));
        }
        assert_eq!(game.scoreboard(), Scoreboard {
            score: 1,
            misses: Some(0)
        });
    }

    #[test]
    fn wrong_cell_is_a_miss_with_red_flash() {
        let mut rng = Pcg32::seed_from_u64(29);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        tick(&mut game, &mut rng, at(0), None);
        let idx = game.active_cell().unwrap();
        let wrong = (idx + 4) % CELLS;

        let p = centre(&game, wrong);
        tick(&mut game, &mut rng, at(50), Some(p));

        assert_eq!(game.scoreboard().misses, Some(1));
        assert_eq!(game.look(wrong), CellLook::Miss);
        assert_eq!(game.active_cell(), Some(idx));
    }

    #[test]
    fn taps_outside_the_grid_are_ignored() {
        let mut rng = Pcg32::seed_from_u64(31);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        tick(&mut game, &mut rng, at(0), None);
        tick(&mut game, &mut rng, at(20), Some(Point::new(5, 100)));
        tick(&mut game, &mut rng, at(40), None);
        tick(&mut game, &mut rng, at(60), Some(Point::new(100, 10)));
        assert_eq!(game.scoreboard(), Scoreboard {
            score: 0,
            misses: Some(0)
        });
    }

    #[test]
    fn timeout_is_a_miss_then_cooldown() {
        let mut rng = Pcg32::seed_from_u64(37);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        tick(&mut game, &mut rng, at(0), None);
        let idx = game.active_cell().unwrap();

        tick(&mut game, &mut rng, at(1500), None);
        assert_eq!(game.scoreboard().misses, Some(0));
        tick(&mut game, &mut rng, at(1501), None);
        assert_eq!(game.scoreboard().misses, Some(1));
        assert_eq!(game.look(idx), CellLook::Miss);
        assert_eq!(game.active_cell(), None);

        tick(&mut game, &mut rng, at(1850), None);
        assert_eq!(game.active_cell(), None);
        tick(&mut game, &mut rng, at(1851), None);
        assert!(game.active_cell().is_some());
    }

    #[test]
    fn new_cell_differs_from_previous() {
        // Raw draw 4 always picks cell 4.
        let mut rng = Scripted::new(&[4]);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        tick(&mut game, &mut rng, at(0), None);
        assert_eq!(game.active_cell(), Some(4));
        let p = centre(&game, 4);
        tick(&mut game, &mut rng, at(10), Some(p));
        tick(&mut game, &mut rng, at(310), None);
        assert_eq!(game.active_cell(), Some(5));
    }

    #[test]
    fn new_target_shows_active_over_a_red_flash() {
        let mut rng = Scripted::new(&[4, 6]);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        tick(&mut game, &mut rng, at(0), None);
        let p = centre(&game, 4);
        tick(&mut game, &mut rng, at(10), Some(p));
        tick(&mut game, &mut rng, at(50), None);

        // Wrong tap during the cooldown flashes cell 6 until 320 ms.
        let p = centre(&game, 6);
        tick(&mut game, &mut rng, at(100), Some(p));
        tick(&mut game, &mut rng, at(116), None);
        assert_eq!(game.look(6), CellLook::Miss);

        tick(&mut game, &mut rng, at(310), None);
        assert_eq!(game.active_cell(), Some(6));
        assert_eq!(game.look(6), CellLook::Active);
    }

    #[test]
    fn only_changed_cells_are_repainted() {
        let mut rng = Pcg32::seed_from_u64(41);
        let mut canvas = Canvas::new(320, 240);
        let mut game = MemoryGrid::start(SCREEN, at(0), &mut rng);
        game.draw_initial(&mut canvas).unwrap();
        let idle = gfx::rgb(45, 45, 45);
        let active = gfx::rgb(80, 170, 255);
        assert_eq!(canvas.count(active), 0);

        tick(&mut game, &mut rng, at(0), None);
        game.draw(&mut canvas).unwrap();
        let idx = game.active_cell().unwrap();
        let c = centre(&game, idx);
        assert_eq!(canvas.pixel(c.x, c.y), Some(active));
        let other = centre(&game, (idx + 1) % CELLS);
        assert_eq!(canvas.pixel(other.x, other.y), Some(idle));
    }
}
