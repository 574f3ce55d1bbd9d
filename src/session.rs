//! Frame loop driver.
//!
//! A [`Session`] owns one running game together with its effect layer, title
//! bar and switch detector. [`Session::tick`] runs one frame against an
//! explicit timestamp and touch sample so it can be driven from tests;
//! [`play`] wraps it in the real clock and the 16 ms frame timer.

use embassy_time::{
    Instant,
    Timer,
};
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

use crate::{
    config::ArcadeConfig,
    effects::Effects,
    games::{
        Frame,
        Game,
    },
    gfx,
    hud::{
        HUD_HEIGHT,
        Hud,
        Scoreboard,
    },
    rng::Entropy,
    switch::SwitchDetector,
    touch::{
        PointerSampler,
        TouchTransform,
    },
};

/// What the caller should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flow {
    Continue,
    /// The player asked for the next game; the screen has been cleared.
    Switch,
}

pub struct Session<G> {
    game: G,
    effects: Effects,
    hud: Hud,
    switch: SwitchDetector,
    touch: TouchTransform,
    /// Scoreboard as last painted in the title bar.
    shown: Scoreboard,
}

impl<G: Game> Session<G> {
    /// Clear the screen, start a fresh game and paint its first frame.
    pub fn start<D, E>(display: &mut D, rng: &mut E, now: Instant, config: &ArcadeConfig) -> Result<Self, D::Error>
    where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        E: Entropy,
    {
        let screen = display.size();
        gfx::clear(display)?;

        let mut game = G::start(screen, now, rng);
        game.draw_initial(display)?;

        let hud = Hud::new(G::LABEL, screen, config.switch.button, G::MISS_WARNING);
        let shown = game.scoreboard();
        hud.draw(display, shown)?;
        info!("{} started", G::LABEL);

        Ok(Self {
            game,
            effects: Effects::new(screen),
            hud,
            switch: SwitchDetector::new(config.switch, screen),
            touch: config.touch,
            shown,
        })
    }

    pub const fn game(&self) -> &G {
        &self.game
    }

    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Run one frame with the raw sample taken for it.
    pub fn tick<D, E>(
        &mut self,
        display: &mut D,
        rng: &mut E,
        now: Instant,
        raw: Option<(u16, u16)>,
    ) -> Result<Flow, D::Error>
    where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        E: Entropy,
    {
        let screen = self.effects.screen();
        let touch = raw.map(|r| self.touch.apply(r, screen));

        if self.switch.poll(touch, now) {
            info!("{} stopped: switch requested", G::LABEL);
            gfx::clear(display)?;
            return Ok(Flow::Switch);
        }

        // Erasing an effect that overlapped the title bar punches a hole in
        // it; remember that before the footprints move.
        let hud_touched = self.effects.reaches_above(HUD_HEIGHT);
        self.effects.erase(display)?;

        self.game.update(&mut Frame {
            now,
            touch,
            effects: &mut self.effects,
            rng,
        });
        self.game.draw(display)?;

        self.effects.advance();
        self.effects.draw(display)?;

        let board = self.game.scoreboard();
        if board != self.shown || hud_touched || self.effects.reaches_above(HUD_HEIGHT) {
            self.hud.draw(display, board)?;
            self.shown = board;
        }
        self.hud.draw_warning(display, board)?;
        Ok(Flow::Continue)
    }
}

/// Run `G` until the player switches away. Never returns when switching is
/// disabled in `config`.
pub async fn play<G, D, P, E>(
    display: &mut D,
    sampler: &mut P,
    rng: &mut E,
    config: &ArcadeConfig,
) -> Result<(), D::Error>
where
    G: Game,
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    P: PointerSampler,
    E: Entropy,
{
    let mut session = Session::<G>::start(display, rng, Instant::now(), config)?;
    loop {
        let raw = sampler.try_sample();
        if session.tick(display, rng, Instant::now(), raw)? == Flow::Switch {
            return Ok(());
        }
        Timer::after(config.tick).await;
    }
}
