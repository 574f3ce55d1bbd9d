//! Title bar shared by every game: name, score, misses and the SWITCH button.

use core::fmt::Write as _;

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        MonoTextStyleBuilder,
        ascii::{
            FONT_6X10,
            FONT_9X15,
        },
    },
    pixelcolor::Rgb565,
    prelude::*,
};

use crate::{
    gfx::{
        self,
        BACKGROUND,
        DARK_GREY,
    },
    switch,
};

/// Height of the title bar. Play areas start below it.
pub const HUD_HEIGHT: i32 = 18;

/// What the title bar shows for the running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scoreboard {
    pub score: u32,
    /// `None` for games that do not count misses.
    pub misses: Option<u32>,
}

/// Yellow "Miss >= N" banner shown near the bottom once misses pile up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissWarning {
    pub threshold: u32,
    /// Distance of the text's top edge from the bottom of the screen.
    pub from_bottom: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Hud {
    label: &'static str,
    screen: Size,
    switch_button: bool,
    warning: Option<MissWarning>,
}

impl Hud {
    pub const fn new(
        label: &'static str,
        screen: Size,
        switch_button: bool,
        warning: Option<MissWarning>,
    ) -> Self {
        Self {
            label,
            screen,
            switch_button,
            warning,
        }
    }

    /// Repaint the whole title bar.
    pub fn draw<D>(&self, display: &mut D, board: Scoreboard) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        gfx::fill_rect(display, 0, 0, self.screen.width as i32, HUD_HEIGHT, BACKGROUND)?;

        let style = MonoTextStyleBuilder::new()
            .font(&FONT_9X15)
            .text_color(Rgb565::WHITE)
            .background_color(BACKGROUND)
            .build();
        gfx::print(display, &self.title(board), 4, 2, style)?;

        if self.switch_button {
            self.draw_switch_button(display)?;
        }
        Ok(())
    }

    /// Draw the miss banner if `board` has reached the threshold.
    pub fn draw_warning<D>(&self, display: &mut D, board: Scoreboard) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let (Some(warning), Some(misses)) = (self.warning, board.misses) else {
            return Ok(());
        };
        if misses < warning.threshold {
            return Ok(());
        }
        let mut text = heapless::String::<16>::new();
        let _ = write!(text, "Miss >= {}", warning.threshold);
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_9X15)
            .text_color(Rgb565::YELLOW)
            .background_color(BACKGROUND)
            .build();
        let y = self.screen.height as i32 - warning.from_bottom;
        gfx::print(display, &text, 10, y, style)
    }

    /// "Game 2  Score:3  Miss:1"
    pub fn title(&self, board: Scoreboard) -> heapless::String<48> {
        let mut text = heapless::String::new();
        let _ = match board.misses {
            Some(misses) => write!(text, "{}  Score:{}  Miss:{}", self.label, board.score, misses),
            None => write!(text, "{}  Score: {}", self.label, board.score),
        };
        text
    }

    fn draw_switch_button<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        const LABEL: &str = "SWITCH";

        let area = switch::button_area(self.screen);
        let (x, y) = (area.top_left.x, area.top_left.y);
        let (w, h) = (area.size.width as i32, area.size.height as i32);
        gfx::fill_round_rect(display, x, y, w, h, 3, DARK_GREY)?;
        gfx::draw_round_rect(display, x, y, w, h, 3, Rgb565::WHITE)?;

        let style: MonoTextStyle<'_, Rgb565> = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(Rgb565::WHITE)
            .background_color(DARK_GREY)
            .build();
        let text_w = LABEL.len() as i32 * FONT_6X10.character_size.width as i32;
        gfx::print(display, LABEL, x + (w - text_w) / 2, y + 3, style)
    }
}
