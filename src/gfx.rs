//! Drawing primitives on top of `embedded-graphics`.
//!
//! The games think in centre + radius circles and plain rectangles, the way
//! the panel driver draws them; these helpers translate to the
//! `embedded-graphics` primitives and keep the call sites short.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::{
        Rgb565,
        Rgb888,
    },
    prelude::*,
    primitives::{
        Circle,
        CornerRadii,
        PrimitiveStyle,
        Rectangle,
        RoundedRectangle,
    },
    text::{
        Baseline,
        Text,
    },
};

/// Background colour every erase paints with.
pub const BACKGROUND: Rgb565 = Rgb565::BLACK;

/// Neutral grey used for tap feedback and inactive chrome (0x7BEF).
pub const DARK_GREY: Rgb565 = Rgb565::new(15, 31, 15);

/// Dark green outline around whack-a-mole targets (0x03E0).
pub const DARK_GREEN: Rgb565 = Rgb565::new(0, 31, 0);

/// Build a 565 colour from 8-bit-per-channel input.
#[must_use]
pub fn rgb(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::from(Rgb888::new(r, g, b))
}

/// Circle covering every pixel within `radius` of `center`.
///
/// A radius of zero is a single pixel; negative radii draw nothing.
pub fn fill_circle<D>(display: &mut D, center: Point, radius: i32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    if radius < 0 {
        return Ok(());
    }
    Circle::with_center(center, diameter(radius))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}

/// One pixel wide ring at `radius` around `center`.
pub fn draw_circle<D>(display: &mut D, center: Point, radius: i32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    if radius < 0 {
        return Ok(());
    }
    Circle::with_center(center, diameter(radius))
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(display)
}

pub fn fill_rect<D>(display: &mut D, x: i32, y: i32, w: i32, h: i32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(area) = rect(x, y, w, h) else {
        return Ok(());
    };
    area.into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}

pub fn fill_round_rect<D>(
    display: &mut D,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    corner: u32,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(area) = rect(x, y, w, h) else {
        return Ok(());
    };
    RoundedRectangle::new(area, CornerRadii::new(Size::new(corner, corner)))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}

pub fn draw_round_rect<D>(
    display: &mut D,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    corner: u32,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(area) = rect(x, y, w, h) else {
        return Ok(());
    };
    RoundedRectangle::new(area, CornerRadii::new(Size::new(corner, corner)))
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(display)
}

/// Print `text` with its top-left corner at `(x, y)` on a solid background.
pub fn print<D>(
    display: &mut D,
    text: &str,
    x: i32,
    y: i32,
    style: MonoTextStyle<'_, Rgb565>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(display)?;
    Ok(())
}

/// Paint the whole panel with the background colour.
pub fn clear<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    let size = display.size();
    Rectangle::new(Point::zero(), size)
        .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
        .draw(display)
}

const fn diameter(radius: i32) -> u32 {
    radius as u32 * 2 + 1
}

fn rect(x: i32, y: i32, w: i32, h: i32) -> Option<Rectangle> {
    if w <= 0 || h <= 0 {
        return None;
    }
    Some(Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32)))
}
