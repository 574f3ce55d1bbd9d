//! In-memory panel for tests.

extern crate std;

use core::{
    convert::Infallible,
    ops::Range,
};
use std::{
    vec,
    vec::Vec,
};

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

use crate::gfx::BACKGROUND;

/// Frame buffer that clips like the real panel and remembers every pixel.
pub struct Canvas {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, BACKGROUND)
    }

    /// Canvas pre-painted with `color`, to spot pixels nobody drew.
    pub fn filled(width: u32, height: u32, color: Rgb565) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![color; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.index(Point::new(x, y)).map(|i| self.pixels[i])
    }

    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Copy of the given rows, top to bottom.
    pub fn rows(&self, rows: Range<u32>) -> Vec<Rgb565> {
        let w = self.size.width as usize;
        self.pixels[rows.start as usize * w..rows.end as usize * w].to_vec()
    }

    fn index(&self, p: Point) -> Option<usize> {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        (p.x >= 0 && p.y >= 0 && p.x < w && p.y < h).then(|| (p.y * w + p.x) as usize)
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if let Some(i) = self.index(p) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}
