//! Touch input: the sampler seam and screen-space correction.
//!
//! The panel's touch layer is mounted mirrored relative to the display, so
//! every raw sample goes through [`TouchTransform::apply`] before any game
//! sees it.

use embedded_graphics::prelude::{
    Point,
    Size,
};

/// Non-blocking source of raw pointer samples.
///
/// Polled once per frame. Returns `None` when the panel is not being touched.
pub trait PointerSampler {
    fn try_sample(&mut self) -> Option<(u16, u16)>;
}

impl<P: PointerSampler + ?Sized> PointerSampler for &mut P {
    fn try_sample(&mut self) -> Option<(u16, u16)> {
        (**self).try_sample()
    }
}

/// Axis mirroring applied to raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchTransform {
    /// `x' = w - x`
    pub mirror_x: bool,
    /// `y' = h - y`
    pub mirror_y: bool,
}

impl TouchTransform {
    /// Horizontal mirror only, which is what the stock panel needs.
    pub const MIRROR_X: Self = Self {
        mirror_x: true,
        mirror_y: false,
    };

    pub const IDENTITY: Self = Self {
        mirror_x: false,
        mirror_y: false,
    };

    /// Map a raw sample into screen space and clamp it to `[0, dim - 1]`.
    #[must_use]
    pub fn apply(self, raw: (u16, u16), screen: Size) -> Point {
        let (w, h) = (screen.width as i32, screen.height as i32);
        let mut x = i32::from(raw.0);
        let mut y = i32::from(raw.1);
        if self.mirror_x {
            x = w - x;
        }
        if self.mirror_y {
            y = h - y;
        }
        Point::new(x.clamp(0, (w - 1).max(0)), y.clamp(0, (h - 1).max(0)))
    }
}

impl Default for TouchTransform {
    fn default() -> Self {
        Self::MIRROR_X
    }
}

/// Normalize a raw sample with the stock horizontal mirror.
#[must_use]
pub fn normalize(raw: (u16, u16), screen: Size) -> Point {
    TouchTransform::MIRROR_X.apply(raw, screen)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const SCREEN: Size = Size::new(320, 240);

    #[test]
    fn mirrors_horizontally_only() {
        assert_eq!(normalize((20, 30), SCREEN), Point::new(300, 30));
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        // x = 0 mirrors onto the right edge itself, one past the last column.
        assert_eq!(normalize((0, 0), SCREEN), Point::new(319, 0));
        assert_eq!(normalize((400, 999), SCREEN), Point::new(0, 239));
        assert_eq!(normalize((u16::MAX, u16::MAX), SCREEN), Point::new(0, 239));
    }

    #[test]
    fn identity_only_clamps() {
        assert_eq!(
            TouchTransform::IDENTITY.apply((12, 500), SCREEN),
            Point::new(12, 239)
        );
    }

    #[test]
    fn vertical_mirror_is_available() {
        let both = TouchTransform {
            mirror_x: true,
            mirror_y: true,
        };
        assert_eq!(both.apply((10, 40), SCREEN), Point::new(310, 200));
    }

    proptest! {
        #[test]
        fn mirror_is_self_inverse(x in 1u16..320, y in 0u16..240) {
            let once = normalize((x, y), SCREEN);
            let twice = normalize((once.x as u16, once.y as u16), SCREEN);
            prop_assert_eq!(twice, Point::new(i32::from(x), i32::from(y)));
        }

        #[test]
        fn result_is_always_on_screen(x in any::<u16>(), y in any::<u16>()) {
            let p = normalize((x, y), SCREEN);
            prop_assert!(p.x >= 0 && p.x < 320);
            prop_assert!(p.y >= 0 && p.y < 240);
        }
    }
}
