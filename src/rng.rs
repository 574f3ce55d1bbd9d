//! Random source for gameplay.
//!
//! Everything random in the arcade (spawn positions, velocities, colors,
//! particle jitter) is drawn through [`Entropy`]. On the board the hardware
//! RNG backs it; tests use a seeded [`Pcg32`] so runs are reproducible.

use embedded_graphics::pixelcolor::{
    Rgb565,
    Rgb888,
};
use rand_core::RngCore as _;
pub use rand_pcg::Pcg32;

/// Source of uniformly distributed 32-bit values.
///
/// Only [`uniform32`](Entropy::uniform32) is required; the range helpers are
/// derived from it.
pub trait Entropy {
    fn uniform32(&mut self) -> u32;

    /// Uniform integer in the inclusive range `[min, max]`.
    ///
    /// Computed as `min + uniform32() % (max - min + 1)`, so callers must
    /// guarantee `max >= min`.
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(max >= min, "int_range called with max < min");
        let span = max.wrapping_sub(min).wrapping_add(1) as u32;
        if span == 0 {
            // Full i32 range.
            return self.uniform32() as i32;
        }
        min.wrapping_add((self.uniform32() % span) as i32)
    }

    /// `+1` or `-1` with equal probability.
    fn sign(&mut self) -> i32 {
        if self.int_range(0, 1) == 1 { 1 } else { -1 }
    }

    /// Random colour with each 8-bit channel drawn from `[lo, hi]`.
    fn color(&mut self, lo: u8, hi: u8) -> Rgb565 {
        let r = self.int_range(i32::from(lo), i32::from(hi)) as u8;
        let g = self.int_range(i32::from(lo), i32::from(hi)) as u8;
        let b = self.int_range(i32::from(lo), i32::from(hi)) as u8;
        Rgb565::from(Rgb888::new(r, g, b))
    }
}

impl Entropy for Pcg32 {
    fn uniform32(&mut self) -> u32 {
        self.next_u32()
    }
}

#[cfg(feature = "board")]
impl Entropy for esp_hal::rng::Rng {
    fn uniform32(&mut self) -> u32 {
        self.random()
    }
}

impl<E: Entropy + ?Sized> Entropy for &mut E {
    fn uniform32(&mut self) -> u32 {
        (**self).uniform32()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Entropy;

    /// Replays a fixed list of raw draws, cycling when exhausted.
    pub struct Scripted {
        values: &'static [u32],
        next: usize,
    }

    impl Scripted {
        pub const fn new(values: &'static [u32]) -> Self {
            Self { values, next: 0 }
        }
    }

    impl Entropy for Scripted {
        fn uniform32(&mut self) -> u32 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }
}
