//! Game dispatcher.

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

use crate::{
    config::ArcadeConfig,
    games::{
        GameKind,
        MemoryGrid,
        RainCatch,
        TapBall,
        Whack,
    },
    rng::Entropy,
    session,
    touch::PointerSampler,
};

impl GameKind {
    /// Run this game until the player switches away.
    pub async fn play<D, P, E>(
        self,
        display: &mut D,
        sampler: &mut P,
        rng: &mut E,
        config: &ArcadeConfig,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565> + OriginDimensions,
        P: PointerSampler,
        E: Entropy,
    {
        match self {
            Self::TapBall => session::play::<TapBall, _, _, _>(display, sampler, rng, config).await,
            Self::Whack => session::play::<Whack, _, _, _>(display, sampler, rng, config).await,
            Self::MemoryGrid => session::play::<MemoryGrid, _, _, _>(display, sampler, rng, config).await,
            Self::RainCatch => session::play::<RainCatch, _, _, _>(display, sampler, rng, config).await,
        }
    }
}

/// Play games forever, moving to the next one in rotation every time the
/// switch signal fires. Only returns if drawing fails.
pub async fn run<D, P, E>(
    display: &mut D,
    sampler: &mut P,
    rng: &mut E,
    config: &ArcadeConfig,
) -> Result<Infallible, D::Error>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    P: PointerSampler,
    E: Entropy,
{
    let mut kind = config.first_game;
    if !config.switch.enabled() {
        info!("game switching disabled, running {}", kind.label());
    }
    loop {
        kind.play(display, sampler, rng, config).await?;
        kind = kind.next();
        debug!("next game: {}", kind.label());
    }
}
