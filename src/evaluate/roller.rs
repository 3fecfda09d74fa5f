use std::num::NonZeroU32;

use rand::Rng;

/// Source of die results.
pub trait Roller {
    /// Returns a value uniformly distributed in `1..=sides`.
    fn roll(&mut self, sides: NonZeroU32) -> u32;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroU32) -> u32 {
        self.gen_range(1..=sides.get())
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedRoller;
