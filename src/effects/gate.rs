use rand::RngCore;

use crate::foundation::error::SynthResult;
use crate::foundation::math::{chance, check_prob};
use crate::render::raster::Raster;

/// A raster-to-raster transform with randomized parameters.
///
/// Implementations keep dimensions and the premultiplied RGBA8 layout of their input.
pub trait Effect: Send + Sync {
    /// Stable stage name used in traces and logs.
    fn name(&self) -> &'static str;

    /// Produce the transformed raster, drawing parameters from `rng`.
    fn apply(&self, src: &Raster, rng: &mut dyn RngCore) -> SynthResult<Raster>;
}

impl Effect for Box<dyn Effect> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn apply(&self, src: &Raster, rng: &mut dyn RngCore) -> SynthResult<Raster> {
        self.as_ref().apply(src, rng)
    }
}

/// Outcome of a single gate draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GateState {
    /// The guarded transform runs.
    Open,
    /// The input passes through untouched.
    #[default]
    Closed,
}

impl GateState {
    /// `true` for [`GateState::Open`].
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Bernoulli activation decision with a fixed probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gate {
    prob: f64,
}

impl Gate {
    /// Gate that never opens.
    pub const NEVER: Self = Self { prob: 0.0 };

    /// Gate opening with probability `prob` in `[0, 1]`.
    pub fn new(prob: f64) -> SynthResult<Self> {
        check_prob("gate probability", prob)?;
        Ok(Self { prob })
    }

    /// Activation probability.
    pub fn prob(self) -> f64 {
        self.prob
    }

    /// Draw a fresh decision. Every call consumes randomness, whatever the probability.
    pub fn draw(self, rng: &mut dyn RngCore) -> GateState {
        if chance(rng, self.prob) {
            GateState::Open
        } else {
            GateState::Closed
        }
    }
}

/// An effect paired with the gate deciding whether it runs.
#[derive(Clone, Debug)]
pub struct Gated<E> {
    /// Activation decision.
    pub gate: Gate,
    /// Guarded transform.
    pub effect: E,
}

impl<E: Effect> Gated<E> {
    /// Pair `effect` with `gate`.
    pub fn new(gate: Gate, effect: E) -> Self {
        Self { gate, effect }
    }

    /// Draw the gate and, when open, replace `raster` with the transformed result.
    pub fn run(&self, raster: &mut Raster, rng: &mut dyn RngCore) -> SynthResult<GateState> {
        let state = self.gate.draw(rng);
        if state.is_open() {
            *raster = self.effect.apply(raster, rng)?;
        }
        Ok(state)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gate.rs"]
mod tests;
