//! Five-stage growth state machine.
//!
//! Transitions only move forward and are checked once per `update` for the
//! current state. `Scatter` is left only through `reset`.

use crate::constants::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrowthState {
    #[default]
    Seed,
    Sprout,
    Stem,
    Bloom,
    Scatter,
}

impl GrowthState {
    pub fn name(self) -> &'static str {
        match self {
            GrowthState::Seed => "seed",
            GrowthState::Sprout => "sprout",
            GrowthState::Stem => "stem",
            GrowthState::Bloom => "bloom",
            GrowthState::Scatter => "scatter",
        }
    }
}

impl std::fmt::Display for GrowthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GrowthThresholds {
    pub sprout_volume: f32,
    pub stem_progress: f32,
    pub bloom_progress: f32,
    pub scatter_volume: f32,
}

impl Default for GrowthThresholds {
    fn default() -> Self {
        Self {
            sprout_volume: SPROUT_VOLUME,
            stem_progress: STEM_PROGRESS,
            bloom_progress: BLOOM_PROGRESS,
            scatter_volume: SCATTER_VOLUME,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GrowthStateMachine {
    state: GrowthState,
    thresholds: GrowthThresholds,
}

impl GrowthStateMachine {
    pub fn new(thresholds: GrowthThresholds) -> Self {
        Self {
            state: GrowthState::Seed,
            thresholds,
        }
    }

    pub fn state(&self) -> GrowthState {
        self.state
    }

    pub fn thresholds(&self) -> &GrowthThresholds {
        &self.thresholds
    }

    /// Check the current state's exit condition once and return the
    /// (possibly new) state. Never advances more than one step.
    pub fn update(&mut self, volume: f32, growth_progress: f32) -> GrowthState {
        let t = &self.thresholds;
        let next = match self.state {
            GrowthState::Seed if volume >= t.sprout_volume => GrowthState::Sprout,
            GrowthState::Sprout if growth_progress >= t.stem_progress => GrowthState::Stem,
            GrowthState::Stem if growth_progress >= t.bloom_progress => GrowthState::Bloom,
            GrowthState::Bloom if volume >= t.scatter_volume => GrowthState::Scatter,
            s => s,
        };
        if next != self.state {
            log::info!(
                "[growth] {} -> {} (volume={:.1}, progress={:.1})",
                self.state,
                next,
                volume,
                growth_progress
            );
            self.state = next;
        }
        self.state
    }

    pub fn reset(&mut self) {
        if self.state != GrowthState::Seed {
            log::info!("[growth] reset {} -> seed", self.state);
        }
        self.state = GrowthState::Seed;
    }
}
