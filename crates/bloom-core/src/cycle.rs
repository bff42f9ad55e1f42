//! One full seed-to-scatter cycle driven tick by tick.
//!
//! The caller samples the signal once per tick and hands the frame in; the
//! smoothed values derived from it are what every component sees that tick.

use crate::constants::*;
use crate::growth::{GrowthState, GrowthStateMachine, GrowthThresholds};
use crate::params::{GrowthParameterController, GrowthParameters};
use crate::particles::{ParticleConfig, ParticleSimulation};
use crate::rose::calculate_k_from_pitch;
use crate::signal::AudioFrame;
use crate::state::SignalSmoothing;
use glam::Vec2;

/// Geometry owned by the renderer: where particles spawn and where they
/// return to.
#[derive(Clone, Debug, Default)]
pub struct BloomShape {
    pub points: Vec<Vec2>,
    pub seed: Vec2,
}

#[derive(Clone, Debug)]
pub struct CycleConfig {
    pub thresholds: GrowthThresholds,
    pub particles: ParticleConfig,
    pub base_pitch: f32,
    pub k_range: (f32, f32),
    pub k_pitch_range: (f32, f32),
    pub smoothing: SignalSmoothing,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            thresholds: GrowthThresholds::default(),
            particles: ParticleConfig::default(),
            base_pitch: DEFAULT_BASE_PITCH,
            k_range: BLOOM_K_RANGE,
            k_pitch_range: BLOOM_K_PITCH_RANGE,
            smoothing: SignalSmoothing::default(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TickOutput {
    pub state: GrowthState,
    pub params: GrowthParameters,
    pub progress: f32,
    /// Petal count for the bloom rose curve
    pub bloom_k: f32,
    /// The smoothed signal every component saw this tick
    pub signal: AudioFrame,
    pub transitioned: bool,
}

pub struct BloomCycle {
    growth: GrowthStateMachine,
    controller: GrowthParameterController,
    particles: ParticleSimulation,
    smoothing: SignalSmoothing,
    progress: f32,
    k_range: (f32, f32),
    k_pitch_range: (f32, f32),
}

impl BloomCycle {
    pub fn new(config: CycleConfig, seed: u64) -> Self {
        Self {
            growth: GrowthStateMachine::new(config.thresholds),
            controller: GrowthParameterController::new(config.base_pitch),
            particles: ParticleSimulation::new(config.particles, seed),
            smoothing: config.smoothing,
            progress: 0.0,
            k_range: config.k_range,
            k_pitch_range: config.k_pitch_range,
        }
    }

    pub fn state(&self) -> GrowthState {
        self.growth.state()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn particles(&self) -> &ParticleSimulation {
        &self.particles
    }

    pub fn controller_mut(&mut self) -> &mut GrowthParameterController {
        &mut self.controller
    }

    pub fn tick(
        &mut self,
        frame: AudioFrame,
        dt: f32,
        now: f64,
        shape: &BloomShape,
    ) -> TickOutput {
        let dt = dt.max(0.0);
        let signal = self.smoothing.smooth(frame, dt);
        let params = self.controller.update(signal.volume, signal.pitch);

        let before = self.growth.state();
        if matches!(before, GrowthState::Sprout | GrowthState::Stem) {
            let bloom_at = self.growth.thresholds().bloom_progress;
            self.progress = (self.progress
                + params.growth_speed * (signal.volume / 100.0) * dt * REFERENCE_FPS)
                .min(bloom_at);
        }
        let state = self.growth.update(signal.volume, self.progress);

        if state == GrowthState::Scatter {
            if before != GrowthState::Scatter {
                self.particles.reset();
                self.particles
                    .generate(&shape.points, shape.seed, signal.volume, signal.pitch, now);
            } else {
                self.particles.update(dt, now);
                self.particles.cull_faded();
                if self.particles.all_particles_arrived() {
                    log::info!("[cycle] all particles home, restarting");
                    self.reset();
                }
            }
        }

        TickOutput {
            state: self.growth.state(),
            params,
            progress: self.progress,
            bloom_k: calculate_k_from_pitch(
                signal.pitch,
                self.k_range.0,
                self.k_range.1,
                self.k_pitch_range.0,
                self.k_pitch_range.1,
            ),
            signal,
            transitioned: self.growth.state() != before,
        }
    }

    /// Back to a bare seed. Smoothing state survives so the signal does not
    /// jump on the next tick.
    pub fn reset(&mut self) {
        self.growth.reset();
        self.particles.reset();
        self.progress = 0.0;
    }
}
