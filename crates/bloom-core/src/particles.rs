//! Two-phase particle dispersal for the scatter stage.
//!
//! Particles first fly outward under gravity while fading (`Scatter`), then,
//! once the swarm has mostly faded, are pulled back toward their target
//! (`Converge`). Velocities are expressed per 60 Hz reference tick and every
//! update scales by `dt * 60`, so results do not depend on the frame rate
//! beyond integration error.

use crate::constants::*;
use crate::params::{color_for_pitch, Hsl};
use crate::state::ParticleSnapshot;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParticlePhase {
    #[default]
    Scatter,
    Converge,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Hsl,
    /// `[0, 1]`
    pub alpha: f32,
    pub size: f32,
    pub target: Vec2,
    /// `[0, 1]`, decays over `max_life` seconds while scattering
    pub life: f32,
    pub max_life: f32,
    pub birth_time: f64,
}

impl Particle {
    #[inline]
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            position: self.position,
            alpha: self.alpha,
            size: self.size,
            color: self.color,
            life: self.life,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParticleConfig {
    pub base_speed: f32,
    pub volume_speed: f32,
    pub speed_jitter: f32,
    pub pitch_bias_range: (f32, f32),
    pub pitch_bias_strength: f32,
    pub gravity: f32,
    pub fade_per_sec: f32,
    pub converge_mean_alpha: f32,
    pub converge_base_speed: f32,
    pub converge_max_multiplier: f32,
    pub converge_reference_distance: f32,
    pub recover_per_sec: f32,
    pub recover_distance: f32,
    pub arrival_threshold: f32,
    pub size_range: (f32, f32),
    pub lifetime_range: (f32, f32),
    pub hue_jitter: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            base_speed: SCATTER_BASE_SPEED,
            volume_speed: SCATTER_VOLUME_SPEED,
            speed_jitter: SCATTER_SPEED_JITTER,
            pitch_bias_range: (SCATTER_PITCH_LOW, SCATTER_PITCH_HIGH),
            pitch_bias_strength: SCATTER_PITCH_BIAS,
            gravity: GRAVITY,
            fade_per_sec: ALPHA_FADE_PER_SEC,
            converge_mean_alpha: CONVERGE_MEAN_ALPHA,
            converge_base_speed: CONVERGE_BASE_SPEED,
            converge_max_multiplier: CONVERGE_MAX_MULTIPLIER,
            converge_reference_distance: CONVERGE_REFERENCE_DISTANCE,
            recover_per_sec: ALPHA_RECOVER_PER_SEC,
            recover_distance: ALPHA_RECOVER_DISTANCE,
            arrival_threshold: ARRIVAL_THRESHOLD,
            size_range: PARTICLE_SIZE_RANGE,
            lifetime_range: PARTICLE_LIFETIME_RANGE,
            hue_jitter: PARTICLE_HUE_JITTER,
        }
    }
}

pub struct ParticleSimulation {
    particles: Vec<Particle>,
    phase: ParticlePhase,
    config: ParticleConfig,
    rng: StdRng,
}

impl ParticleSimulation {
    pub fn new(config: ParticleConfig, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            phase: ParticlePhase::Scatter,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(ParticleConfig::default(), seed)
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn phase(&self) -> ParticlePhase {
        self.phase
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn snapshot(&self) -> impl Iterator<Item = ParticleSnapshot> + '_ {
        self.particles.iter().map(Particle::snapshot)
    }

    /// Spawn one particle per point, all converging on `seed_position` later.
    /// Always restarts in the scatter phase.
    pub fn generate(
        &mut self,
        points: &[Vec2],
        seed_position: Vec2,
        volume: f32,
        pitch: f32,
        now: f64,
    ) {
        let cfg = &self.config;
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let speed = cfg.base_speed + (volume / 100.0) * cfg.volume_speed;

        let (low, high) = cfg.pitch_bias_range;
        let pitch_norm = if pitch.is_finite() {
            ((pitch - low) / (high - low)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        // +y is down (gravity pulls +y): low voices fall, high voices rise.
        let bias = 1.0 - pitch_norm * 2.0;
        let base_color = color_for_pitch(pitch);

        self.particles.reserve(points.len());
        for &point in points {
            let angle = self.rng.gen_range(0.0..TAU);
            let jitter = self.rng.gen_range(-cfg.speed_jitter..=cfg.speed_jitter);
            let particle_speed = speed * (1.0 + jitter);
            let mut velocity = Vec2::new(angle.cos(), angle.sin()) * particle_speed;
            velocity.y += bias * particle_speed * cfg.pitch_bias_strength;

            let hue_offset = self.rng.gen_range(-cfg.hue_jitter..=cfg.hue_jitter);
            let size = self.rng.gen_range(cfg.size_range.0..=cfg.size_range.1);
            let max_life = self
                .rng
                .gen_range(cfg.lifetime_range.0..=cfg.lifetime_range.1);

            self.particles.push(Particle {
                position: point,
                velocity,
                color: Hsl {
                    hue: (base_color.hue + hue_offset).rem_euclid(360.0),
                    ..base_color
                },
                alpha: 1.0,
                size,
                target: seed_position,
                life: 1.0,
                max_life,
                birth_time: now,
            });
        }
        self.phase = ParticlePhase::Scatter;
        log::debug!(
            "[particles] generated {} (speed={:.2}, bias={:.2})",
            points.len(),
            speed,
            bias
        );
    }

    pub fn update(&mut self, dt: f32, _now: f64) {
        let dt = dt.max(0.0);
        match self.phase {
            ParticlePhase::Scatter => self.update_scatter(dt),
            ParticlePhase::Converge => self.update_converge(dt),
        }
    }

    fn update_scatter(&mut self, dt: f32) {
        let cfg = &self.config;
        let ticks = dt * REFERENCE_FPS;
        for p in &mut self.particles {
            p.velocity.y += cfg.gravity * ticks;
            p.position += p.velocity * ticks;
            p.alpha = (p.alpha - cfg.fade_per_sec * dt).max(0.0);
            p.life = (p.life - dt / p.max_life).max(0.0);
        }
        if self.mean_alpha() < cfg.converge_mean_alpha {
            log::debug!("[particles] scatter -> converge");
            self.phase = ParticlePhase::Converge;
        }
    }

    fn update_converge(&mut self, dt: f32) {
        let cfg = &self.config;
        let ticks = dt * REFERENCE_FPS;
        for p in &mut self.particles {
            let to_target = p.target - p.position;
            let mut distance = to_target.length();
            if distance > cfg.arrival_threshold {
                let direction = to_target / distance;
                let speed = converge_speed(cfg, distance);
                let step = (speed * ticks).min(distance);
                p.position += direction * step;
                p.velocity = direction * speed;
                distance -= step;
            } else {
                p.velocity = Vec2::ZERO;
            }
            let proximity = (1.0 - distance / cfg.recover_distance).max(0.0);
            p.alpha = (p.alpha + cfg.recover_per_sec * dt * proximity).min(1.0);
        }
    }

    pub fn mean_alpha(&self) -> f32 {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.particles.iter().map(|p| p.alpha).sum::<f32>() / self.particles.len() as f32
    }

    /// True only while converging and once every particle is within the
    /// arrival threshold of its target.
    pub fn all_particles_arrived(&self) -> bool {
        self.phase == ParticlePhase::Converge
            && self
                .particles
                .iter()
                .all(|p| p.distance_to_target() <= self.config.arrival_threshold)
    }

    /// Drop particles that have both expired and arrived. Order is not kept.
    pub fn cull_faded(&mut self) -> usize {
        if self.phase != ParticlePhase::Converge {
            return 0;
        }
        let threshold = self.config.arrival_threshold;
        let mut removed = 0;
        let mut i = 0;
        while i < self.particles.len() {
            let p = &self.particles[i];
            if p.life <= 0.0 && p.distance_to_target() <= threshold {
                self.particles.swap_remove(i);
                removed += 1;
                continue;
            }
            i += 1;
        }
        removed
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.phase = ParticlePhase::Scatter;
    }
}

/// Ease-out-cubic pull: near particles move at the base speed, particles at or
/// beyond the reference distance at `base * max_multiplier`.
fn converge_speed(cfg: &ParticleConfig, distance: f32) -> f32 {
    let x = (distance / cfg.converge_reference_distance).clamp(0.0, 1.0);
    let eased = 1.0 - (1.0 - x).powi(3);
    let multiplier = 1.0 + eased * (cfg.converge_max_multiplier - 1.0);
    cfg.converge_base_speed * multiplier
}
