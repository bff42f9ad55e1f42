//! Per-tick state carried between frames and the read-only views handed to
//! the renderer.
//!
//! Nothing here is global: the caller owns a [`SignalSmoothing`] value and
//! passes it through each tick, which keeps every component testable in
//! isolation.

use crate::constants::*;
use crate::params::Hsl;
use crate::signal::AudioFrame;
use glam::Vec2;

/// Frame-to-frame smoothing of the raw voice signal.
///
/// Volume rises quickly and falls slowly. Pitch follows a single time
/// constant and is held through silent frames so colours do not snap back to
/// their low end between syllables.
#[derive(Clone, Copy, Debug)]
pub struct SignalSmoothing {
    pub volume: f32,
    pub pitch: f32,
    pub rise_tau_sec: f32,
    pub fall_tau_sec: f32,
    pub pitch_tau_sec: f32,
    primed: bool,
}

impl Default for SignalSmoothing {
    fn default() -> Self {
        Self {
            volume: 0.0,
            pitch: 0.0,
            rise_tau_sec: VOLUME_RISE_TAU_SEC,
            fall_tau_sec: VOLUME_FALL_TAU_SEC,
            pitch_tau_sec: PITCH_TAU_SEC,
            primed: false,
        }
    }
}

impl SignalSmoothing {
    /// Non-finite inputs are ignored; the previous value is kept.
    pub fn smooth(&mut self, frame: AudioFrame, dt_sec: f32) -> AudioFrame {
        let dt_sec = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        let volume_ok = frame.volume.is_finite();
        let pitch_ok = frame.pitch.is_finite() && frame.pitch > 0.0;
        if !self.primed {
            if volume_ok {
                self.volume = frame.volume;
            }
            if pitch_ok {
                self.pitch = frame.pitch;
            }
            self.primed = true;
            return self.current();
        }

        let alpha_up = 1.0 - (-dt_sec / self.rise_tau_sec).exp();
        let alpha_down = 1.0 - (-dt_sec / self.fall_tau_sec).exp();
        if volume_ok {
            let alpha = if frame.volume > self.volume {
                alpha_up
            } else {
                alpha_down
            };
            self.volume += (frame.volume - self.volume) * alpha;
        }

        if pitch_ok {
            let alpha_pitch = 1.0 - (-dt_sec / self.pitch_tau_sec).exp();
            self.pitch += (frame.pitch - self.pitch) * alpha_pitch;
        }
        self.current()
    }

    pub fn current(&self) -> AudioFrame {
        AudioFrame {
            volume: self.volume.clamp(0.0, 100.0),
            pitch: self.pitch.max(0.0),
        }
    }

    pub fn reset(&mut self) {
        *self = Self {
            rise_tau_sec: self.rise_tau_sec,
            fall_tau_sec: self.fall_tau_sec,
            pitch_tau_sec: self.pitch_tau_sec,
            ..Self::default()
        };
    }
}

/// What the renderer needs to draw one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSnapshot {
    pub position: Vec2,
    pub alpha: f32,
    pub size: f32,
    pub color: Hsl,
    pub life: f32,
}
