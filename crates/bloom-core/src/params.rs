//! Continuous animation parameters derived from the voice signal.
//!
//! Growth speed depends on volume alone; sway and colour depend on pitch
//! alone. The controller keeps no state besides the reference `base_pitch`.

use crate::constants::*;

/// HSL colour in CSS units: hue in degrees, saturation/lightness in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthParameters {
    /// `[1, 3]`, non-decreasing in volume
    pub growth_speed: f32,
    /// Signed; positive when pitch is above the base pitch
    pub sway_amount: f32,
    pub color_hue: f32,
    pub color_saturation: f32,
    pub color_lightness: f32,
}

impl GrowthParameters {
    pub fn color(&self) -> Hsl {
        Hsl {
            hue: self.color_hue,
            saturation: self.color_saturation,
            lightness: self.color_lightness,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GrowthParameterController {
    base_pitch: f32,
}

impl Default for GrowthParameterController {
    fn default() -> Self {
        Self {
            base_pitch: DEFAULT_BASE_PITCH,
        }
    }
}

impl GrowthParameterController {
    pub fn new(base_pitch: f32) -> Self {
        Self { base_pitch }
    }

    pub fn set_base_pitch(&mut self, pitch: f32) {
        self.base_pitch = pitch;
    }

    pub fn base_pitch(&self) -> f32 {
        self.base_pitch
    }

    pub fn update(&self, volume: f32, pitch: f32) -> GrowthParameters {
        GrowthParameters {
            growth_speed: growth_speed(volume),
            sway_amount: (pitch - self.base_pitch) / 100.0,
            color_hue: hue_for_pitch(pitch),
            color_saturation: saturation_for_pitch(pitch),
            color_lightness: lightness_for_pitch(pitch),
        }
    }
}

/// Cubic easing `x^2 (3 - 2x)` on `[0, 1]`.
#[inline]
pub fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

#[inline]
pub fn growth_speed(volume: f32) -> f32 {
    if !volume.is_finite() {
        return 1.0;
    }
    1.0 + smoothstep(volume / 100.0) * 2.0
}

// Position of `pitch` within the colour band, 0 at or below the low edge
// and for non-finite pitch.
#[inline]
fn color_band(pitch: f32) -> f32 {
    if !pitch.is_finite() {
        return 0.0;
    }
    ((pitch - COLOR_PITCH_LOW) / (COLOR_PITCH_HIGH - COLOR_PITCH_LOW)).clamp(0.0, 1.0)
}

#[inline]
fn lerp(range: (f32, f32), t: f32) -> f32 {
    range.0 + (range.1 - range.0) * t
}

pub fn hue_for_pitch(pitch: f32) -> f32 {
    lerp(HUE_RANGE, color_band(pitch))
}

pub fn saturation_for_pitch(pitch: f32) -> f32 {
    lerp(SATURATION_RANGE, color_band(pitch))
}

pub fn lightness_for_pitch(pitch: f32) -> f32 {
    if !pitch.is_finite() {
        return LIGHTNESS_RANGE.0;
    }
    (LIGHTNESS_RANGE.0 + pitch / 10.0).clamp(LIGHTNESS_RANGE.0, LIGHTNESS_RANGE.1)
}

pub fn color_for_pitch(pitch: f32) -> Hsl {
    Hsl {
        hue: hue_for_pitch(pitch),
        saturation: saturation_for_pitch(pitch),
        lightness: lightness_for_pitch(pitch),
    }
}
