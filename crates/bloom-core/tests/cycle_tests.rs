// Host-side tests for the per-tick orchestration of a full growth cycle.

use bloom_core::rose::curve_points;
use bloom_core::*;
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn shape() -> BloomShape {
    BloomShape {
        points: curve_points(60.0, 5.0, 48, Vec2::ZERO),
        seed: Vec2::new(0.0, 200.0),
    }
}

fn voice(volume: f32, pitch: f32) -> AudioFrame {
    AudioFrame { volume, pitch }
}

#[test]
fn silence_keeps_the_seed_dormant() {
    let mut cycle = BloomCycle::new(CycleConfig::default(), 1);
    let shape = shape();
    for i in 0..300 {
        let out = cycle.tick(AudioFrame::SILENCE, DT, i as f64 * DT as f64, &shape);
        assert_eq!(out.state, GrowthState::Seed);
        assert_eq!(out.progress, 0.0);
    }
}

#[test]
fn sustained_voice_grows_to_bloom_then_scatters() {
    let mut cycle = BloomCycle::new(CycleConfig::default(), 2);
    let shape = shape();
    let mut seen = vec![GrowthState::Seed];
    let mut t = 0.0f64;

    // Moderate singing grows the plant without scattering it.
    for _ in 0..2_000 {
        let out = cycle.tick(voice(60.0, 350.0), DT, t, &shape);
        t += DT as f64;
        if out.transitioned {
            seen.push(out.state);
        }
        assert!(out.progress <= 300.0);
        if out.state == GrowthState::Bloom {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![GrowthState::Seed, GrowthState::Sprout, GrowthState::Stem, GrowthState::Bloom]
    );

    // A loud burst scatters the bloom into one particle per shape point.
    let mut out = cycle.tick(voice(100.0, 350.0), DT, t, &shape);
    for _ in 0..30 {
        if out.state == GrowthState::Scatter {
            break;
        }
        t += DT as f64;
        out = cycle.tick(voice(100.0, 350.0), DT, t, &shape);
    }
    assert_eq!(out.state, GrowthState::Scatter);
    assert_eq!(cycle.particles().len(), shape.points.len());
    assert_eq!(cycle.particles().phase(), ParticlePhase::Scatter);
}

#[test]
fn full_convergence_restarts_the_cycle() {
    let mut cycle = BloomCycle::new(CycleConfig::default(), 3);
    let shape = shape();
    let mut t = 0.0f64;
    let mut reached_scatter = false;
    let mut restarted = false;
    for _ in 0..20_000 {
        let out = cycle.tick(voice(100.0, 500.0), DT, t, &shape);
        t += DT as f64;
        if out.state == GrowthState::Scatter {
            reached_scatter = true;
        } else if reached_scatter && out.state == GrowthState::Seed {
            restarted = true;
            assert_eq!(out.progress, 0.0);
            assert!(cycle.particles().is_empty());
            break;
        }
    }
    assert!(reached_scatter, "never scattered");
    assert!(restarted, "never returned to seed");
}

#[test]
fn bloom_k_follows_smoothed_pitch() {
    let mut cycle = BloomCycle::new(CycleConfig::default(), 4);
    let shape = shape();
    let out = cycle.tick(voice(10.0, 500.0), DT, 0.0, &shape);
    assert!((out.bloom_k - 5.0).abs() < 1e-4);
    assert_eq!(out.signal.pitch, 500.0);
}

#[test]
fn reset_returns_to_seed() {
    let mut cycle = BloomCycle::new(CycleConfig::default(), 5);
    let shape = shape();
    for i in 0..200 {
        cycle.tick(voice(80.0, 300.0), DT, i as f64 * DT as f64, &shape);
    }
    assert_ne!(cycle.state(), GrowthState::Seed);
    cycle.reset();
    assert_eq!(cycle.state(), GrowthState::Seed);
    assert_eq!(cycle.progress(), 0.0);
}

#[test]
fn glitched_frame_does_not_stall_growth() {
    let mut cycle = BloomCycle::new(CycleConfig::default(), 6);
    let shape = shape();
    cycle.tick(voice(20.0, 300.0), DT, 0.0, &shape);
    let out = cycle.tick(voice(f32::NAN, f32::NAN), DT, DT as f64, &shape);
    assert!(out.signal.volume.is_finite());
    assert!(out.signal.pitch.is_finite());
    assert!(out.params.color_hue.is_finite());

    let mut state = out.state;
    for i in 2..600 {
        state = cycle.tick(voice(90.0, 300.0), DT, i as f64 * DT as f64, &shape).state;
        if state != GrowthState::Seed {
            break;
        }
    }
    assert_ne!(state, GrowthState::Seed, "growth stuck after a NaN frame");
}

#[test]
fn glitch_on_first_frame_is_ignored() {
    let mut cycle = BloomCycle::new(CycleConfig::default(), 7);
    let out = cycle.tick(voice(f32::INFINITY, f32::NAN), DT, 0.0, &shape());
    assert_eq!(out.signal, AudioFrame::SILENCE);
    assert_eq!(out.state, GrowthState::Seed);
}
