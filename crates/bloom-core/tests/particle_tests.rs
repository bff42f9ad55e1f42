// Host-side tests for the scatter/converge particle simulation.
// Every simulation is seeded so runs are reproducible.

use bloom_core::{ParticleConfig, ParticlePhase, ParticleSimulation};
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;
const SEED: Vec2 = Vec2::new(0.0, 0.0);

fn ring_points(n: usize, radius: f32) -> Vec<Vec2> {
    (0..n)
        .map(|i| {
            let a = i as f32 / n as f32 * std::f32::consts::TAU;
            Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

fn scattered(volume: f32, pitch: f32) -> ParticleSimulation {
    let mut sim = ParticleSimulation::with_seed(7);
    sim.generate(&ring_points(32, 100.0), SEED, volume, pitch, 0.0);
    sim
}

fn run_until_converge(sim: &mut ParticleSimulation) -> usize {
    let mut steps = 0;
    while sim.phase() == ParticlePhase::Scatter {
        sim.update(DT, steps as f64 * DT as f64);
        steps += 1;
        assert!(steps < 10_000, "never left scatter phase");
    }
    steps
}

#[test]
fn generate_spawns_one_particle_per_point() {
    let sim = scattered(50.0, 400.0);
    assert_eq!(sim.len(), 32);
    assert_eq!(sim.phase(), ParticlePhase::Scatter);
    for p in sim.particles() {
        assert_eq!(p.alpha, 1.0);
        assert_eq!(p.life, 1.0);
        assert!((3.0..=5.0).contains(&p.max_life));
        assert!(p.size > 0.0);
        assert_eq!(p.target, SEED);
        assert_eq!(p.birth_time, 0.0);
        assert!((90.0..=200.0).contains(&p.color.hue));
    }
}

#[test]
fn louder_voice_scatters_faster() {
    let quiet = scattered(10.0, 400.0);
    let loud = scattered(90.0, 400.0);
    for (q, l) in quiet.particles().iter().zip(loud.particles()) {
        assert!(
            l.velocity.length() > q.velocity.length(),
            "loud {} <= quiet {}",
            l.velocity.length(),
            q.velocity.length()
        );
    }
}

#[test]
fn initial_speed_stays_within_jitter_band() {
    let sim = scattered(100.0, 500.0); // bias 0 at the middle of the pitch band
    for p in sim.particles() {
        let speed = p.velocity.length();
        assert!(speed >= 5.0 * 0.8 - 1e-4 && speed <= 5.0 * 1.2 + 1e-4, "speed {speed}");
    }
}

#[test]
fn high_pitch_lifts_and_low_pitch_drops() {
    // +y points down, the same way gravity pulls.
    let low = scattered(50.0, 100.0);
    let high = scattered(50.0, 900.0);
    let mean_vy = |s: &ParticleSimulation| {
        s.particles().iter().map(|p| p.velocity.y).sum::<f32>() / s.len() as f32
    };
    assert!(
        mean_vy(&high) < mean_vy(&low),
        "high {} should rise above low {}",
        mean_vy(&high),
        mean_vy(&low)
    );
    for (l, h) in low.particles().iter().zip(high.particles()) {
        assert!(h.velocity.y < l.velocity.y);
    }
}

#[test]
fn non_finite_signal_spawns_finite_particles() {
    let mut sim = ParticleSimulation::with_seed(9);
    sim.generate(&ring_points(8, 50.0), SEED, f32::NAN, f32::INFINITY, 0.0);
    for p in sim.particles() {
        assert!(p.velocity.is_finite(), "velocity {:?}", p.velocity);
        assert!(p.color.hue.is_finite());
    }
}

#[test]
fn scatter_step_applies_gravity_and_fades() {
    let mut sim = scattered(60.0, 300.0);
    let before: Vec<_> = sim.particles().to_vec();
    sim.update(DT, DT as f64);
    for (b, a) in before.iter().zip(sim.particles()) {
        assert!(a.velocity.y > b.velocity.y, "gravity did not pull");
        assert!(a.alpha < b.alpha, "alpha did not fade");
        assert!(a.life < b.life, "life did not decay");
        assert!(a.position != b.position);
    }
}

#[test]
fn alpha_and_life_never_go_negative() {
    let mut sim = scattered(100.0, 300.0);
    for _ in 0..20 {
        sim.update(1.0, 0.0);
    }
    for p in sim.particles() {
        assert!(p.alpha >= 0.0);
        assert!(p.life >= 0.0);
    }
}

#[test]
fn every_volume_eventually_converges() {
    for &volume in &[0.0f32, 25.0, 70.0, 100.0] {
        let mut sim = scattered(volume, 300.0);
        let steps = run_until_converge(&mut sim);
        assert!(sim.mean_alpha() < 0.3);
        // 0.7 alpha at 0.3/s is ~2.33 s of frames
        assert!((130..=150).contains(&steps), "converged after {steps} steps");
    }
}

#[test]
fn not_arrived_while_scattering() {
    let mut sim = ParticleSimulation::with_seed(3);
    // Spawned exactly on the target, but scatter never reports arrival.
    sim.generate(&[SEED, SEED], SEED, 0.0, 0.0, 0.0);
    assert!(!sim.all_particles_arrived());
}

#[test]
fn converge_never_increases_distance() {
    let mut sim = scattered(80.0, 600.0);
    run_until_converge(&mut sim);
    let mut prev: Vec<f32> = sim.particles().iter().map(|p| p.distance_to_target()).collect();
    for _ in 0..600 {
        sim.update(DT, 0.0);
        let now: Vec<f32> = sim.particles().iter().map(|p| p.distance_to_target()).collect();
        for (a, b) in prev.iter().zip(&now) {
            assert!(b <= a, "distance grew from {a} to {b}");
        }
        prev = now;
    }
    assert!(sim.all_particles_arrived());
    for p in sim.particles() {
        assert_eq!(p.velocity, Vec2::ZERO);
    }
}

#[test]
fn farther_particles_move_faster() {
    // No gravity keeps both particles inside the easing range.
    let config = ParticleConfig {
        gravity: 0.0,
        ..ParticleConfig::default()
    };
    let mut sim = ParticleSimulation::new(config, 11);
    let near = Vec2::new(40.0, 0.0);
    let far = Vec2::new(0.0, 250.0);
    sim.generate(&[near, far], SEED, 0.0, 500.0, 0.0);
    run_until_converge(&mut sim);
    let before: Vec<Vec2> = sim.particles().iter().map(|p| p.position).collect();
    let dist_before: Vec<f32> = sim.particles().iter().map(|p| p.distance_to_target()).collect();
    sim.update(DT, 0.0);
    let moved: Vec<f32> = sim
        .particles()
        .iter()
        .zip(&before)
        .map(|(p, b)| p.position.distance(*b))
        .collect();
    let (near_i, far_i) = if dist_before[0] < dist_before[1] { (0, 1) } else { (1, 0) };
    assert!(dist_before[near_i] > 5.0);
    assert!(moved[far_i] > moved[near_i]);
}

#[test]
fn converging_particles_regain_alpha_near_target() {
    let mut sim = scattered(20.0, 300.0);
    run_until_converge(&mut sim);
    let faded = sim.mean_alpha();
    for _ in 0..600 {
        sim.update(DT, 0.0);
    }
    assert!(sim.mean_alpha() > faded);
    assert!(sim.particles().iter().all(|p| p.alpha <= 1.0));
}

#[test]
fn reset_clears_particles_and_phase() {
    let mut sim = scattered(50.0, 300.0);
    run_until_converge(&mut sim);
    sim.reset();
    assert!(sim.is_empty());
    assert_eq!(sim.phase(), ParticlePhase::Scatter);
    assert!(!sim.all_particles_arrived());
}

#[test]
fn same_seed_same_swarm() {
    let a = scattered(55.0, 321.0);
    let b = scattered(55.0, 321.0);
    for (pa, pb) in a.particles().iter().zip(b.particles()) {
        assert_eq!(pa.velocity, pb.velocity);
        assert_eq!(pa.size, pb.size);
        assert_eq!(pa.max_life, pb.max_life);
    }
}

#[test]
fn snapshot_mirrors_particles() {
    let sim = scattered(50.0, 300.0);
    let snaps: Vec<_> = sim.snapshot().collect();
    assert_eq!(snaps.len(), sim.len());
    for (s, p) in snaps.iter().zip(sim.particles()) {
        assert_eq!(s.position, p.position);
        assert_eq!(s.alpha, p.alpha);
        assert_eq!(s.life, p.life);
    }
}
