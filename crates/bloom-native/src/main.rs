use std::thread;
use std::time::{Duration, Instant};

use bloom_core::constants::ANALYSIS_WINDOW;
use bloom_core::rose::curve_points;
use bloom_core::{BloomCycle, BloomShape, CycleConfig, GrowthState, SignalAnalyzer};
use glam::Vec2;

mod capture;

use capture::CpalSource;

const FRAME: Duration = Duration::from_micros(16_667);
const BLOOM_RADIUS: f32 = 120.0;
const BLOOM_SEGMENTS: usize = 180;
const SEED_POSITION: Vec2 = Vec2::new(0.0, 240.0);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let run_for = args
        .next()
        .map(|s| s.parse::<f64>())
        .transpose()?
        .map(Duration::from_secs_f64);
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(42);

    let mut analyzer = SignalAnalyzer::new(CpalSource::new(ANALYSIS_WINDOW));
    pollster::block_on(analyzer.initialize())?;

    let mut cycle = BloomCycle::new(CycleConfig::default(), seed);
    let mut shape = BloomShape {
        points: Vec::new(),
        seed: SEED_POSITION,
    };

    let started = Instant::now();
    let mut last = started;
    loop {
        let now = Instant::now();
        let dt = (now - last).as_secs_f32();
        last = now;
        let elapsed = now - started;

        let frame = analyzer.frame();
        let out = cycle.tick(frame, dt, elapsed.as_secs_f64(), &shape);

        // The bloom outline doubles as the particle spawn set.
        if out.state == GrowthState::Bloom {
            shape.points = curve_points(BLOOM_RADIUS, out.bloom_k, BLOOM_SEGMENTS, Vec2::ZERO);
        }
        if out.transitioned {
            log::info!(
                "[native] state={} volume={:.1} pitch={:.1} k={:.2} particles={}",
                out.state,
                out.signal.volume,
                out.signal.pitch,
                out.bloom_k,
                cycle.particles().len()
            );
        }
        log::trace!(
            "[native] v={:.1} p={:.1} speed={:.2} sway={:.2} hue={:.0}",
            out.signal.volume,
            out.signal.pitch,
            out.params.growth_speed,
            out.params.sway_amount,
            out.params.color_hue
        );

        if run_for.is_some_and(|limit| elapsed >= limit) {
            break;
        }
        thread::sleep(FRAME.saturating_sub(now.elapsed()));
    }

    analyzer.dispose();
    Ok(())
}
