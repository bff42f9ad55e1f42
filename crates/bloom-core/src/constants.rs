// Shared tuning constants for the simulation core.
//
// Parameter structs (`AnalyzerConfig`, `GrowthThresholds`, `ParticleConfig`,
// `CycleConfig`) take their defaults from here so callers can override a
// single value without restating the rest.

// Signal analysis
pub const VOLUME_GAIN: f32 = 1.2; // post-mapping loudness boost
pub const VOLUME_DB_SCALE: f32 = 25.0; // volume_db = scale * log10(rms + eps)
pub const VOLUME_DB_FLOOR: f32 = -60.0; // maps to volume 0
pub const VOLUME_EPSILON: f32 = 1e-10;
pub const SILENCE_THRESHOLD: f32 = 0.01; // mean |sample| below this is silence
pub const MIN_PITCH_HZ: f32 = 80.0;
pub const MAX_PITCH_HZ: f32 = 1000.0;
pub const ANALYSIS_WINDOW: usize = 2048;

// Growth state thresholds
pub const SPROUT_VOLUME: f32 = 30.0;
pub const STEM_PROGRESS: f32 = 100.0;
pub const BLOOM_PROGRESS: f32 = 300.0;
pub const SCATTER_VOLUME: f32 = 70.0;

// Growth parameter mapping
pub const DEFAULT_BASE_PITCH: f32 = 300.0;
pub const COLOR_PITCH_LOW: f32 = 200.0;
pub const COLOR_PITCH_HIGH: f32 = 400.0;
pub const HUE_RANGE: (f32, f32) = (120.0, 180.0);
pub const SATURATION_RANGE: (f32, f32) = (50.0, 80.0);
pub const LIGHTNESS_RANGE: (f32, f32) = (30.0, 70.0);

// Particles (velocities are in px per 60 Hz reference tick)
pub const REFERENCE_FPS: f32 = 60.0;
pub const SCATTER_BASE_SPEED: f32 = 1.0;
pub const SCATTER_VOLUME_SPEED: f32 = 4.0; // added at volume 100
pub const SCATTER_SPEED_JITTER: f32 = 0.2; // +-20%
pub const SCATTER_PITCH_LOW: f32 = 200.0;
pub const SCATTER_PITCH_HIGH: f32 = 800.0;
pub const SCATTER_PITCH_BIAS: f32 = 0.5;
pub const GRAVITY: f32 = 0.5;
pub const ALPHA_FADE_PER_SEC: f32 = 0.3;
pub const CONVERGE_MEAN_ALPHA: f32 = 0.3; // scatter -> converge below this
pub const CONVERGE_BASE_SPEED: f32 = 4.0;
pub const CONVERGE_MAX_MULTIPLIER: f32 = 4.0;
pub const CONVERGE_REFERENCE_DISTANCE: f32 = 300.0;
pub const ALPHA_RECOVER_PER_SEC: f32 = 0.3;
pub const ALPHA_RECOVER_DISTANCE: f32 = 200.0;
pub const ARRIVAL_THRESHOLD: f32 = 5.0;
pub const PARTICLE_SIZE_RANGE: (f32, f32) = (2.0, 6.0);
pub const PARTICLE_LIFETIME_RANGE: (f32, f32) = (3.0, 5.0); // seconds
pub const PARTICLE_HUE_JITTER: f32 = 15.0;

// Signal smoothing time constants (seconds)
pub const VOLUME_RISE_TAU_SEC: f32 = 0.10;
pub const VOLUME_FALL_TAU_SEC: f32 = 0.45;
pub const PITCH_TAU_SEC: f32 = 0.20;

// Bloom geometry
pub const BLOOM_K_RANGE: (f32, f32) = (3.0, 7.0);
pub const BLOOM_K_PITCH_RANGE: (f32, f32) = (200.0, 800.0);
