//! Loudness and pitch extraction from raw sample windows.
//!
//! The analyzer is generic over a [`CaptureSource`], which owns the actual
//! capture resource (a microphone stream natively, or an in-memory buffer fed
//! by the caller). Queries never fail: an inactive analyzer, an empty window,
//! or a window too short to analyze all read as silence.

use crate::constants::*;
use crate::error::CaptureError;

/// One poll of the voice signal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioFrame {
    /// Loudness in `[0, 100]`
    pub volume: f32,
    /// Fundamental frequency in Hz, 0 when silent or undetected
    pub pitch: f32,
}

impl AudioFrame {
    pub const SILENCE: AudioFrame = AudioFrame {
        volume: 0.0,
        pitch: 0.0,
    };
}

#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    pub gain: f32,
    pub silence_threshold: f32,
    pub min_pitch_hz: f32,
    pub max_pitch_hz: f32,
    pub db_floor: f32,
    pub db_scale: f32,
    pub window_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            gain: VOLUME_GAIN,
            silence_threshold: SILENCE_THRESHOLD,
            min_pitch_hz: MIN_PITCH_HZ,
            max_pitch_hz: MAX_PITCH_HZ,
            db_floor: VOLUME_DB_FLOOR,
            db_scale: VOLUME_DB_SCALE,
            window_size: ANALYSIS_WINDOW,
        }
    }
}

impl AnalyzerConfig {
    /// Autocorrelation lag bounds `(min, max)` for a sample rate.
    pub fn lag_range(&self, sample_rate: u32) -> (usize, usize) {
        let sr = sample_rate as f32;
        let min_lag = (sr / self.max_pitch_hz).floor().max(1.0) as usize;
        let max_lag = (sr / self.min_pitch_hz).floor() as usize;
        (min_lag, max_lag)
    }
}

/// A capture resource the analyzer reads sample windows from.
#[allow(async_fn_in_trait)]
pub trait CaptureSource {
    /// Acquire the resource; resolves to the capture sample rate in Hz.
    async fn open(&mut self) -> Result<u32, CaptureError>;

    /// Replace `out` with the most recent window of mono samples.
    fn read_latest(&mut self, out: &mut Vec<f32>);

    /// Release the resource. Must tolerate repeated calls.
    fn close(&mut self);
}

/// In-memory source; the caller submits a fresh buffer every tick.
#[derive(Clone, Debug)]
pub struct BufferSource {
    sample_rate: u32,
    latest: Vec<f32>,
    open: bool,
    fail_with: Option<CaptureError>,
}

impl BufferSource {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            latest: Vec::new(),
            open: false,
            fail_with: None,
        }
    }

    /// A source whose `open` always fails with `err`.
    pub fn failing(err: CaptureError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::new(0)
        }
    }

    pub fn submit(&mut self, samples: &[f32]) {
        self.latest.clear();
        self.latest.extend_from_slice(samples);
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl CaptureSource for BufferSource {
    async fn open(&mut self) -> Result<u32, CaptureError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.open = true;
        Ok(self.sample_rate)
    }

    fn read_latest(&mut self, out: &mut Vec<f32>) {
        out.clear();
        if self.open {
            out.extend_from_slice(&self.latest);
        }
    }

    fn close(&mut self) {
        self.open = false;
        self.latest.clear();
    }
}

pub struct SignalAnalyzer<S: CaptureSource> {
    source: S,
    config: AnalyzerConfig,
    active: bool,
    sample_rate: u32,
    window: Vec<f32>,
}

impl<S: CaptureSource> SignalAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, AnalyzerConfig::default())
    }

    pub fn with_config(source: S, config: AnalyzerConfig) -> Self {
        let window = Vec::with_capacity(config.window_size);
        Self {
            source,
            config,
            active: false,
            sample_rate: 0,
            window,
        }
    }

    /// Acquire the capture resource. An already active analyzer is fully
    /// disposed first, so calling this twice restarts capture.
    pub async fn initialize(&mut self) -> Result<(), CaptureError> {
        if self.active {
            self.dispose();
        }
        match self.source.open().await {
            Ok(sample_rate) => {
                self.sample_rate = sample_rate;
                self.active = true;
                log::info!("[signal] capture started at {} Hz", sample_rate);
                Ok(())
            }
            Err(e) => {
                log::warn!("[signal] capture unavailable: {}", e);
                self.source.close();
                Err(e)
            }
        }
    }

    pub fn dispose(&mut self) {
        if self.active {
            log::info!("[signal] capture stopped");
        }
        self.source.close();
        self.active = false;
        self.window.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AnalyzerConfig {
        &mut self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    // Pull the latest window; false when there is nothing worth analyzing.
    fn refresh(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.source.read_latest(&mut self.window);
        let (min_lag, _) = self.config.lag_range(self.sample_rate);
        self.window.len() > min_lag
    }

    pub fn volume(&mut self) -> f32 {
        if !self.refresh() {
            return 0.0;
        }
        rms_volume(&self.window, &self.config)
    }

    pub fn pitch(&mut self) -> f32 {
        if !self.refresh() {
            return 0.0;
        }
        detect_pitch(&self.window, self.sample_rate, &self.config)
    }

    /// Read the window once and derive both volume and pitch from it.
    pub fn frame(&mut self) -> AudioFrame {
        if !self.refresh() {
            return AudioFrame::SILENCE;
        }
        AudioFrame {
            volume: rms_volume(&self.window, &self.config),
            pitch: detect_pitch(&self.window, self.sample_rate, &self.config),
        }
    }
}

impl<S: CaptureSource> Drop for SignalAnalyzer<S> {
    fn drop(&mut self) {
        self.source.close();
    }
}

// Capture glitches (NaN, inf) count as silence.
#[inline]
fn normalize_sample(s: f32) -> f32 {
    if s.is_finite() {
        s.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// RMS loudness on a log scale, mapped onto `[0, 100]` and boosted by the
/// configured gain.
pub fn rms_volume(samples: &[f32], config: &AnalyzerConfig) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples
        .iter()
        .map(|s| {
            let s = normalize_sample(*s);
            s * s
        })
        .sum();
    let rms = (sum_sq / samples.len() as f32).sqrt();
    let db = config.db_scale * (rms + VOLUME_EPSILON).log10();
    let normalized = (db - config.db_floor) / -config.db_floor * 100.0;
    (normalized * config.gain).clamp(0.0, 100.0)
}

/// Autocorrelation estimate of the fundamental frequency in Hz.
///
/// Returns 0 for silence, for windows shorter than the minimum lag, and when
/// no lag in range correlates positively.
pub fn detect_pitch(samples: &[f32], sample_rate: u32, config: &AnalyzerConfig) -> f32 {
    let n = samples.len();
    if n == 0 || sample_rate == 0 {
        return 0.0;
    }
    let mean_abs = samples.iter().map(|&s| normalize_sample(s).abs()).sum::<f32>() / n as f32;
    if mean_abs < config.silence_threshold {
        return 0.0;
    }

    let (min_lag, max_lag) = config.lag_range(sample_rate);
    let max_lag = max_lag.min(n - 1);
    if min_lag > max_lag {
        return 0.0;
    }

    let mut best_lag = 0usize;
    let mut best_corr = 0.0f32;
    for lag in min_lag..=max_lag {
        let corr: f32 = samples[..n - lag]
            .iter()
            .zip(&samples[lag..])
            .map(|(&a, &b)| normalize_sample(a) * normalize_sample(b))
            .sum();
        if corr > best_corr {
            best_corr = corr;
            best_lag = lag;
        }
    }

    if best_lag == 0 {
        0.0
    } else {
        sample_rate as f32 / best_lag as f32
    }
}
