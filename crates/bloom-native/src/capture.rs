// ---------------- Native microphone capture (cpal) ----------------

use bloom_core::{CaptureError, CaptureSource};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type SharedRing = Arc<Mutex<VecDeque<f32>>>;

/// Default input device mixed down to mono into a ring of the most recent
/// `capacity` samples.
pub struct CpalSource {
    capacity: usize,
    ring: SharedRing,
    stream: Option<cpal::Stream>,
}

impl CpalSource {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ring: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            stream: None,
        }
    }

    fn start(&mut self) -> Result<u32, CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::DeviceNotFound)?;
        let config = device.default_input_config().map_err(map_config_error)?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        log::info!(
            "[capture] device={} rate={} channels={} format={:?}",
            device.name().unwrap_or_else(|_| "<unnamed>".into()),
            sample_rate,
            channels,
            config.sample_format()
        );

        let err_fn = |e: cpal::StreamError| log::error!("[capture] stream error: {}", e);
        let ring = Arc::clone(&self.ring);
        let capacity = self.capacity;
        let stream_config: cpal::StreamConfig = config.clone().into();
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    push_mono(&ring, capacity, channels, data, |s| s)
                },
                err_fn,
                None,
            ),
            cpal::SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    push_mono(&ring, capacity, channels, data, |s| {
                        s as f32 / i16::MAX as f32
                    })
                },
                err_fn,
                None,
            ),
            cpal::SampleFormat::U16 => device.build_input_stream(
                &stream_config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    push_mono(&ring, capacity, channels, data, |s| {
                        (s as f32 / u16::MAX as f32) * 2.0 - 1.0
                    })
                },
                err_fn,
                None,
            ),
            other => {
                return Err(CaptureError::UnsupportedPlatform(format!(
                    "sample format {other:?}"
                )))
            }
        }
        .map_err(map_build_error)?;

        stream.play().map_err(map_play_error)?;
        self.stream = Some(stream);
        Ok(sample_rate)
    }
}

impl CaptureSource for CpalSource {
    async fn open(&mut self) -> Result<u32, CaptureError> {
        self.close();
        self.start()
    }

    fn read_latest(&mut self, out: &mut Vec<f32>) {
        out.clear();
        if let Ok(ring) = self.ring.lock() {
            out.extend(ring.iter().copied());
        }
    }

    fn close(&mut self) {
        // Dropping the stream stops the callback; the host finishes teardown.
        self.stream = None;
        if let Ok(mut ring) = self.ring.lock() {
            ring.clear();
        }
    }
}

fn push_mono<T: Copy>(
    ring: &SharedRing,
    capacity: usize,
    channels: usize,
    data: &[T],
    to_f32: impl Fn(T) -> f32,
) {
    let Ok(mut ring) = ring.lock() else {
        return;
    };
    let channels = channels.max(1);
    for frame in data.chunks(channels) {
        let sum: f32 = frame.iter().map(|&s| to_f32(s)).sum();
        ring.push_back(sum / frame.len() as f32);
    }
    while ring.len() > capacity {
        ring.pop_front();
    }
}

fn is_permission_message(msg: &str) -> bool {
    let msg = msg.to_ascii_lowercase();
    msg.contains("permission") || msg.contains("denied") || msg.contains("not authorized")
}

fn map_config_error(e: cpal::DefaultStreamConfigError) -> CaptureError {
    match e {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => CaptureError::DeviceNotFound,
        cpal::DefaultStreamConfigError::StreamTypeNotSupported => {
            CaptureError::UnsupportedPlatform("input streams not supported".into())
        }
        cpal::DefaultStreamConfigError::BackendSpecific { err } => {
            if is_permission_message(&err.description) {
                CaptureError::PermissionDenied
            } else {
                CaptureError::UnsupportedPlatform(err.description)
            }
        }
    }
}

fn map_build_error(e: cpal::BuildStreamError) -> CaptureError {
    match e {
        cpal::BuildStreamError::DeviceNotAvailable => CaptureError::DeviceNotFound,
        cpal::BuildStreamError::BackendSpecific { err } => {
            if is_permission_message(&err.description) {
                CaptureError::PermissionDenied
            } else {
                CaptureError::UnsupportedPlatform(err.description)
            }
        }
        other => CaptureError::UnsupportedPlatform(other.to_string()),
    }
}

fn map_play_error(e: cpal::PlayStreamError) -> CaptureError {
    match e {
        cpal::PlayStreamError::DeviceNotAvailable => CaptureError::DeviceNotFound,
        cpal::PlayStreamError::BackendSpecific { err } => {
            if is_permission_message(&err.description) {
                CaptureError::PermissionDenied
            } else {
                CaptureError::UnsupportedPlatform(err.description)
            }
        }
    }
}
