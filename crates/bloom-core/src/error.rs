//! Error types for acquiring the capture resource.
use thiserror::Error;

/// Why `SignalAnalyzer::initialize` could not start capturing.
///
/// These are the only failures the core surfaces. Everything else degrades to
/// silence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or the OS refused microphone access
    #[error("microphone permission denied")]
    PermissionDenied,

    /// No usable input device is present
    #[error("no audio input device found")]
    DeviceNotFound,

    /// The host cannot capture audio in any supported format
    #[error("audio capture unsupported on this platform: {0}")]
    UnsupportedPlatform(String),
}
