//! Simulation core for a voice-reactive plant: signal analysis, growth
//! states, animation parameters, particle dispersal and rose-curve geometry.
//!
//! No platform APIs live here; the capture resource is reached through
//! [`signal::CaptureSource`] and all drawing is left to the caller.

pub mod constants;
pub mod cycle;
pub mod error;
pub mod growth;
pub mod params;
pub mod particles;
pub mod rose;
pub mod signal;
pub mod state;

pub use cycle::*;
pub use error::*;
pub use growth::*;
pub use params::*;
pub use particles::*;
pub use signal::*;
pub use state::*;
