// Render Engine - Effect transforms applied to dry signals
// Provides the distortion and reverb used for the dataset sweeps

pub mod effects;
pub mod params;

// Re-export main types
pub use effects::{Distortion, Effect, EffectError, Reverb};
pub use params::EffectParams;
