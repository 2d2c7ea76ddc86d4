//! Pitch/speed/volume → renderer parameter mapping.
//!
//! The renderer never sees pitch or speed directly. Both are folded into a
//! single detune value (cents) plus a playback rate, and the global volume
//! becomes an output gain. The formulas are fixed contracts; listeners tune
//! their requests against them, so they must not be "improved".

use serde::{Deserialize, Serialize};

/// Cents per octave, used when converting detune into a rate factor.
const CENTS_PER_OCTAVE: f64 = 1200.0;

/// Renderer-native playback parameters derived from a request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioParameters {
    /// Pitch shift in cents.
    pub detune: f64,

    /// Playback rate multiplier.
    pub playback_rate: f64,

    /// Output gain multiplier.
    pub gain: f64,
}

impl AudioParameters {
    /// Map request pitch/speed and the global volume to renderer parameters.
    ///
    /// - `detune = ((pitch - 1) * 1000 - (speed - 1) * 2000) / 5`
    /// - `playback_rate = speed * 2`
    /// - `gain = volume * 4`
    #[must_use]
    pub fn derive(pitch: f64, speed: f64, volume: f64) -> Self {
        Self {
            detune: ((pitch - 1.0) * 1000.0 - (speed - 1.0) * 2000.0) / 5.0,
            playback_rate: speed * 2.0,
            gain: volume * 4.0,
        }
    }

    /// Combined resampling factor: the playback rate with the detune applied
    /// on top (`playback_rate * 2^(detune / 1200)`).
    ///
    /// Renderers that cannot detune independently of rate apply this single
    /// factor instead.
    #[must_use]
    pub fn effective_rate(&self) -> f64 {
        self.playback_rate * (self.detune / CENTS_PER_OCTAVE).exp2()
    }
}
