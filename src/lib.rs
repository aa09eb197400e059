//! Ballinatone - colliding balls that play sampled notes
//!
//! Core modules:
//! - `sim`: Scene simulation (geometry, entities, collisions, culling)
//! - `renderer`: Draw context abstraction and vertex tessellation
//! - `audio`: Playback requests and audio sinks
//! - `controls`: Randomised parameter source for new entities
//! - `app`: Frame driver and input actions
//! - `settings`: Serializable configuration

pub mod app;
pub mod audio;
pub mod controls;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{Action, App};
pub use error::{Error, Result};
pub use settings::Settings;

/// Simulation constants
///
/// Time is measured in milliseconds and distances in canvas pixels, so
/// velocities are pixels per millisecond.
pub mod consts {
    /// Line width of every circle outline
    pub const OUTLINE_WIDTH: f64 = 5.0;

    /// Culling margin, in radii, beyond the half-viewport
    pub const CULL_MARGIN_RADII: f64 = 2.0;

    /// Highlight value right after a hit
    pub const COLOR_STEP_MAX: f64 = 255.0;
    /// Highlight decay per millisecond, divided by radius
    pub const HIGHLIGHT_DECAY: f64 = 20.0;

    /// Sound ball radius = BASE - min(SCALE * 2^(pitch/24), MAX_SHRINK)
    pub const SOUND_BALL_BASE_RADIUS: f64 = 210.0;
    pub const SOUND_BALL_RADIUS_SCALE: f64 = 100.0;
    pub const SOUND_BALL_MAX_SHRINK: f64 = 200.0;

    /// Playable pitch range in semitones
    pub const PITCH_MIN: f64 = -24.0;
    pub const PITCH_MAX: f64 = 24.0;
}

/// Equal-tempered frequency ratio for a pitch offset in semitones
#[inline]
pub fn semitones_to_rate(pitch: f64) -> f64 {
    2f64.powf(pitch / 12.0)
}

/// Radius of a sound ball for the given pitch
///
/// Higher notes give smaller balls. The shrink term is capped so the radius
/// never drops below `BASE - MAX_SHRINK`, whatever the pitch.
#[inline]
pub fn sound_ball_radius(pitch: f64) -> f64 {
    use consts::*;
    SOUND_BALL_BASE_RADIUS
        - (SOUND_BALL_RADIUS_SCALE * 2f64.powf(pitch / 24.0)).min(SOUND_BALL_MAX_SHRINK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semitones_to_rate() {
        assert!((semitones_to_rate(0.0) - 1.0).abs() < 1e-12);
        assert!((semitones_to_rate(12.0) - 2.0).abs() < 1e-12);
        assert!((semitones_to_rate(-12.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sound_ball_radius() {
        assert!((sound_ball_radius(0.0) - 110.0).abs() < 1e-9);
        // 2^(24/24) * 100 = 200, the cap
        assert!((sound_ball_radius(24.0) - 10.0).abs() < 1e-9);
        assert!((sound_ball_radius(-24.0) - 160.0).abs() < 1e-9);
        // Far outside the tuning range the radius stays positive
        assert!((sound_ball_radius(96.0) - 10.0).abs() < 1e-9);
        assert!(sound_ball_radius(-200.0) < 210.0);
    }
}
