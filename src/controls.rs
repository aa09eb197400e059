//! Parameter source for new entities
//!
//! Each numeric control either returns its set value or, when randomising,
//! draws a fresh one and remembers it so the UI can show what was used.
//! Pitch randomisation picks notes from a musical scale instead of the
//! continuous range.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{PITCH_MAX, PITCH_MIN};
use crate::error::{Error, Result};
use crate::settings::{RangeSettings, Settings};

/// Named numeric parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Pitch,
    Radius,
    VelocityX,
    VelocityY,
}

impl Param {
    pub const ALL: [Param; 4] = [Param::Pitch, Param::Radius, Param::VelocityX, Param::VelocityY];
}

/// Supplies values when entities are created
pub trait ParamSource {
    fn get(&mut self, param: Param) -> f64;
    fn play_on_create(&self) -> bool;
}

/// Pitch scales, as semitone degrees within one octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Pentatonic,
    Chromatic,
    Quartertones,
    /// Tritones everywhere
    Horror,
}

const PENTATONIC: [f64; 5] = [0.0, 2.0, 4.0, 7.0, 9.0];
const CHROMATIC: [f64; 12] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0];
const QUARTERTONES: [f64; 24] = [
    0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0,
    9.5, 10.0, 10.5, 11.0, 11.5,
];
const HORROR: [f64; 6] = [0.0, 0.5, 6.0, 6.5, 11.0, 11.5];

impl Scale {
    pub const ALL: [Scale; 4] = [
        Scale::Pentatonic,
        Scale::Chromatic,
        Scale::Quartertones,
        Scale::Horror,
    ];

    pub fn degrees(&self) -> &'static [f64] {
        match self {
            Scale::Pentatonic => &PENTATONIC,
            Scale::Chromatic => &CHROMATIC,
            Scale::Quartertones => &QUARTERTONES,
            Scale::Horror => &HORROR,
        }
    }

    /// Random note: a scale degree shifted by -1, 0 or +1 octave
    ///
    /// The centre octave is twice as likely as either neighbour.
    pub fn random_note<R: Rng>(&self, rng: &mut R) -> f64 {
        let degrees = self.degrees();
        let degree = degrees[rng.random_range(0..degrees.len())];
        let octave = (rng.random::<f64>() * 2.0).round() - 1.0;
        (degree + 12.0 * octave).clamp(PITCH_MIN, PITCH_MAX)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scale::Pentatonic => "pentatonic",
            Scale::Chromatic => "chromatic",
            Scale::Quartertones => "quartertones",
            Scale::Horror => "horror",
        })
    }
}

impl FromStr for Scale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pentatonic" => Ok(Scale::Pentatonic),
            "chromatic" => Ok(Scale::Chromatic),
            "quartertones" => Ok(Scale::Quartertones),
            "horror" | "horror !" => Ok(Scale::Horror),
            other => Err(Error::InvalidSetting(format!("unknown scale '{other}'"))),
        }
    }
}

/// A bounded numeric control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeControl {
    pub min: f64,
    pub max: f64,
    value: f64,
    pub randomize: bool,
}

impl RangeControl {
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        Self {
            min,
            max,
            value: value.clamp(min, max),
            randomize: false,
        }
    }

    pub fn from_settings(s: &RangeSettings) -> Self {
        Self {
            randomize: s.randomize,
            ..Self::new(s.min, s.max, s.default)
        }
    }

    /// Last value handed out, or the one set by hand
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set by hand, clamped into range
    pub fn set(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Current value, or a fresh uniform draw in `[min, max]` when randomising
    pub fn get<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if self.randomize {
            self.value = if self.min < self.max {
                rng.random_range(self.min..=self.max)
            } else {
                self.min
            };
        }
        self.value
    }
}

/// Pitch control: a range plus the scale used for random notes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchControl {
    pub range: RangeControl,
    pub scale: Scale,
}

impl PitchControl {
    pub fn get<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if self.range.randomize {
            let note = self.scale.random_note(rng);
            self.range.set(note);
        }
        self.range.value()
    }
}

/// The full set of creation controls, with its own seeded RNG
#[derive(Debug, Clone)]
pub struct Controls {
    pub pitch: PitchControl,
    pub radius: RangeControl,
    pub velocity_x: RangeControl,
    pub velocity_y: RangeControl,
    pub play_on_create: bool,
    rng: Pcg32,
}

impl Controls {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            pitch: PitchControl {
                range: RangeControl::from_settings(&settings.pitch),
                scale: settings.pitch_scale,
            },
            radius: RangeControl::from_settings(&settings.radius),
            velocity_x: RangeControl::from_settings(&settings.velocity_x),
            velocity_y: RangeControl::from_settings(&settings.velocity_y),
            play_on_create: settings.play_on_create,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Validate the settings first
    pub fn try_new(settings: &Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(settings, seed))
    }

    pub fn range_mut(&mut self, param: Param) -> &mut RangeControl {
        match param {
            Param::Pitch => &mut self.pitch.range,
            Param::Radius => &mut self.radius,
            Param::VelocityX => &mut self.velocity_x,
            Param::VelocityY => &mut self.velocity_y,
        }
    }

    /// Toggle randomisation on every numeric control
    pub fn set_randomize_all(&mut self, randomize: bool) {
        for param in Param::ALL {
            self.range_mut(param).randomize = randomize;
        }
    }
}

impl ParamSource for Controls {
    fn get(&mut self, param: Param) -> f64 {
        match param {
            Param::Pitch => self.pitch.get(&mut self.rng),
            Param::Radius => self.radius.get(&mut self.rng),
            Param::VelocityX => self.velocity_x.get(&mut self.rng),
            Param::VelocityY => self.velocity_y.get(&mut self.rng),
        }
    }

    fn play_on_create(&self) -> bool {
        self.play_on_create
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_values_pass_through() {
        let mut controls = Controls::new(&Settings::default(), 1);
        controls.set_randomize_all(false);
        assert_eq!(controls.get(Param::Pitch), 0.0);
        assert_eq!(controls.get(Param::Radius), 10.0);
        assert_eq!(controls.get(Param::VelocityX), 0.1);
        assert_eq!(controls.get(Param::VelocityY), 0.1);
        assert!(controls.play_on_create());
    }

    #[test]
    fn test_random_values_stay_in_range() {
        let mut controls = Controls::new(&Settings::default(), 42);
        for _ in 0..500 {
            let r = controls.get(Param::Radius);
            assert!((10.0..=50.0).contains(&r), "radius {r}");
            let vx = controls.get(Param::VelocityX);
            assert!((-0.6..=0.6).contains(&vx), "vx {vx}");
        }
        // Displayed value follows the last draw
        let r = controls.get(Param::Radius);
        assert_eq!(controls.radius.value(), r);
    }

    #[test]
    fn test_random_pitch_is_on_scale() {
        let mut controls = Controls::new(&Settings::default(), 7);
        let mut octaves = [false; 3];
        for _ in 0..500 {
            let p = controls.get(Param::Pitch);
            assert!((PITCH_MIN..=PITCH_MAX).contains(&p));
            let degree = p.rem_euclid(12.0);
            assert!(PENTATONIC.contains(&degree), "pitch {p} off scale");
            octaves[((p + 12.0) / 12.0).floor() as usize] = true;
        }
        assert_eq!(octaves, [true; 3]);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Controls::new(&Settings::default(), 99);
        let mut b = Controls::new(&Settings::default(), 99);
        for param in Param::ALL.iter().cycle().take(40) {
            assert_eq!(a.get(*param), b.get(*param));
        }
    }

    #[test]
    fn test_set_clamps() {
        let mut control = RangeControl::new(-0.6, 0.6, 0.1);
        control.set(5.0);
        assert_eq!(control.value(), 0.6);
        control.set(-5.0);
        assert_eq!(control.value(), -0.6);
    }

    #[test]
    fn test_degenerate_range() {
        let mut control = RangeControl::new(3.0, 3.0, 3.0);
        control.randomize = true;
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(control.get(&mut rng), 3.0);
    }

    #[test]
    fn test_scale_names() {
        for scale in Scale::ALL {
            assert_eq!(scale.to_string().parse::<Scale>().unwrap(), scale);
        }
        assert_eq!("HORROR".parse::<Scale>().unwrap(), Scale::Horror);
        assert_eq!(" Chromatic ".parse::<Scale>().unwrap(), Scale::Chromatic);
        assert!(matches!(
            "dorian".parse::<Scale>(),
            Err(Error::InvalidSetting(_))
        ));
        assert_eq!(Scale::Quartertones.degrees().len(), 24);
    }

    #[test]
    fn test_try_new_validates() {
        let mut settings = Settings::default();
        settings.radius.min = 80.0;
        assert!(Controls::try_new(&settings, 0).is_err());
    }
}
