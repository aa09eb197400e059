//! Control defaults and audio settings
//!
//! Persisted in LocalStorage on the web; read from a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::consts::{PITCH_MAX, PITCH_MIN};
use crate::controls::Scale;
use crate::error::{Error, Result};

/// Bounds and default of one numeric control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSettings {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Draw a fresh random value on every read
    pub randomize: bool,
}

impl RangeSettings {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self {
            min,
            max,
            default,
            randomize: true,
        }
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(Error::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        if !(self.min..=self.max).contains(&self.default) {
            return Err(Error::DefaultOutOfRange {
                name,
                value: self.default,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Dynamics compressor on the master output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorSettings {
    /// dB
    pub threshold: f32,
    /// dB; soft enough that the compressor is barely audible
    pub knee: f32,
    pub ratio: f32,
    /// Seconds
    pub attack: f32,
    /// Seconds
    pub release: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold: -5.0,
            knee: 10.0,
            ratio: 50.0,
            attack: 0.0,
            release: 0.25,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Pitch of new sound balls, in semitones
    pub pitch: RangeSettings,
    /// Scale used when randomising pitch
    pub pitch_scale: Scale,
    /// Radius of new balls, in pixels
    pub radius: RangeSettings,
    /// Horizontal velocity of new balls, in pixels per millisecond
    pub velocity_x: RangeSettings,
    /// Vertical velocity of new balls, in pixels per millisecond
    pub velocity_y: RangeSettings,
    /// Sound a note ball as soon as it is placed
    pub play_on_create: bool,
    /// Seed for control randomisation; `None` picks one at startup
    pub seed: Option<u64>,

    // === Audio ===
    pub compressor: CompressorSettings,
    /// Note sample, relative to the page
    pub sample_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pitch: RangeSettings::new(PITCH_MIN, PITCH_MAX, 0.0),
            pitch_scale: Scale::Pentatonic,
            radius: RangeSettings::new(10.0, 50.0, 10.0),
            velocity_x: RangeSettings::new(-0.6, 0.6, 0.1),
            velocity_y: RangeSettings::new(-0.6, 0.6, 0.1),
            play_on_create: true,
            seed: None,

            compressor: CompressorSettings::default(),
            sample_url: "snd/note.wav".to_string(),
        }
    }
}

impl Settings {
    /// Check every control range and the audio parameters
    pub fn validate(&self) -> Result<()> {
        self.pitch.validate("pitch")?;
        self.radius.validate("radius")?;
        self.velocity_x.validate("velocity_x")?;
        self.velocity_y.validate("velocity_y")?;

        if self.pitch.min < PITCH_MIN || self.pitch.max > PITCH_MAX {
            return Err(Error::InvalidSetting(format!(
                "pitch range must stay within [{PITCH_MIN}, {PITCH_MAX}]"
            )));
        }
        if self.radius.min < 0.0 {
            return Err(Error::InvalidSetting("radius must be >= 0".into()));
        }
        if self.compressor.ratio < 1.0 {
            return Err(Error::InvalidSetting(
                "compressor ratio must be >= 1".into(),
            ));
        }
        if self.sample_url.trim().is_empty() {
            return Err(Error::InvalidSetting("sample_url is empty".into()));
        }
        Ok(())
    }

    /// Parse and validate settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "ballinatone_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// True if LocalStorage already holds settings (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn is_stored() -> bool {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok())
            .flatten()
            .is_some()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
