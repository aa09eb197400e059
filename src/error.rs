use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building configuration.
///
/// The simulation itself is infallible; only settings and control setup can
/// fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A control range whose bounds are reversed or not finite.
    #[error("invalid range for {name}: [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    /// A control default lying outside its own range.
    #[error("default {value} for {name} is outside [{min}, {max}]")]
    DefaultOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid setting value.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    /// Malformed settings JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidRange {
            name: "radius",
            min: 50.0,
            max: 10.0,
        };
        let msg = format!("{e}");
        assert!(msg.contains("radius"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("nope");
        let e: Error = parse.unwrap_err().into();
        assert!(matches!(e, Error::Json(_)));
    }
}
