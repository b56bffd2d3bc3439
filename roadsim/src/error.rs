use thiserror::Error;

/// ConfigError is returned if some track, camera or render parameter does not fulfill the posed
/// requirements. Such errors are fatal: nothing is constructed from an invalid configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Segment count must be larger than zero!")]
    NonPositiveSegmentCount,

    #[error("Segment length must be larger than zero, but is {0}!")]
    NonPositiveSegmentLength(f64),

    #[error("Track width must be larger than zero, but is {0}!")]
    NonPositiveTrackWidth(f64),

    #[error("Rumble length must be at least one segment!")]
    NonPositiveRumbleLength,

    #[error("Curve probability must be in [0.0, 1.0], but is {0}!")]
    InvalidCurveProbability(f64),

    #[error("Maximum curve delta must be non-negative, but is {0}!")]
    InvalidCurveDelta(f64),

    #[error("Decoration stride must be at least one segment!")]
    NonPositiveDecorationStride,

    #[error("At least one decoration kind is required to place decorations!")]
    NoDecorationKinds,

    #[error("Camera {name} must be larger than zero, but is {value}!")]
    NonPositiveCameraValue { name: &'static str, value: f64 },

    #[error("Field of view must be in ]0, pi[ radians, but is {0}!")]
    InvalidFieldOfView(f64),

    #[error("Viewport must have a positive size, but is {width}x{height}!")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Render parameter {name} is invalid: {value}!")]
    InvalidRenderPars { name: &'static str, value: f64 },

    #[error("Could not parse color {name} from {value:?}!")]
    InvalidColor { name: &'static str, value: String },
}
