//! Scene error types.

use thiserror::Error;

use stage_config::DocumentError;

/// A `main` section value was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("shotdelay must be between 0.0 and 60.0 (inclusive), got {0}")]
    ShotDelayOutOfRange(f64),

    #[error("shotspeed must be between 0.01 and 1000.0 (inclusive), got {0}")]
    ShotSpeedOutOfRange(f64),

    #[error("spawndelay must be between 0.0 and 60.0 (inclusive), got {0}")]
    SpawnDelayOutOfRange(f64),

    #[error("mode must be one of static1, static2 or normal, got `{0}`")]
    UnknownMode(String),
}

/// The extension refused to activate.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// Loaded after the host's start-up window.
    #[error("staged scenes can only be loaded at start-up (host clock at {now:.1}s)")]
    Late { now: f64 },

    /// No configuration path was supplied.
    #[error("a scene configuration file is required")]
    MissingConfig,

    #[error("could not read scene configuration: {0}")]
    Document(#[from] DocumentError),

    #[error("invalid scene configuration: {0}")]
    Scene(#[from] SceneError),
}
