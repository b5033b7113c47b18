//! # stage_scene
//!
//! A game-server extension that stages tanks and projectiles into a fixed,
//! reproducible scene for screenshots and recordings.
//!
//! The scene is described once, at start-up, by a sectioned document (see
//! `stage_config`). From then on the extension reacts to host events:
//!
//! 1. Joining connections are bound first-fit to staged tank slots
//!    ([`roster`]); everyone else becomes an observer.
//! 2. Bound tanks spawn at their staged placement and are destroyed if they
//!    drift ([`placement`]).
//! 3. Respawns are held back by a configurable delay ([`respawn`]).
//! 4. Every staged shot is fired together as one volley on a fixed cadence
//!    ([`shots`]).
//! 5. The `scene reset` operator command destroys every staged tank
//!    ([`command`]).
//!
//! [`SceneExtension`] owns the lifecycle: activation, event dispatch and
//! unload.

pub mod command;
pub mod error;
pub mod extension;
pub mod loader;
pub mod placement;
pub mod respawn;
pub mod roster;
pub mod scene;
pub mod shots;

pub use error::{ActivationError, SceneError};
pub use extension::SceneExtension;
pub use scene::{Mode, Scene, SceneParams, StagedPlayer, StagedShot};
pub use shots::ShotDirector;
