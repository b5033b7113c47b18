//! # stage_host
//!
//! The surface a staged scene consumes from the game server it runs inside.
//!
//! This crate provides:
//!
//! - [`player`]: connection identifiers, teams and live player state.
//! - [`events`]: lifecycle events delivered by the host, one at a time.
//! - [`settings`]: the host's ambient numeric/boolean settings and their keys.
//! - [`host`]: the [`Host`] trait: outgoing commands plus clock access.
//! - [`recording`]: an in-memory host that records every outgoing command.

pub mod events;
pub mod host;
pub mod player;
pub mod recording;
pub mod settings;

pub use events::{EventKind, HostEvent, SpawnRequest, TeamRequest};
pub use host::{Host, ShotOrder};
pub use player::{PlayerId, PlayerState, PlayerStatus, Team};
pub use recording::{HostCommand, RecordingHost};
pub use settings::Settings;
