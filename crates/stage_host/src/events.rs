//! Lifecycle events delivered by the host.
//!
//! The host hands an extension exactly one [`HostEvent`] at a time on its own
//! thread. Request-style events ([`TeamRequest`], [`SpawnRequest`]) carry a
//! mutable answer plus a `handled` marker the extension sets when it has
//! overridden the host's default.

use serde::{Deserialize, Serialize};
use stage_math::Vec3;

use crate::player::{PlayerId, PlayerState, Team};

// ── Request payloads ────────────────────────────────────────────────────────

/// A connection is joining and the host asks which team it should play on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRequest {
    /// The joining connection.
    pub player: PlayerId,
    /// The team the client asked for; overwrite to answer.
    pub team: Team,
    /// Set once the extension has chosen a team.
    pub handled: bool,
}

impl TeamRequest {
    #[must_use]
    pub fn new(player: PlayerId, team: Team) -> Self {
        Self {
            player,
            team,
            handled: false,
        }
    }
}

/// The host is about to spawn a connection and proposes a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// The connection being spawned.
    pub player: PlayerId,
    /// Proposed world-space position; overwrite to answer.
    pub position: Vec3,
    /// Proposed heading in radians; overwrite to answer.
    pub rotation: f32,
    /// Set once the extension has chosen the spawn.
    pub handled: bool,
}

impl SpawnRequest {
    #[must_use]
    pub fn new(player: PlayerId, position: Vec3, rotation: f32) -> Self {
        Self {
            player,
            position,
            rotation,
            handled: false,
        }
    }
}

// ── Events ──────────────────────────────────────────────────────────────────

/// One host lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// A joining connection needs a team.
    TeamRequest(TeamRequest),
    /// A connection needs a spawn position.
    SpawnPosition(SpawnRequest),
    /// A connection's tank has spawned.
    Spawned { player: PlayerId, time: f64 },
    /// A connection's tank was destroyed.
    Died { player: PlayerId, time: f64 },
    /// Periodic state report for one connection.
    Update {
        player: PlayerId,
        state: PlayerState,
        time: f64,
    },
    /// A connection left the server.
    Left { player: PlayerId },
    /// Periodic server tick.
    Tick { time: f64 },
}

impl HostEvent {
    /// The subscription kind this event is delivered under.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::TeamRequest(_) => EventKind::TeamRequest,
            HostEvent::SpawnPosition(_) => EventKind::SpawnPosition,
            HostEvent::Spawned { .. } => EventKind::Spawned,
            HostEvent::Died { .. } => EventKind::Died,
            HostEvent::Update { .. } => EventKind::Update,
            HostEvent::Left { .. } => EventKind::Left,
            HostEvent::Tick { .. } => EventKind::Tick,
        }
    }
}

/// Event kinds an extension can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    TeamRequest,
    SpawnPosition,
    Spawned,
    Died,
    Update,
    Left,
    Tick,
}

impl EventKind {
    /// Every event kind, in delivery-table order.
    pub const ALL: [EventKind; 7] = [
        EventKind::TeamRequest,
        EventKind::SpawnPosition,
        EventKind::Spawned,
        EventKind::Died,
        EventKind::Update,
        EventKind::Left,
        EventKind::Tick,
    ];
}
