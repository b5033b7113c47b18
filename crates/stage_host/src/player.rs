//! Connection identity and live state.
//!
//! A [`PlayerId`] is the host's identifier for one connection. Ids are
//! assigned by the host and may be reused after the connection leaves.

use serde::{Deserialize, Serialize};
use stage_math::Vec3;

/// A host connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a player id from the host's raw slot number.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw slot number.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team identities known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// No team affiliation.
    #[default]
    Rogue,
    Red,
    Green,
    Blue,
    Purple,
    Rabbit,
    Hunter,
    /// Spectator; never spawns.
    Observer,
}

impl Team {
    /// Lower-case name as used in configuration documents and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Team::Rogue => "rogue",
            Team::Red => "red",
            Team::Green => "green",
            Team::Blue => "blue",
            Team::Purple => "purple",
            Team::Rabbit => "rabbit",
            Team::Hunter => "hunter",
            Team::Observer => "observer",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Life-cycle status of a connection's tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerStatus {
    #[default]
    Dead,
    Alive,
    Paused,
    Exploding,
    Teleporting,
}

/// Snapshot of a connection's tank as reported in a state update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PlayerState {
    pub status: PlayerStatus,
    /// World-space position.
    pub position: Vec3,
    /// Linear velocity in world units per second.
    pub velocity: Vec3,
    /// Heading in radians.
    pub rotation: f32,
}

impl PlayerState {
    /// A live tank resting at `position`.
    #[must_use]
    pub fn alive_at(position: Vec3) -> Self {
        Self {
            status: PlayerStatus::Alive,
            position,
            ..Self::default()
        }
    }

    /// Returns `true` if the tank is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }

    /// Returns `true` if the tank has any velocity on the horizontal plane.
    #[must_use]
    pub fn is_moving_horizontally(&self) -> bool {
        self.velocity.x != 0.0 || self.velocity.y != 0.0
    }

    /// Replace the velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId::from_raw(7).to_string(), "#7");
        assert_eq!(PlayerId(3).id(), 3);
    }

    #[test]
    fn test_team_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Team::Purple).unwrap(), "\"purple\"");
        assert_eq!(Team::default(), Team::Rogue);
    }

    #[test]
    fn test_vertical_velocity_is_not_horizontal_motion() {
        let falling = PlayerState::alive_at(Vec3::ZERO).with_velocity(Vec3::new(0.0, 0.0, -3.0));
        assert!(falling.is_alive());
        assert!(!falling.is_moving_horizontally());

        let sliding = falling.with_velocity(Vec3::new(0.0, 0.5, 0.0));
        assert!(sliding.is_moving_horizontally());
    }
}
