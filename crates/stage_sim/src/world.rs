//! Simulated connections.
//!
//! The simulated server keeps just enough per-connection state to answer the
//! extension: team, tank state, respawn eligibility and held flag.

#![allow(dead_code)]

use std::collections::BTreeMap;

use stage_host::{PlayerId, PlayerState, PlayerStatus, Team};
use stage_math::Vec3;

/// One simulated connection.
#[derive(Debug, Clone)]
pub struct SimPlayer {
    pub callsign: String,
    pub team: Team,
    pub state: PlayerState,
    /// The server allows this connection to respawn.
    pub spawnable: bool,
    /// Host time of the last death.
    pub died_at: Option<f64>,
    /// Loadout currently held.
    pub flag: Option<String>,
}

impl SimPlayer {
    #[must_use]
    pub fn new(callsign: impl Into<String>, team: Team) -> Self {
        Self {
            callsign: callsign.into(),
            team,
            state: PlayerState::default(),
            spawnable: true,
            died_at: None,
            flag: None,
        }
    }

    /// Returns `true` if this connection can ever spawn.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.team != Team::Observer
    }

    /// Returns `true` if a dead tank may come back at `now`.
    #[must_use]
    pub fn ready_to_respawn(&self, now: f64, explode_time: f64) -> bool {
        self.is_playing()
            && !self.state.is_alive()
            && self.spawnable
            && self.died_at.is_none_or(|t| now >= t + explode_time)
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub shots_fired: u64,
    pub kills: u64,
    pub spawns: u64,
    pub messages: u64,
}

/// All simulated connections.
#[derive(Debug, Default)]
pub struct SimWorld {
    players: BTreeMap<PlayerId, SimPlayer>,
    next_id: u32,
    pub stats: SimStats,
}

impl SimWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new connection.
    pub fn allocate_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: PlayerId, player: SimPlayer) {
        self.players.insert(id, player);
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<SimPlayer> {
        self.players.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&SimPlayer> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut SimPlayer> {
        self.players.get_mut(&id)
    }

    /// Ids of every connection, in id order.
    #[must_use]
    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    /// Ids of connections whose tank is alive.
    #[must_use]
    pub fn alive(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|(_, p)| p.state.is_alive())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Place a tank into the world alive.
    pub fn spawn(&mut self, id: PlayerId, position: Vec3, rotation: f32) {
        if let Some(player) = self.players.get_mut(&id) {
            player.state = PlayerState {
                status: PlayerStatus::Alive,
                position,
                velocity: Vec3::ZERO,
                rotation,
            };
            player.died_at = None;
            self.stats.spawns += 1;
        }
    }

    /// Destroy a tank. Returns `false` if it was not alive.
    pub fn kill(&mut self, id: PlayerId, now: f64) -> bool {
        let Some(player) = self.players.get_mut(&id) else {
            return false;
        };
        if !player.state.is_alive() {
            return false;
        }
        player.state.status = PlayerStatus::Dead;
        player.state.velocity = Vec3::ZERO;
        player.died_at = Some(now);
        player.flag = None;
        self.stats.kills += 1;
        true
    }

    /// Integrate velocities over `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        for player in self.players.values_mut() {
            if player.state.is_alive() {
                player.state.position += player.state.velocity * dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_kill_cycle() {
        let mut world = SimWorld::new();
        let id = world.allocate_id();
        world.insert(id, SimPlayer::new("alpha", Team::Red));

        world.spawn(id, Vec3::new(1.0, 2.0, 0.0), 0.0);
        assert_eq!(world.alive(), [id]);

        assert!(world.kill(id, 4.0));
        assert!(!world.kill(id, 4.5));
        assert!(world.alive().is_empty());
        assert_eq!(world.stats.kills, 1);

        let player = world.get(id).unwrap();
        assert!(!player.ready_to_respawn(8.0, 5.0));
        assert!(player.ready_to_respawn(9.0, 5.0));
    }

    #[test]
    fn test_observers_never_respawn() {
        let player = SimPlayer::new("watcher", Team::Observer);
        assert!(!player.ready_to_respawn(100.0, 0.0));
    }

    #[test]
    fn test_integrate_moves_only_live_tanks() {
        let mut world = SimWorld::new();
        let a = world.allocate_id();
        let b = world.allocate_id();
        world.insert(a, SimPlayer::new("a", Team::Red));
        world.insert(b, SimPlayer::new("b", Team::Blue));
        world.spawn(a, Vec3::ZERO, 0.0);
        world.get_mut(a).unwrap().state.velocity = Vec3::X;
        world.get_mut(b).unwrap().state.velocity = Vec3::X;

        world.integrate(0.5);
        assert_eq!(world.get(a).unwrap().state.position, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(world.get(b).unwrap().state.position, Vec3::ZERO);
    }
}
