//! Roster binding: which connection plays which staged tank.
//!
//! Binding is first-fit in declaration order and exclusive. Binding a slot
//! also resolves every guided shot aimed at it; releasing the slot undoes
//! both.

use stage_host::{PlayerId, Team, TeamRequest};
use tracing::{info, warn};

use crate::scene::Scene;

impl Scene {
    /// Bind `player` to the first free slot and return that slot's index.
    ///
    /// A connection that already plays a slot keeps it.
    pub fn bind(&mut self, player: PlayerId) -> Option<usize> {
        if let Some(idx) = self.players.iter().position(|p| p.is_bound_to(player)) {
            return Some(idx);
        }

        let idx = self.players.iter().position(|p| p.is_free())?;
        let slot = &mut self.players[idx];
        slot.bound = Some(player);
        slot.last_death = None;
        slot.respawn_held = false;

        let label = slot.label.as_str();
        for shot in self.shots.iter_mut().filter(|s| s.targets(label)) {
            shot.target = Some(player);
        }
        Some(idx)
    }

    /// Release the slot played by `player`. Returns `false` if it had none.
    pub fn unbind(&mut self, player: PlayerId) -> bool {
        let Some(slot) = self.players.iter_mut().find(|p| p.is_bound_to(player)) else {
            return false;
        };
        slot.bound = None;
        slot.respawn_held = false;

        let label = slot.label.as_str();
        for shot in self.shots.iter_mut().filter(|s| s.targets(label)) {
            shot.target = None;
        }
        true
    }
}

/// Answer a team request: bind a staged tank or demote to observer.
///
/// Connections joining as observers are left alone.
pub fn on_team_request(scene: &mut Scene, request: &mut TeamRequest) {
    if request.team == Team::Observer {
        return;
    }

    info!(player = %request.player, requested = %request.team, "team requested");

    match scene.bind(request.player) {
        Some(idx) => {
            let slot = &scene.players[idx];
            info!(
                player = %request.player,
                slot = %slot.label,
                team = %slot.team,
                "bound staged tank"
            );
            request.team = slot.team;
        }
        None => {
            warn!(player = %request.player, "no free staged tank, assigning observer");
            request.team = Team::Observer;
        }
    }
    request.handled = true;
}

/// A connection left: free its slot.
pub fn on_left(scene: &mut Scene, player: PlayerId) {
    if scene.unbind(player) {
        info!(player = %player, "released staged tank");
    }
}
