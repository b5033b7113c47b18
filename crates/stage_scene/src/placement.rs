//! Placement enforcement.
//!
//! Staged tanks spawn exactly where the scene puts them. The host's physics
//! cannot be frozen completely, so tanks that move anyway are destroyed and
//! respawn at their placement.

use stage_host::{Host, PlayerId, PlayerState, SpawnRequest};
use tracing::{debug, info};

use crate::scene::{Mode, Scene};

/// Height added to spawns in [`Mode::StabilizedAirborne`] so tanks start
/// detached from the ground.
pub const AIRBORNE_LIFT: f32 = 0.01;

/// Horizontal distance a grounded tank may stray from its placement.
pub const DRIFT_TOLERANCE: f32 = 0.1;

/// Answer a spawn-position request for a staged tank.
pub fn on_spawn_position(scene: &Scene, request: &mut SpawnRequest) {
    let Some(slot) = scene.staged(request.player) else {
        return;
    };

    info!(player = %request.player, slot = %slot.label, "spawning staged tank");

    if !slot.random {
        request.position = slot.placement.position;
        request.rotation = slot.placement.heading_radians();
    }
    if scene.mode() == Mode::StabilizedAirborne {
        request.position.z += AIRBORNE_LIFT;
    }
    request.handled = true;
}

/// A staged tank spawned: hand it its loadout.
pub fn on_spawned<H: Host>(scene: &Scene, host: &mut H, player: PlayerId) {
    let Some(slot) = scene.staged(player) else {
        return;
    };
    if slot.flag.is_empty() {
        return;
    }

    info!(player = %player, flag = %slot.flag, "granting staged loadout");
    host.give_flag(player, &slot.flag);
}

/// Check one state update against the scene's mode.
///
/// Returns `true` if the tank was destroyed.
pub fn on_update<H: Host>(
    scene: &Scene,
    host: &mut H,
    player: PlayerId,
    state: &PlayerState,
) -> bool {
    let Some(slot) = scene.staged(player) else {
        return false;
    };

    let moved = match scene.mode() {
        Mode::Unmodified => false,
        Mode::StabilizedAirborne => state.is_alive() && state.is_moving_horizontally(),
        Mode::StabilizedGrounded => slot.placement.has_drifted(state.position, DRIFT_TOLERANCE),
    };
    if !moved {
        return false;
    }

    let callsign = host.callsign(player).unwrap_or_default();
    info!(
        player = %player,
        callsign = %callsign,
        slot = %slot.label,
        "destroying staged tank because it moved"
    );
    debug!(position = ?state.position, velocity = ?state.velocity, "moved tank state");
    host.kill(player);
    true
}
