//! Respawn scheduling.
//!
//! With a spawn delay configured, a destroyed staged tank may not respawn
//! until its explosion has finished and the delay has elapsed on top. With no
//! delay the host's own respawn timing applies and nothing here acts.

use stage_host::{Host, PlayerId, Settings, settings::keys};
use tracing::{debug, info};

use crate::scene::Scene;

/// A staged tank died: hold its respawn.
pub fn on_died<H: Host>(scene: &mut Scene, host: &mut H, player: PlayerId, time: f64) {
    if scene.params.spawn_delay <= 0.0 {
        return;
    }
    let Some(slot) = scene.staged_mut(player) else {
        return;
    };

    host.set_spawnable(player, false);
    slot.last_death = Some(time);
    slot.respawn_held = true;
    debug!(player = %player, slot = %slot.label, time, "holding respawn");
}

/// Release every held respawn whose delay has run out.
///
/// Returns the number of tanks released.
pub fn on_tick<H: Host>(scene: &mut Scene, host: &mut H, now: f64) -> usize {
    let spawn_delay = scene.params.spawn_delay;
    if spawn_delay <= 0.0 {
        return 0;
    }
    let explode_time = host.number(keys::EXPLODE_TIME);

    let mut released = 0;
    for slot in scene.players.iter_mut().filter(|p| p.respawn_held) {
        let (Some(player), Some(died)) = (slot.bound, slot.last_death) else {
            continue;
        };
        if now > died + explode_time + spawn_delay {
            host.set_spawnable(player, true);
            slot.respawn_held = false;
            released += 1;
            info!(player = %player, slot = %slot.label, "respawn allowed");
        }
    }
    released
}
