//! The host collaborator.

use serde::{Deserialize, Serialize};
use stage_math::Vec3;

use crate::events::EventKind;
use crate::player::{PlayerId, Team};
use crate::settings::Settings;

/// A projectile the host should spawn on the server's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotOrder {
    /// Loadout code selecting the projectile type (empty = standard shot).
    pub flag: String,
    /// World-space origin.
    pub origin: Vec3,
    /// Unit direction of travel.
    pub direction: Vec3,
    /// Team credited with the shot.
    pub team: Team,
    /// Connection a guided projectile homes on.
    pub target: Option<PlayerId>,
}

/// Everything an extension may ask of the host server.
///
/// Calls are synchronous and take effect (or are queued by the host) before
/// they return. The host never re-enters the extension from inside a call.
pub trait Host: Settings {
    /// Seconds since the host started.
    fn now(&self) -> f64;

    /// Start delivering events of `kind` to the extension.
    fn subscribe(&mut self, kind: EventKind);

    /// Stop delivering every event kind.
    fn unsubscribe_all(&mut self);

    /// Route the operator command `name` to the extension.
    fn register_command(&mut self, name: &str);

    /// Stop routing the operator command `name`.
    fn remove_command(&mut self, name: &str);

    /// Allow or forbid a connection to respawn.
    fn set_spawnable(&mut self, player: PlayerId, spawnable: bool);

    /// Destroy a connection's tank.
    fn kill(&mut self, player: PlayerId);

    /// Grant a loadout flag without replacing one already held.
    fn give_flag(&mut self, player: PlayerId, flag: &str);

    /// Fire a server-owned projectile.
    fn fire_shot(&mut self, shot: &ShotOrder);

    /// Send a text message from the server to one connection.
    fn send_message(&mut self, to: PlayerId, text: &str);

    /// Display name of a connection, if it is known.
    fn callsign(&self, player: PlayerId) -> Option<String>;

    /// Upper bound on how long the host waits for network traffic between
    /// ticks, in seconds.
    fn set_max_wait_time(&mut self, seconds: f32);

    /// Ask the host process to shut down.
    fn request_shutdown(&mut self);
}
