//! In-memory host.
//!
//! [`RecordingHost`] implements [`Host`] without a server behind it. It keeps
//! its own clock, settings table, subscription table and command table, and
//! appends every outgoing command to a log that callers can inspect or drain.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::events::EventKind;
use crate::host::{Host, ShotOrder};
use crate::player::PlayerId;
use crate::settings::{Settings, keys};

/// One outgoing request recorded by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostCommand {
    SetSpawnable { player: PlayerId, spawnable: bool },
    Kill { player: PlayerId },
    GiveFlag { player: PlayerId, flag: String },
    /// A fired projectile together with the ambient shot speed at fire time.
    FireShot { shot: ShotOrder, shot_speed: f64 },
    Message { to: PlayerId, text: String },
    SetNumber { key: String, value: f64 },
    SetFlag { key: String, value: bool },
}

/// A host that records instead of acting.
#[derive(Debug, Default)]
pub struct RecordingHost {
    clock: f64,
    numbers: HashMap<String, f64>,
    flags: HashMap<String, bool>,
    subscriptions: BTreeSet<EventKind>,
    commands: BTreeSet<String>,
    callsigns: HashMap<PlayerId, String>,
    max_wait_time: Option<f32>,
    shutdown_requested: bool,
    log: Vec<HostCommand>,
}

impl RecordingHost {
    /// Create a host with an empty settings table and the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose settings table holds the server's stock values.
    #[must_use]
    pub fn with_stock_settings() -> Self {
        let mut host = Self::new();
        for (key, value) in [
            (keys::SHOT_SPEED, 100.0),
            (keys::SHOT_RANGE, 350.0),
            (keys::RELOAD_TIME, 3.5),
            (keys::LASER_AD_LIFE, 0.1),
            (keys::THIEF_AD_LIFE, 1.65),
            (keys::EXPLODE_TIME, 5.0),
            (keys::GRAVITY, -9.81),
            (keys::TANK_SPEED, 25.0),
            (keys::TANK_ANG_VEL, 0.785_398),
            (keys::FLAG_ALTITUDE, 11.0),
        ] {
            host.numbers.insert(key.to_string(), value);
        }
        host.flags.insert(keys::DISABLE_BOTS.to_string(), true);
        host.flags.insert(keys::DISABLE_HEIGHT_CHECKS.to_string(), false);
        host
    }

    /// Set the clock.
    pub fn set_time(&mut self, seconds: f64) {
        self.clock = seconds;
    }

    /// Advance the clock by `dt` seconds and return the new time.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.clock += dt;
        self.clock
    }

    /// Give a connection a display name.
    pub fn set_callsign(&mut self, player: PlayerId, callsign: impl Into<String>) {
        self.callsigns.insert(player, callsign.into());
    }

    /// Forget a connection's display name.
    pub fn forget_callsign(&mut self, player: PlayerId) {
        self.callsigns.remove(&player);
    }

    /// Every command recorded since the last drain.
    #[must_use]
    pub fn log(&self) -> &[HostCommand] {
        &self.log
    }

    /// Take the recorded commands, leaving the log empty.
    pub fn drain(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.log)
    }

    /// Returns `true` if events of `kind` are being delivered.
    #[must_use]
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    /// Number of subscribed event kinds.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if the operator command `name` is registered.
    #[must_use]
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains(name)
    }

    /// The last requested maximum wait time, if any.
    #[must_use]
    pub fn max_wait_time(&self) -> Option<f32> {
        self.max_wait_time
    }

    /// Returns `true` once a shutdown has been requested.
    #[must_use]
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    fn record(&mut self, command: HostCommand) {
        trace!(?command, "host command");
        self.log.push(command);
    }
}

impl Settings for RecordingHost {
    fn number(&self, key: &str) -> f64 {
        self.numbers.get(key).copied().unwrap_or(0.0)
    }

    fn set_number(&mut self, key: &str, value: f64) {
        self.numbers.insert(key.to_string(), value);
        self.record(HostCommand::SetNumber {
            key: key.to_string(),
            value,
        });
    }

    fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
        self.record(HostCommand::SetFlag {
            key: key.to_string(),
            value,
        });
    }
}

impl Host for RecordingHost {
    fn now(&self) -> f64 {
        self.clock
    }

    fn subscribe(&mut self, kind: EventKind) {
        self.subscriptions.insert(kind);
    }

    fn unsubscribe_all(&mut self) {
        self.subscriptions.clear();
    }

    fn register_command(&mut self, name: &str) {
        self.commands.insert(name.to_string());
    }

    fn remove_command(&mut self, name: &str) {
        self.commands.remove(name);
    }

    fn set_spawnable(&mut self, player: PlayerId, spawnable: bool) {
        self.record(HostCommand::SetSpawnable { player, spawnable });
    }

    fn kill(&mut self, player: PlayerId) {
        self.record(HostCommand::Kill { player });
    }

    fn give_flag(&mut self, player: PlayerId, flag: &str) {
        self.record(HostCommand::GiveFlag {
            player,
            flag: flag.to_string(),
        });
    }

    fn fire_shot(&mut self, shot: &ShotOrder) {
        let shot_speed = self.number(keys::SHOT_SPEED);
        self.record(HostCommand::FireShot {
            shot: shot.clone(),
            shot_speed,
        });
    }

    fn send_message(&mut self, to: PlayerId, text: &str) {
        self.record(HostCommand::Message {
            to,
            text: text.to_string(),
        });
    }

    fn callsign(&self, player: PlayerId) -> Option<String> {
        self.callsigns.get(&player).cloned()
    }

    fn set_max_wait_time(&mut self, seconds: f32) {
        self.max_wait_time = Some(seconds);
    }

    fn request_shutdown(&mut self) {
        debug!("shutdown requested");
        self.shutdown_requested = true;
    }
}
