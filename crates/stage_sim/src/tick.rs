//! Simulated server tick loop.
//!
//! Each tick:
//!
//! 1. Advance the clock and integrate tank motion.
//! 2. Apply scripted nudges so placement enforcement has something to do.
//! 3. Deliver a state update for every live tank, then the periodic tick.
//! 4. Apply the extension's outgoing commands (kills cascade into death
//!    events) and respawn tanks that are allowed back.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{debug, info, warn};

use stage_host::{
    Host, HostCommand, HostEvent, PlayerId, RecordingHost, Settings, SpawnRequest, Team,
    TeamRequest, settings::keys,
};
use stage_math::Vec3;
use stage_scene::SceneExtension;

use crate::world::{SimPlayer, SimWorld, SimStats};

/// Configuration for the simulated server.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Ticks per second.
    pub tick_rate: f64,
    /// Simulated seconds to run for.
    pub duration: f64,
    /// Seconds between scripted nudges (0 = never).
    pub nudge_interval: f64,
    /// Host time at which an operator issues `scene reset`.
    pub reset_at: Option<f64>,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            duration: 30.0,
            nudge_interval: 0.0,
            reset_at: None,
        }
    }
}

/// Speed of a scripted nudge, in world units per second.
const NUDGE_SPEED: f32 = 0.5;

/// The connection id used for operator commands issued from the console.
const CONSOLE: PlayerId = PlayerId(u32::MAX);

/// A headless server hosting one staged scene.
#[derive(Debug)]
pub struct SimServer {
    config: TickConfig,
    host: RecordingHost,
    world: SimWorld,
    extension: Option<SceneExtension>,
    tick_id: u64,
    last_nudge: f64,
    reset_done: bool,
}

impl SimServer {
    /// Start the server and activate the extension from `scene_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension refuses to activate. The host will
    /// have been asked to shut down.
    pub fn start(config: TickConfig, scene_path: Option<&Path>) -> Result<Self> {
        let mut host = RecordingHost::with_stock_settings();
        let extension = SceneExtension::activate(&mut host, scene_path)?;
        let mut server = Self {
            config,
            host,
            world: SimWorld::new(),
            extension: Some(extension),
            tick_id: 0,
            last_nudge: 0.0,
            reset_done: false,
        };
        server.apply_commands();
        Ok(server)
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns the simulated clock.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.host.now()
    }

    #[must_use]
    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    #[must_use]
    pub fn stats(&self) -> SimStats {
        self.world.stats
    }

    #[must_use]
    pub fn extension(&self) -> Option<&SceneExtension> {
        self.extension.as_ref()
    }

    fn deliver(&mut self, event: &mut HostEvent) {
        if !self.host.is_subscribed(event.kind()) {
            return;
        }
        if let Some(ext) = self.extension.as_mut() {
            ext.on_event(&mut self.host, event);
        }
    }

    /// A connection joins asking for `team`. Returns its id.
    pub fn join(&mut self, callsign: &str, team: Team) -> PlayerId {
        let id = self.world.allocate_id();
        self.host.set_callsign(id, callsign);

        let mut event = HostEvent::TeamRequest(TeamRequest::new(id, team));
        self.deliver(&mut event);
        let assigned = match event {
            HostEvent::TeamRequest(request) => request.team,
            _ => team,
        };

        info!(player = %id, callsign, team = %assigned, "connection joined");
        self.world.insert(id, SimPlayer::new(callsign, assigned));
        if assigned != Team::Observer {
            self.spawn(id);
        }
        self.apply_commands();
        id
    }

    /// A connection leaves.
    pub fn part(&mut self, id: PlayerId) {
        if self.world.remove(id).is_none() {
            return;
        }
        self.host.forget_callsign(id);
        self.deliver(&mut HostEvent::Left { player: id });
        info!(player = %id, "connection left");
    }

    fn spawn(&mut self, id: PlayerId) {
        // The stock server would pick a random drop zone; a fixed spot per id
        // keeps runs reproducible.
        let proposed = Vec3::new(id.id() as f32 * 10.0, 0.0, 0.0);
        let mut event = HostEvent::SpawnPosition(SpawnRequest::new(id, proposed, 0.0));
        self.deliver(&mut event);
        let (position, rotation) = match event {
            HostEvent::SpawnPosition(request) => (request.position, request.rotation),
            _ => (proposed, 0.0),
        };

        self.world.spawn(id, position, rotation);
        let time = self.now();
        self.deliver(&mut HostEvent::Spawned { player: id, time });
        debug!(player = %id, ?position, "tank spawned");
    }

    /// Run one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.tick_id += 1;
        let now = self.host.advance(dt);
        self.world.integrate(dt as f32);
        self.nudge(now);

        for id in self.world.alive() {
            let Some(state) = self.world.get(id).map(|p| p.state) else {
                continue;
            };
            self.deliver(&mut HostEvent::Update {
                player: id,
                state,
                time: now,
            });
        }
        self.deliver(&mut HostEvent::Tick { time: now });

        if let Some(at) = self.config.reset_at
            && !self.reset_done
            && now >= at
        {
            self.reset_done = true;
            self.operator_command("scene", &["reset"]);
        }

        self.apply_commands();
        self.respawn_ready(now);
    }

    /// Issue an operator command from the console.
    pub fn operator_command(&mut self, name: &str, params: &[&str]) -> bool {
        let params: Vec<String> = params.iter().map(|p| (*p).to_string()).collect();
        let handled = match self.extension.as_mut() {
            Some(ext) if self.host.has_command(name) => {
                ext.on_command(&mut self.host, CONSOLE, name, &params)
            }
            _ => false,
        };
        if !handled {
            warn!(command = name, "unknown command");
        }
        self.apply_commands();
        handled
    }

    fn nudge(&mut self, now: f64) {
        let interval = self.config.nudge_interval;
        if interval <= 0.0 || now - self.last_nudge < interval {
            return;
        }
        self.last_nudge = now;
        if let Some(id) = self.world.alive().first().copied()
            && let Some(player) = self.world.get_mut(id)
        {
            player.state.velocity = Vec3::new(NUDGE_SPEED, 0.0, 0.0);
            debug!(player = %id, "nudged tank");
        }
    }

    /// Apply outgoing commands until the extension stops producing them.
    fn apply_commands(&mut self) {
        loop {
            let commands = self.host.drain();
            if commands.is_empty() {
                return;
            }
            for command in commands {
                self.apply(command);
            }
        }
    }

    fn apply(&mut self, command: HostCommand) {
        let now = self.now();
        match command {
            HostCommand::Kill { player } => {
                if self.world.kill(player, now) {
                    self.deliver(&mut HostEvent::Died { player, time: now });
                }
            }
            HostCommand::SetSpawnable { player, spawnable } => {
                if let Some(p) = self.world.get_mut(player) {
                    p.spawnable = spawnable;
                }
            }
            HostCommand::GiveFlag { player, flag } => {
                if let Some(p) = self.world.get_mut(player)
                    && p.flag.is_none()
                {
                    p.flag = Some(flag);
                }
            }
            HostCommand::FireShot { shot, shot_speed } => {
                self.world.stats.shots_fired += 1;
                debug!(flag = %shot.flag, origin = ?shot.origin, shot_speed, "shot fired");
            }
            HostCommand::Message { to, text } => {
                self.world.stats.messages += 1;
                info!(to = %to, text = %text, "server message");
            }
            HostCommand::SetNumber { key, value } => debug!(key = %key, value, "setting changed"),
            HostCommand::SetFlag { key, value } => debug!(key = %key, value, "setting changed"),
        }
    }

    fn respawn_ready(&mut self, now: f64) {
        let explode_time = self.host.number(keys::EXPLODE_TIME);
        for id in self.world.ids() {
            let ready = self
                .world
                .get(id)
                .is_some_and(|p| p.ready_to_respawn(now, explode_time));
            if ready {
                self.spawn(id);
            }
        }
        self.apply_commands();
    }

    /// Pace ticks in real time until the configured duration has elapsed or
    /// a shutdown is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick rate is not positive.
    pub async fn run_async(&mut self) -> Result<()> {
        if self.config.tick_rate <= 0.0 || !self.config.tick_rate.is_finite() {
            bail!("tick rate must be positive, got {}", self.config.tick_rate);
        }
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let mut interval = tokio::time::interval(tick_duration);

        info!(
            tick_rate = self.config.tick_rate,
            duration = self.config.duration,
            "starting tick loop"
        );

        while self.now() < self.config.duration && !self.host.shutdown_requested() {
            interval.tick().await;
            self.tick(tick_duration.as_secs_f64());
        }

        info!(ticks = self.tick_id, "tick loop complete");
        Ok(())
    }

    /// Unload the extension.
    pub fn shutdown(&mut self) {
        if let Some(ext) = self.extension.take() {
            ext.deactivate(&mut self.host);
        }
        let stats = self.stats();
        info!(
            shots = stats.shots_fired,
            kills = stats.kills,
            spawns = stats.spawns,
            messages = stats.messages,
            "server stopped"
        );
    }
}
