//! Extension lifecycle: activation, event dispatch and unload.
//!
//! The extension can only be activated at host start-up with a configuration
//! path. Any refusal asks the host to shut down.

use std::path::Path;

use stage_config::Document;
use stage_host::{EventKind, Host, HostEvent, PlayerId, Settings, settings::keys};
use tracing::{error, info};

use crate::command::{self, COMMAND_NAME};
use crate::error::ActivationError;
use crate::scene::{Mode, Scene};
use crate::shots::ShotDirector;
use crate::{placement, respawn, roster};

/// Host clock reading after which activation counts as a late load.
pub const LATE_LOAD_SECONDS: f64 = 10.0;

/// Host wait time requested for scenes without staged tanks.
pub const SHOTS_ONLY_WAIT_TIME: f32 = 0.05;

/// Near-zero value used to switch off gravity or tank motion. Zero itself
/// would make the host fall back to its defaults.
const NEAR_ZERO: f64 = -0.000_001;

/// Reload time that keeps beam weapons at their normal length.
const STOCK_RELOAD_TIME: f64 = 3.5;

/// Shot range while stabilized.
const STABILIZED_SHOT_RANGE: f64 = 0.05;

/// An active staged scene.
#[derive(Debug)]
pub struct SceneExtension {
    scene: Scene,
    director: ShotDirector,
}

impl SceneExtension {
    /// Activate from the configuration file at `config_path`.
    ///
    /// On any refusal the error is logged and the host is asked to shut down
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError`] if the host is past start-up, no path was
    /// given, or the document cannot be read or validated.
    pub fn activate<H: Host>(
        host: &mut H,
        config_path: Option<&Path>,
    ) -> Result<Self, ActivationError> {
        let result = Self::load(host, config_path).map(|scene| Self::install(host, scene));
        if let Err(err) = &result {
            error!(%err, "refusing to activate staged scene");
            host.request_shutdown();
        }
        result
    }

    fn load<H: Host>(host: &H, config_path: Option<&Path>) -> Result<Scene, ActivationError> {
        let now = host.now();
        if now > LATE_LOAD_SECONDS {
            return Err(ActivationError::Late { now });
        }

        let path = config_path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ActivationError::MissingConfig)?;
        info!(path = %path.display(), "loading staged scene");

        let doc = Document::load(path)?;
        Ok(Scene::from_document(&doc)?)
    }

    /// Install an already validated scene: subscribe to host events, apply
    /// the mode's ambient overrides and register the operator command.
    pub fn install<H: Host>(host: &mut H, scene: Scene) -> Self {
        for kind in EventKind::ALL {
            host.subscribe(kind);
        }

        host.set_flag(keys::DISABLE_BOTS, false);
        host.set_flag(keys::DISABLE_HEIGHT_CHECKS, true);

        // Captured from the stock values, before they are overwritten below.
        let director = ShotDirector::capture(host);

        match scene.mode() {
            Mode::StabilizedAirborne => {
                host.set_number(keys::GRAVITY, NEAR_ZERO);
                // Dropped flags would drift down under the tiny gravity.
                host.set_number(keys::FLAG_ALTITUDE, 0.0);
            }
            Mode::StabilizedGrounded => {
                host.set_number(keys::TANK_SPEED, NEAR_ZERO);
                host.set_number(keys::TANK_ANG_VEL, NEAR_ZERO);
            }
            Mode::Unmodified => {}
        }

        if scene.mode().is_stabilized() {
            host.set_number(keys::SHOT_SPEED, scene.params.shot_speed);
            host.set_number(keys::SHOT_RANGE, STABILIZED_SHOT_RANGE);
            host.set_number(keys::LASER_AD_LIFE, 1.0);
            host.set_number(keys::THIEF_AD_LIFE, 1.0);
            host.set_number(keys::RELOAD_TIME, STOCK_RELOAD_TIME);
        }

        if scene.players.is_empty() {
            host.set_max_wait_time(SHOTS_ONLY_WAIT_TIME);
        }

        host.register_command(COMMAND_NAME);

        info!(
            mode = scene.mode().name(),
            tanks = scene.players.len(),
            shots = scene.shots.len(),
            "staged scene active"
        );
        Self { scene, director }
    }

    /// Unload: remove the operator command, then every subscription.
    pub fn deactivate<H: Host>(self, host: &mut H) {
        host.remove_command(COMMAND_NAME);
        host.unsubscribe_all();
        info!("staged scene unloaded");
    }

    /// The staged scene with its current bindings.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The shot director.
    #[must_use]
    pub fn director(&self) -> &ShotDirector {
        &self.director
    }

    /// Handle one host event.
    pub fn on_event<H: Host>(&mut self, host: &mut H, event: &mut HostEvent) {
        match event {
            HostEvent::TeamRequest(request) => roster::on_team_request(&mut self.scene, request),
            HostEvent::SpawnPosition(request) => placement::on_spawn_position(&self.scene, request),
            HostEvent::Spawned { player, .. } => placement::on_spawned(&self.scene, host, *player),
            HostEvent::Died { player, time } => {
                respawn::on_died(&mut self.scene, host, *player, *time);
            }
            HostEvent::Update { player, state, .. } => {
                placement::on_update(&self.scene, host, *player, state);
            }
            HostEvent::Left { player } => roster::on_left(&mut self.scene, *player),
            HostEvent::Tick { time } => {
                self.director.on_tick(&self.scene, host, *time);
                respawn::on_tick(&mut self.scene, host, *time);
            }
        }
    }

    /// Handle an operator command. Returns `true` if it was ours.
    pub fn on_command<H: Host>(
        &mut self,
        host: &mut H,
        caller: PlayerId,
        name: &str,
        params: &[String],
    ) -> bool {
        if !name.eq_ignore_ascii_case(COMMAND_NAME) {
            return false;
        }
        command::on_command(&self.scene, host, caller, params)
    }
}

#[cfg(test)]
mod tests {
    use stage_host::{HostCommand, PlayerState, RecordingHost, SpawnRequest, Team, TeamRequest};
    use stage_math::Vec3;

    use super::*;

    const EXAMPLE: &str = "\
[main]
mode = static1

[hero]
type = tank
team = red
pos = \"10 20 0\"
rot = 90

[incoming]
type = shot
team = blue
flag = GM
target = Hero
pos = \"0 0 0\"
rot = 0
elev = 0
";

    fn install(source: &str) -> (RecordingHost, SceneExtension) {
        let mut host = RecordingHost::with_stock_settings();
        let scene = Scene::from_document(&Document::parse(source).unwrap()).unwrap();
        let ext = SceneExtension::install(&mut host, scene);
        host.drain();
        (host, ext)
    }

    fn join(host: &mut RecordingHost, ext: &mut SceneExtension, id: u32) -> Team {
        let mut event = HostEvent::TeamRequest(TeamRequest::new(PlayerId(id), Team::Rogue));
        ext.on_event(host, &mut event);
        match event {
            HostEvent::TeamRequest(req) => req.team,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_example_scene_end_to_end() {
        let (mut host, mut ext) = install(EXAMPLE);

        assert_eq!(join(&mut host, &mut ext, 5), Team::Red);
        assert_eq!(ext.scene().shots[0].target, Some(PlayerId(5)));

        let mut spawn = HostEvent::SpawnPosition(SpawnRequest::new(PlayerId(5), Vec3::ZERO, 0.0));
        ext.on_event(&mut host, &mut spawn);
        let HostEvent::SpawnPosition(req) = spawn else {
            unreachable!()
        };
        assert!(req.handled);
        assert_eq!(req.position, Vec3::new(10.0, 20.0, 0.01));
        assert!((req.rotation - 90f32.to_radians()).abs() < 1e-6);

        ext.on_event(&mut host, &mut HostEvent::Tick { time: 1.0 });
        let shot = host
            .log()
            .iter()
            .find_map(|c| match c {
                HostCommand::FireShot { shot, .. } => Some(shot.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(shot.team, Team::Blue);
        assert_eq!(shot.target, Some(PlayerId(5)));
        assert!((shot.direction.length() - 1.0).abs() < 1e-5);

        // A second arrival overflows the single slot.
        assert_eq!(join(&mut host, &mut ext, 6), Team::Observer);
    }

    #[test]
    fn test_install_applies_airborne_overrides() {
        let mut host = RecordingHost::with_stock_settings();
        let scene = Scene::from_document(&Document::parse(EXAMPLE).unwrap()).unwrap();
        let ext = SceneExtension::install(&mut host, scene);

        for kind in EventKind::ALL {
            assert!(host.is_subscribed(kind));
        }
        assert!(host.has_command(COMMAND_NAME));
        assert!(!host.flag(keys::DISABLE_BOTS));
        assert!(host.flag(keys::DISABLE_HEIGHT_CHECKS));
        assert_eq!(host.number(keys::GRAVITY), NEAR_ZERO);
        assert_eq!(host.number(keys::FLAG_ALTITUDE), 0.0);
        assert_eq!(host.number(keys::SHOT_SPEED), 0.01);
        assert_eq!(host.number(keys::SHOT_RANGE), 0.05);
        assert_eq!(host.number(keys::LASER_AD_LIFE), 1.0);
        assert_eq!(host.number(keys::RELOAD_TIME), 3.5);
        assert_eq!(host.number(keys::TANK_SPEED), 25.0);
        assert!(host.max_wait_time().is_none());

        // Speeds come from the stock values, not the overrides.
        assert!((ext.director().laser_speed() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_install_grounded_and_unmodified() {
        let mut host = RecordingHost::with_stock_settings();
        let doc = Document::parse("[main]\nmode=static2\n").unwrap();
        let scene = Scene::from_document(&doc).unwrap();
        SceneExtension::install(&mut host, scene);
        assert_eq!(host.number(keys::TANK_SPEED), NEAR_ZERO);
        assert_eq!(host.number(keys::TANK_ANG_VEL), NEAR_ZERO);
        assert_eq!(host.number(keys::GRAVITY), -9.81);
        assert_eq!(host.max_wait_time(), Some(SHOTS_ONLY_WAIT_TIME));

        let mut host = RecordingHost::with_stock_settings();
        let doc = Document::parse("[main]\nmode=normal\n").unwrap();
        let scene = Scene::from_document(&doc).unwrap();
        SceneExtension::install(&mut host, scene);
        assert_eq!(host.number(keys::SHOT_SPEED), 100.0);
        assert_eq!(host.number(keys::SHOT_RANGE), 350.0);
    }

    #[test]
    fn test_death_does_not_run_movement_checks() {
        let (mut host, mut ext) =
            install("[main]\nmode=static2\nspawndelay=1\n[t]\ntype=tank\npos=5 5 0\n");
        join(&mut host, &mut ext, 1);

        let mut died = HostEvent::Died {
            player: PlayerId(1),
            time: 2.0,
        };
        ext.on_event(&mut host, &mut died);
        assert_eq!(
            host.drain(),
            [HostCommand::SetSpawnable {
                player: PlayerId(1),
                spawnable: false
            }]
        );

        // The next update is what enforces placement.
        let mut update = HostEvent::Update {
            player: PlayerId(1),
            state: PlayerState::alive_at(Vec3::new(9.0, 5.0, 0.0)),
            time: 2.1,
        };
        ext.on_event(&mut host, &mut update);
        assert_eq!(host.drain(), [HostCommand::Kill { player: PlayerId(1) }]);
    }

    #[test]
    fn test_leave_then_rejoin_rebinds_target() {
        let (mut host, mut ext) = install(EXAMPLE);
        join(&mut host, &mut ext, 5);
        ext.on_event(&mut host, &mut HostEvent::Left { player: PlayerId(5) });
        assert!(ext.scene().shots[0].target.is_none());
        assert_eq!(join(&mut host, &mut ext, 8), Team::Red);
        assert_eq!(ext.scene().shots[0].target, Some(PlayerId(8)));
    }

    #[test]
    fn test_command_routing() {
        let (mut host, mut ext) = install(EXAMPLE);
        join(&mut host, &mut ext, 5);
        assert!(!ext.on_command(&mut host, PlayerId(0), "other", &[]));
        assert!(host.log().is_empty());
        assert!(ext.on_command(&mut host, PlayerId(0), "scene", &["reset".to_string()]));
        assert_eq!(host.drain(), [HostCommand::Kill { player: PlayerId(5) }]);
    }

    #[test]
    fn test_deactivate_removes_command_and_subscriptions() {
        let (mut host, ext) = install(EXAMPLE);
        ext.deactivate(&mut host);
        assert!(!host.has_command(COMMAND_NAME));
        assert_eq!(host.subscription_count(), 0);
    }

    #[test]
    fn test_late_activation_shuts_down() {
        let mut host = RecordingHost::with_stock_settings();
        host.set_time(LATE_LOAD_SECONDS + 1.0);
        let err = SceneExtension::activate(&mut host, Some(Path::new("scene.conf"))).unwrap_err();
        assert!(matches!(err, ActivationError::Late { .. }));
        assert!(host.shutdown_requested());
        assert_eq!(host.subscription_count(), 0);
    }

    #[test]
    fn test_missing_path_shuts_down() {
        let mut host = RecordingHost::new();
        let err = SceneExtension::activate(&mut host, None).unwrap_err();
        assert!(matches!(err, ActivationError::MissingConfig));
        assert!(host.shutdown_requested());

        let mut host = RecordingHost::new();
        let err = SceneExtension::activate(&mut host, Some(Path::new(""))).unwrap_err();
        assert!(matches!(err, ActivationError::MissingConfig));
    }

    #[test]
    fn test_activation_from_file() {
        let dir = std::env::temp_dir().join(format!("stage_scene_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.conf");
        std::fs::write(&good, EXAMPLE).unwrap();
        let mut host = RecordingHost::with_stock_settings();
        let ext = SceneExtension::activate(&mut host, Some(good.as_path())).unwrap();
        assert_eq!(ext.scene().players.len(), 1);
        assert!(!host.shutdown_requested());

        let bad = dir.join("bad.conf");
        std::fs::write(&bad, "[main]\nshotspeed=0\n").unwrap();
        let mut host = RecordingHost::with_stock_settings();
        let err = SceneExtension::activate(&mut host, Some(bad.as_path())).unwrap_err();
        assert!(matches!(err, ActivationError::Scene(_)));
        assert!(host.shutdown_requested());
        assert_eq!(host.subscription_count(), 0);
        assert!(!host.has_command(COMMAND_NAME));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
