//! The shot director.
//!
//! Every staged shot is fired together, in declaration order, once per
//! volley. Volleys start no sooner than the host reload time plus the
//! configured shot delay after the previous one.
//!
//! Laser and thief projectiles have no lifetime of their own: the host
//! derives it from the ambient shot speed at fire time. While stabilized, the
//! scene runs a tiny base speed, so each of these shots is fired under a
//! speed captured at activation and the base speed is put back right after.

use stage_host::{Host, Settings, ShotOrder, settings::keys};
use tracing::{debug, info};

use crate::scene::Scene;

/// Loadout code of the laser.
pub const LASER_FLAG: &str = "L";

/// Loadout code of the thief.
pub const THIEF_FLAG: &str = "TH";

/// Volley timing plus the decaying-munition speeds.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotDirector {
    /// Host time of the last volley.
    last_volley: Option<f64>,
    laser_speed: f64,
    thief_speed: f64,
}

impl ShotDirector {
    /// Capture the laser and thief speeds from the host's stock settings.
    ///
    /// Must run before the scene overwrites the shot speed or lifetimes.
    #[must_use]
    pub fn capture<S: Settings>(settings: &S) -> Self {
        let shot_speed = settings.number(keys::SHOT_SPEED);
        Self::with_speeds(
            shot_speed * settings.number(keys::LASER_AD_LIFE),
            shot_speed * settings.number(keys::THIEF_AD_LIFE),
        )
    }

    /// A director with explicit laser and thief speeds.
    #[must_use]
    pub fn with_speeds(laser_speed: f64, thief_speed: f64) -> Self {
        Self {
            last_volley: None,
            laser_speed,
            thief_speed,
        }
    }

    /// Speed a laser is fired at while stabilized.
    #[must_use]
    pub fn laser_speed(&self) -> f64 {
        self.laser_speed
    }

    /// Speed a thief is fired at while stabilized.
    #[must_use]
    pub fn thief_speed(&self) -> f64 {
        self.thief_speed
    }

    /// Host time of the last volley, if one was fired.
    #[must_use]
    pub fn last_volley(&self) -> Option<f64> {
        self.last_volley
    }

    /// Speed override for a loadout code, if it decays.
    fn decay_speed(&self, flag: &str) -> Option<f64> {
        match flag {
            LASER_FLAG => Some(self.laser_speed),
            THIEF_FLAG => Some(self.thief_speed),
            _ => None,
        }
    }

    /// Fire a volley if one is due. Returns `true` if it fired.
    pub fn on_tick<H: Host>(&mut self, scene: &Scene, host: &mut H, now: f64) -> bool {
        if let Some(last) = self.last_volley {
            let cadence = host.number(keys::RELOAD_TIME) + scene.params.shot_delay;
            if now <= last + cadence {
                return false;
            }
        }
        self.last_volley = Some(now);

        let stabilized = scene.mode().is_stabilized();
        for shot in &scene.shots {
            let decay = if stabilized {
                self.decay_speed(&shot.flag)
            } else {
                None
            };
            if let Some(speed) = decay {
                host.set_number(keys::SHOT_SPEED, speed);
            }

            host.fire_shot(&ShotOrder {
                flag: shot.flag.clone(),
                origin: shot.origin,
                direction: shot.direction,
                team: shot.team,
                target: shot.target,
            });
            debug!(label = %shot.label, origin = ?shot.origin, "fired staged shot");

            if decay.is_some() {
                host.set_number(keys::SHOT_SPEED, scene.params.shot_speed);
            }
        }

        if !scene.shots.is_empty() {
            info!(time = now, shots = scene.shots.len(), "volley fired");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use stage_host::{HostCommand, PlayerId, RecordingHost};
    use stage_math::Vec3;

    use super::*;
    use crate::scene::{Mode, SceneParams, StagedShot};

    fn scene(mode: Mode, flags: &[&str]) -> Scene {
        let mut scene = Scene::new(SceneParams {
            mode,
            shot_delay: 1.0,
            shot_speed: 0.5,
            ..SceneParams::default()
        });
        scene.shots = flags
            .iter()
            .enumerate()
            .map(|(i, flag)| {
                let mut shot = StagedShot::new(format!("s{i}"));
                shot.flag = (*flag).to_string();
                shot.origin = Vec3::new(i as f32, 0.0, 0.0);
                shot
            })
            .collect();
        scene
    }

    fn host() -> RecordingHost {
        let mut host = RecordingHost::new();
        host.set_number(keys::RELOAD_TIME, 3.5);
        host.set_number(keys::SHOT_SPEED, 0.5);
        host.drain();
        host
    }

    fn fired(commands: &[HostCommand]) -> Vec<(String, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::FireShot { shot, shot_speed } => {
                    Some((shot.flag.clone(), *shot_speed))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_capture_uses_stock_values() {
        let stock = RecordingHost::with_stock_settings();
        let director = ShotDirector::capture(&stock);
        assert!((director.laser_speed() - 10.0).abs() < 1e-9);
        assert!((director.thief_speed() - 165.0).abs() < 1e-9);
        assert!(director.last_volley().is_none());
    }

    #[test]
    fn test_first_tick_fires_whole_volley_in_order() {
        let scene = scene(Mode::StabilizedAirborne, &["", "GM", "SW"]);
        let mut host = host();
        let mut director = ShotDirector::with_speeds(10.0, 165.0);

        assert!(director.on_tick(&scene, &mut host, 0.0));
        let flags: Vec<_> = fired(host.log()).into_iter().map(|(f, _)| f).collect();
        assert_eq!(flags, ["", "GM", "SW"]);
        assert_eq!(director.last_volley(), Some(0.0));
    }

    #[test]
    fn test_cadence_is_reload_plus_delay() {
        let scene = scene(Mode::StabilizedAirborne, &[""]);
        let mut host = host();
        let mut director = ShotDirector::with_speeds(10.0, 165.0);

        assert!(director.on_tick(&scene, &mut host, 100.0));
        assert!(!director.on_tick(&scene, &mut host, 103.0));
        // 100 + 3.5 + 1.0; the comparison is strict.
        assert!(!director.on_tick(&scene, &mut host, 104.5));
        assert!(director.on_tick(&scene, &mut host, 104.6));
        assert_eq!(fired(host.log()).len(), 2);
    }

    #[test]
    fn test_decaying_shots_use_override_then_restore() {
        let scene = scene(Mode::StabilizedGrounded, &["L", "", "TH"]);
        let mut host = host();
        let mut director = ShotDirector::with_speeds(10.0, 165.0);

        director.on_tick(&scene, &mut host, 0.0);
        assert_eq!(
            fired(host.log()),
            [
                ("L".to_string(), 10.0),
                (String::new(), 0.5),
                ("TH".to_string(), 165.0)
            ]
        );
        assert_eq!(host.number(keys::SHOT_SPEED), 0.5);
    }

    #[test]
    fn test_unmodified_mode_leaves_speed_alone() {
        let scene = scene(Mode::Unmodified, &["L", "TH"]);
        let mut host = host();
        let mut director = ShotDirector::with_speeds(10.0, 165.0);

        director.on_tick(&scene, &mut host, 0.0);
        let all_base_speed = host.log().iter().all(|c| {
            matches!(c, HostCommand::FireShot { shot_speed, .. } if *shot_speed == 0.5)
        });
        assert!(all_base_speed);
    }

    #[test]
    fn test_guided_target_is_passed_through() {
        let mut scene = scene(Mode::StabilizedAirborne, &["GM"]);
        scene.shots[0].target = Some(PlayerId(3));
        let mut host = host();
        let mut director = ShotDirector::with_speeds(10.0, 165.0);

        director.on_tick(&scene, &mut host, 0.0);
        match &host.log()[0] {
            HostCommand::FireShot { shot, .. } => assert_eq!(shot.target, Some(PlayerId(3))),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
