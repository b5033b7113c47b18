//! Builds a [`Scene`] from a configuration document.
//!
//! The reserved `main` section holds the scene parameters. Every other
//! section is a staged tank (`type = tank`) or a staged shot
//! (`type = shot`); sections of any other type are skipped.

use stage_config::{Document, Section};
use stage_host::Team;
use stage_math::{Placement, Vec3, aim_direction};
use tracing::{debug, info};

use crate::error::SceneError;
use crate::scene::{Mode, Scene, SceneParams, StagedPlayer, StagedShot};

/// Name of the section holding scene parameters.
pub const MAIN_SECTION: &str = "main";

/// Loadout code of the guided munition; only these shots take a target.
pub const GUIDED_FLAG: &str = "GM";

const DELAY_RANGE: (f64, f64) = (0.0, 60.0);
const SHOT_SPEED_RANGE: (f64, f64) = (0.01, 1000.0);

impl Scene {
    /// Build a scene from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns the first [`SceneError`] found in the `main` section. No
    /// partially built scene is returned.
    pub fn from_document(doc: &Document) -> Result<Self, SceneError> {
        let params = match doc.section(MAIN_SECTION) {
            Some(main) => read_params(main)?,
            None => SceneParams::default(),
        };
        let mut scene = Scene::new(params);

        for section in doc.sections().filter(|s| s.name() != MAIN_SECTION) {
            let kind = section.get("type").unwrap_or_default().to_ascii_lowercase();
            match kind.as_str() {
                "tank" => scene.players.push(read_tank(section)),
                "shot" => scene.shots.push(read_shot(section)),
                other => debug!(section = section.name(), kind = other, "skipping section"),
            }
        }

        info!(
            mode = scene.params.mode.name(),
            tanks = scene.players.len(),
            shots = scene.shots.len(),
            "scene loaded"
        );
        Ok(scene)
    }
}

fn read_params(main: &Section) -> Result<SceneParams, SceneError> {
    let mut params = SceneParams::default();

    if let Some(value) = main.get("shotdelay") {
        params.shot_delay = number(value);
        if !within(params.shot_delay, DELAY_RANGE) {
            return Err(SceneError::ShotDelayOutOfRange(params.shot_delay));
        }
    }
    if let Some(value) = main.get("shotspeed") {
        params.shot_speed = number(value);
        if !within(params.shot_speed, SHOT_SPEED_RANGE) {
            return Err(SceneError::ShotSpeedOutOfRange(params.shot_speed));
        }
    }
    if let Some(value) = main.get("spawndelay") {
        params.spawn_delay = number(value);
        if !within(params.spawn_delay, DELAY_RANGE) {
            return Err(SceneError::SpawnDelayOutOfRange(params.spawn_delay));
        }
    }
    if let Some(value) = main.get("mode") {
        params.mode =
            Mode::from_name(value).ok_or_else(|| SceneError::UnknownMode(value.to_string()))?;
    }

    Ok(params)
}

fn read_tank(section: &Section) -> StagedPlayer {
    let mut player = StagedPlayer::new(section.name());
    player.team = team_from_name(section.get("team").unwrap_or_default());
    player.flag = section.get("flag").unwrap_or_default().to_ascii_uppercase();
    player.random = section
        .get("random")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    if !player.random {
        let position = section
            .get("pos")
            .and_then(position)
            .unwrap_or(Vec3::ZERO);
        let heading = section.get("rot").map_or(0.0, number) as f32;
        player.placement = Placement::new(position, heading);
    }

    debug!(label = %player.label, team = %player.team, random = player.random, "staged tank");
    player
}

fn read_shot(section: &Section) -> StagedShot {
    let mut shot = StagedShot::new(section.name());
    shot.team = team_from_name(section.get("team").unwrap_or_default());
    shot.flag = section.get("flag").unwrap_or_default().to_ascii_uppercase();

    if shot.flag == GUIDED_FLAG {
        shot.target_label = section
            .get("target")
            .map(str::to_ascii_lowercase)
            .filter(|label| !label.is_empty());
    }

    if let Some(origin) = section.get("pos").and_then(position) {
        shot.origin = origin;
    }

    let azimuth = section.get("rot").map_or(0.0, number) as f32;
    let elevation = section.get("elev").map_or(0.0, number) as f32;
    shot.direction = aim_direction(azimuth, elevation);

    debug!(label = %shot.label, flag = %shot.flag, "staged shot");
    shot
}

/// Map a configured team name onto a host team. Unknown names have no team.
#[must_use]
pub fn team_from_name(name: &str) -> Team {
    match name.trim().to_ascii_lowercase().as_str() {
        "red" => Team::Red,
        "green" => Team::Green,
        "blue" => Team::Blue,
        "purple" => Team::Purple,
        "hunter" => Team::Hunter,
        "rabbit" => Team::Rabbit,
        _ => Team::Rogue,
    }
}

/// Lenient number parsing: unreadable text is `0.0`.
fn number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

/// Parse `"x y z"`. Anything other than exactly three components is ignored.
fn position(value: &str) -> Option<Vec3> {
    let parts: Vec<f32> = value.split_whitespace().map(|p| number(p) as f32).collect();
    match parts.as_slice() {
        [x, y, z] => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}

/// Inclusive range check that also rejects NaN.
fn within(value: f64, (min, max): (f64, f64)) -> bool {
    (min..=max).contains(&value)
}
