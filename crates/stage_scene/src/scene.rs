//! The scene descriptor.
//!
//! A [`Scene`] is built once from the configuration document and never gains
//! or loses entries afterwards. Only the runtime fields of a
//! [`StagedPlayer`] (bound connection, death bookkeeping) and of a
//! [`StagedShot`] (resolved target) change while the host runs.

use serde::Serialize;
use stage_host::{PlayerId, Team};
use stage_math::{Placement, Vec3};

/// How hard the scene fights the host's physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Near-zero gravity; tanks spawn slightly above ground and any tank that
    /// picks up horizontal velocity is destroyed. Configured as `static1`.
    #[default]
    StabilizedAirborne,
    /// Normal gravity, near-zero tank speed; any tank that strays from its
    /// staged position is destroyed. Configured as `static2`.
    StabilizedGrounded,
    /// Host physics untouched. Configured as `normal`.
    Unmodified,
}

impl Mode {
    /// Parse a configured mode name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "static1" => Some(Mode::StabilizedAirborne),
            "static2" => Some(Mode::StabilizedGrounded),
            "normal" => Some(Mode::Unmodified),
            _ => None,
        }
    }

    /// The configured name of this mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mode::StabilizedAirborne => "static1",
            Mode::StabilizedGrounded => "static2",
            Mode::Unmodified => "normal",
        }
    }

    /// Returns `true` unless the host's physics are left alone.
    #[must_use]
    pub const fn is_stabilized(self) -> bool {
        !matches!(self, Mode::Unmodified)
    }
}

/// Scene-wide parameters from the `main` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneParams {
    pub mode: Mode,
    /// Extra seconds between volleys on top of the host reload time.
    pub shot_delay: f64,
    /// Base projectile speed the scene runs with.
    pub shot_speed: f64,
    /// Extra seconds a destroyed staged tank waits before it may respawn.
    pub spawn_delay: f64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            shot_delay: 0.0,
            shot_speed: 0.01,
            spawn_delay: 0.0,
        }
    }
}

/// A tank slot waiting for a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedPlayer {
    /// Lower-cased section name; shots refer to tanks by it.
    pub label: String,
    pub team: Team,
    /// Let the host pick the spawn position.
    pub random: bool,
    pub placement: Placement,
    /// Upper-cased loadout code granted on spawn (empty = none).
    pub flag: String,

    /// Connection currently playing this slot.
    #[serde(skip)]
    pub bound: Option<PlayerId>,
    /// Host time of the last death while bound.
    #[serde(skip)]
    pub last_death: Option<f64>,
    /// Spawning has been disabled and not yet re-enabled.
    #[serde(skip)]
    pub respawn_held: bool,
}

impl StagedPlayer {
    /// A fixed-position slot at the origin with no team and no loadout.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            team: Team::Rogue,
            random: false,
            placement: Placement::ORIGIN,
            flag: String::new(),
            bound: None,
            last_death: None,
            respawn_held: false,
        }
    }

    /// Returns `true` if no connection plays this slot.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.bound.is_none()
    }

    /// Returns `true` if `player` plays this slot.
    #[must_use]
    pub fn is_bound_to(&self, player: PlayerId) -> bool {
        self.bound == Some(player)
    }
}

/// A projectile fired in every volley.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedShot {
    /// Lower-cased section name.
    pub label: String,
    pub team: Team,
    pub origin: Vec3,
    /// Unit direction of travel.
    pub direction: Vec3,
    /// Upper-cased loadout code selecting the projectile type.
    pub flag: String,
    /// Label of the staged tank a guided shot homes on.
    pub target_label: Option<String>,

    /// Connection currently playing the targeted tank.
    #[serde(skip)]
    pub target: Option<PlayerId>,
}

impl StagedShot {
    /// A standard shot at the origin aimed along +X.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            team: Team::Rogue,
            origin: Vec3::ZERO,
            direction: Vec3::X,
            flag: String::new(),
            target_label: None,
            target: None,
        }
    }

    /// Returns `true` if this shot homes on the staged tank `label`.
    #[must_use]
    pub fn targets(&self, label: &str) -> bool {
        self.target_label.as_deref() == Some(label)
    }
}

/// Every staged tank and shot plus the scene parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub params: SceneParams,
    /// Tank slots in declaration order.
    pub players: Vec<StagedPlayer>,
    /// Shots in declaration order.
    pub shots: Vec<StagedShot>,
}

impl Scene {
    /// An empty scene with the given parameters.
    #[must_use]
    pub fn new(params: SceneParams) -> Self {
        Self {
            params,
            players: Vec::new(),
            shots: Vec::new(),
        }
    }

    /// The mode this scene runs in.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.params.mode
    }

    /// The slot played by `player`, if any.
    #[must_use]
    pub fn staged(&self, player: PlayerId) -> Option<&StagedPlayer> {
        self.players.iter().find(|p| p.is_bound_to(player))
    }

    /// Mutable access to the slot played by `player`, if any.
    pub fn staged_mut(&mut self, player: PlayerId) -> Option<&mut StagedPlayer> {
        self.players.iter_mut().find(|p| p.is_bound_to(player))
    }

    /// Connections currently bound to a slot, in declaration order.
    pub fn bound_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter_map(|p| p.bound)
    }
}
