//! Ambient host settings.
//!
//! The host keeps a table of named numeric and boolean settings that govern
//! physics and weapons globally. Extensions read and write them through
//! [`Settings`]; the key names below are the host's own.

/// Read/write access to the host's ambient settings table.
pub trait Settings {
    /// Current value of a numeric setting. Unknown keys read as `0.0`.
    fn number(&self, key: &str) -> f64;

    /// Overwrite a numeric setting.
    fn set_number(&mut self, key: &str, value: f64);

    /// Current value of a boolean setting. Unknown keys read as `false`.
    fn flag(&self, key: &str) -> bool;

    /// Overwrite a boolean setting.
    fn set_flag(&mut self, key: &str, value: bool);
}

/// Setting key names.
pub mod keys {
    // ── Weapons ─────────────────────────────────────────────────────────────

    /// Base projectile speed.
    pub const SHOT_SPEED: &str = "_shotSpeed";
    /// Projectile range; lifetime is range divided by speed.
    pub const SHOT_RANGE: &str = "_shotRange";
    /// Seconds between volleys a tank may fire.
    pub const RELOAD_TIME: &str = "_reloadTime";
    /// Laser lifetime multiplier.
    pub const LASER_AD_LIFE: &str = "_laserAdLife";
    /// Thief lifetime multiplier.
    pub const THIEF_AD_LIFE: &str = "_thiefAdLife";

    // ── Tanks ───────────────────────────────────────────────────────────────

    /// Seconds a destroyed tank spends exploding.
    pub const EXPLODE_TIME: &str = "_explodeTime";
    pub const GRAVITY: &str = "_gravity";
    pub const TANK_SPEED: &str = "_tankSpeed";
    pub const TANK_ANG_VEL: &str = "_tankAngVel";
    /// Height flags are dropped from.
    pub const FLAG_ALTITUDE: &str = "_flagAltitude";

    // ── Server policy ───────────────────────────────────────────────────────

    pub const DISABLE_BOTS: &str = "_disableBots";
    pub const DISABLE_HEIGHT_CHECKS: &str = "_disableHeightChecks";
}
