//! Spherical aiming for staged shots.

use glam::Vec3;

/// Convert an authored azimuth/elevation pair (degrees) into a unit direction.
///
/// Elevation is measured from the horizon: `0` aims level, `90` straight up,
/// `-90` straight down. Internally the elevation is shifted by a quarter turn
/// so it becomes the polar angle measured from straight down.
#[must_use]
pub fn aim_direction(azimuth_deg: f32, elevation_deg: f32) -> Vec3 {
    let azimuth = f64::from(azimuth_deg).to_radians();
    let polar = f64::from(elevation_deg).to_radians() + std::f64::consts::FRAC_PI_2;

    Vec3::new(
        (polar.sin() * azimuth.cos()) as f32,
        (polar.sin() * azimuth.sin()) as f32,
        (-polar.cos()) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_level_aim_follows_azimuth() {
        assert_close(aim_direction(0.0, 0.0), Vec3::X);
        assert_close(aim_direction(90.0, 0.0), Vec3::Y);
        assert_close(aim_direction(180.0, 0.0), -Vec3::X);
    }

    #[test]
    fn test_vertical_aim() {
        assert_close(aim_direction(0.0, 90.0), Vec3::Z);
        assert_close(aim_direction(37.0, -90.0), -Vec3::Z);
    }

    #[test]
    fn test_always_unit_length() {
        for (az, el) in [(12.0, 33.0), (-170.0, -45.0), (400.0, 10.0), (0.0, 89.0)] {
            let d = aim_direction(az, el);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }
}
