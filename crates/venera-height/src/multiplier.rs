//! The fixed real-world-to-scene elevation scale.

use venera_config::GlobeConfig;

/// Compute the byte-to-elevation scale from the fixed capture geometry.
///
/// The nadir camera hovers `radius * (altitude - 1)` above the surface and
/// its frustum spans `tan(fov) * dist * 2` of it; the body's full elevation
/// range is mapped across that footprint, rescaled to the terrain plane.
/// `tan(fov)` (not the half-angle) is deliberate: the multiplier is a fixed
/// constant. Depends only on startup configuration, so it is computed once
/// and never revisited.
pub fn height_multiplier(globe: &GlobeConfig, plane_scale: f32) -> f32 {
    let dist_to_surface = globe.radius_km * (globe.camera_altitude_radii - 1.0);
    let footprint_km = globe.capture_fov_deg.to_radians().tan() * dist_to_surface * 2.0;
    globe.elevation_range_km * plane_scale / footprint_km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venus_default_value() {
        let globe = GlobeConfig::default();
        let mult = height_multiplier(&globe, 40.0);
        // 13.7 * 40 / (tan(30°) * 6051.8 * 0.02 * 2)
        assert!((mult - 3.9213).abs() < 1e-3, "got {mult}");
    }

    #[test]
    fn test_pure_function_of_config() {
        let globe = GlobeConfig::default();
        let a = height_multiplier(&globe, 40.0);
        let b = height_multiplier(&globe, 40.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_scales_linearly_with_plane() {
        let globe = GlobeConfig::default();
        let a = height_multiplier(&globe, 40.0);
        let b = height_multiplier(&globe, 80.0);
        assert!((b - 2.0 * a).abs() < 1e-5);
    }

    #[test]
    fn test_higher_orbit_flattens_terrain() {
        let near = GlobeConfig {
            camera_altitude_radii: 1.02,
            ..GlobeConfig::default()
        };
        let far = GlobeConfig {
            camera_altitude_radii: 1.10,
            ..GlobeConfig::default()
        };
        // A wider footprint spreads the same elevation range thinner.
        assert!(height_multiplier(&far, 40.0) < height_multiplier(&near, 40.0));
    }
}
