//! Distance and first Fresnel zone calculations.
//!
//! Contains pure helpers for:
//! - Great-circle distance between two geographic points (haversine)
//! - Wavelength of a carrier frequency
//! - First Fresnel zone radius along a path
//! - The clearance polygon drawn around a selected link
//!
//! Units:
//! - Distance: meters
//! - Frequency: GHz at the API, Hz internally
//! - Angles: decimal degrees at the API, radians internally

use super::surface::{ScreenPoint, ScreenProjector};
use super::types::GeoPoint;

/// Sphere radius used for distances, matching the Web Mercator sphere the
/// map projection is built on.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Reference number of path segments sampled for the clearance polygon.
pub const FRESNEL_SAMPLES: usize = 50;

/// Great-circle distance between two points in meters.
///
/// # Formula
///
/// ```text
/// a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)
/// d = 2 · R · asin(√a)
/// ```
pub fn distance_m(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards asin against a rounding a hair above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Wavelength (meters) of a carrier at `frequency_ghz`.
pub fn wavelength_m(frequency_ghz: f64) -> f64 {
    SPEED_OF_LIGHT_M_S / (frequency_ghz * 1e9)
}

/// First Fresnel zone radius at a point `d1` meters from one end and `d2`
/// meters from the other.
///
/// # Formula
///
/// ```text
/// r = √(λ · d1 · d2 / (d1 + d2))
/// ```
///
/// Returns 0 for a zero-length path.
pub fn fresnel_radius_m(wavelength_m: f64, d1: f64, d2: f64) -> f64 {
    let total = d1 + d2;
    if total <= 0.0 {
        return 0.0;
    }
    (wavelength_m * d1 * d2 / total).max(0.0).sqrt()
}

/// Fresnel radii at `samples + 1` evenly spaced points along a path of
/// `distance_m` meters, from the first tower (`t = 0`) to the second (`t = 1`).
///
/// The profile is zero at both ends and peaks at `√(λD/4)` in the middle.
pub fn fresnel_radius_profile(distance_m: f64, frequency_ghz: f64, samples: usize) -> Vec<f64> {
    let samples = samples.max(1);
    let lambda = wavelength_m(frequency_ghz);
    (0..=samples)
        .map(|i| {
            let t = i as f64 / samples as f64;
            fresnel_radius_m(lambda, t * distance_m, (1.0 - t) * distance_m)
        })
        .collect()
}

/// Build the closed first Fresnel zone outline around `p1 → p2`.
///
/// `samples` is the number of path segments; [`FRESNEL_SAMPLES`] is the
/// reference resolution.
///
/// The ellipse is constructed in the projector's screen space:
/// 1. Both endpoints are projected and the segment's unit direction and unit
///    perpendicular are computed.
/// 2. Each radius of [`fresnel_radius_profile`] is converted from meters to
///    pixels with the ratio `projected length / geographic distance`.
/// 3. The outbound pass offsets the sampled base points by `+r` along the
///    perpendicular, the return pass (reverse order) by `−r`.
/// 4. All `2·samples + 2` points are unprojected back to geographic
///    coordinates.
///
/// The result is only valid for the view the projector describes at call
/// time; callers must rebuild it when the view changes.
///
/// Returns an empty polygon for coincident endpoints, or when both endpoints
/// project onto the same screen point.
pub fn fresnel_clearance_polygon(p1: GeoPoint, p2: GeoPoint, frequency_ghz: f64, samples: usize, projector: &dyn ScreenProjector) -> Vec<GeoPoint> {
    let distance = distance_m(p1, p2);
    if distance <= 0.0 {
        return Vec::new();
    }

    let a = projector.project_to_screen(p1);
    let b = projector.project_to_screen(p2);
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f64::EPSILON {
        return Vec::new();
    }

    let (ux, uy) = (dx / len, dy / len);
    let (px, py) = (-uy, ux);
    let pixels_per_meter = len / distance;

    let radii = fresnel_radius_profile(distance, frequency_ghz, samples);
    let steps = radii.len() - 1;
    let offset_point = |i: usize, sign: f64| {
        let t = i as f64 / steps as f64;
        let r_px = radii[i] * pixels_per_meter * sign;
        let base_x = a.x + dx * t;
        let base_y = a.y + dy * t;
        projector.unproject_from_screen(ScreenPoint::new(base_x + px * r_px, base_y + py * r_px))
    };

    let mut points = Vec::with_capacity(2 * radii.len());
    points.extend((0..=steps).map(|i| offset_point(i, 1.0)));
    points.extend((0..=steps).rev().map(|i| offset_point(i, -1.0)));
    points
}
