//! Great-circle distance and the user-facing distance label.

use crate::types::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in meters.
///
/// The intermediate term is clamped to `[0, 1]` so near-antipodal and
/// near-identical points cannot produce `NaN` from rounding overshoot.
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let half_d_phi = (b.lat - a.lat).to_radians() / 2.0;
    let half_d_lambda = (b.lon - a.lon).to_radians() / 2.0;

    let h = half_d_phi.sin().powi(2) + phi_a.cos() * phi_b.cos() * half_d_lambda.sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Render a distance as `"<n>m"` below one kilometre, `"<n.n>km"` from 1000 m up.
#[must_use]
pub fn format_distance_label(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0}m", meters.round())
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}
