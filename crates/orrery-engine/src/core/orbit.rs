//! Circular orbit kinematics: pure math, no engine dependencies.
//!
//! Angles and time stay in f64; callers narrow to f32 only when packing
//! transforms for the renderer.

use std::f64::consts::TAU;

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can return TAU itself for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Orbit angle in radians at simulation `time`, wrapped into `[0, 2π)`.
///
/// `angular_speed` is in revolutions per simulation-time unit.
pub fn orbit_angle(angular_speed: f64, initial_phase: f64, time: f64) -> f64 {
    wrap_angle(time * angular_speed * TAU + initial_phase)
}

/// Position on a circular orbit in the XZ plane, centered at the origin.
/// Returns `(x, z)`; the orbital plane is `y = 0`.
pub fn position(radius: f64, angular_speed: f64, initial_phase: f64, time: f64) -> (f64, f64) {
    if radius == 0.0 {
        return (0.0, 0.0);
    }
    let angle = orbit_angle(angular_speed, initial_phase, time);
    (radius * angle.cos(), radius * angle.sin())
}

/// Sample a closed circle of `radius` in the XZ plane.
/// Produces `segments + 1` points; the last repeats the first.
pub fn circular_path(radius: f64, segments: usize) -> Vec<(f64, f64)> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let theta = (i as f64 / segments as f64) * TAU;
            (radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}
