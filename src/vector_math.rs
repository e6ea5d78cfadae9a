//! Basic vector math helper functions.
//! Heading vectors, safe normalisation and smoothing used by flight and spells.
use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Unit vector the carpet faces for a given yaw.
///
/// Yaw zero faces `-Z`; positive yaw turns toward `-X` (counter-clockwise
/// seen from above), matching a right-handed, Y-up scene.
///
/// # Examples
/// ```
/// use skycarpet::vector_math::forward_from_yaw;
/// let f = forward_from_yaw(0.0);
/// assert!((f.z + 1.0).abs() < 1e-6);
/// assert!(f.y.abs() < 1e-6);
/// ```
#[must_use]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Unit vector pointing to the carpet's right for a given yaw.
#[must_use]
pub fn right_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Returns the unit vector in the direction of `vector`.
///
/// Non-finite or zero vectors normalise to [`Vec3::ZERO`].
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use skycarpet::vec_normalize;
/// let n = vec_normalize(Vec3::new(3.0, 0.0, 4.0));
/// assert!((n.x - 0.6).abs() < 1e-6);
/// assert!((n.z - 0.8).abs() < 1e-6);
/// assert_eq!(vec_normalize(Vec3::ZERO), Vec3::ZERO);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec3) -> Vec3 {
    if !vector.is_finite() {
        return Vec3::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Replaces non-finite components with zero.
#[must_use]
pub fn sanitize_vec(vector: Vec3) -> Vec3 {
    if vector.is_finite() {
        vector
    } else {
        Vec3::new(
            finite_component(vector.x),
            finite_component(vector.y),
            finite_component(vector.z),
        )
    }
}

const fn finite_component(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// `rate` is the fraction of the gap closed per unit time in the continuous
/// limit; `dt` of zero leaves `current` unchanged.
#[must_use]
pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let blend = 1.0 - (-rate.max(0.0) * dt.max(0.0)).exp();
    current + (target - current) * blend
}

/// Wraps an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Interpolates between two headings along the shortest arc.
///
/// # Examples
/// ```
/// use skycarpet::vector_math::lerp_angle;
/// use std::f32::consts::PI;
/// // Crossing the +/-PI seam takes the short way round.
/// let mid = lerp_angle(PI - 0.1, -PI + 0.1, 0.5);
/// assert!((mid.abs() - PI).abs() < 1e-4);
/// ```
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + wrap_angle(to - from) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(0.7)]
    #[case(-2.4)]
    fn right_is_perpendicular_to_forward(#[case] yaw: f32) {
        let f = forward_from_yaw(yaw);
        let r = right_from_yaw(yaw);
        assert_relative_eq!(f.dot(r), 0.0, epsilon = 1e-6);
        assert_relative_eq!(f.length(), 1.0, epsilon = 1e-6);
        // Right-handed, Y-up: right x forward points up.
        assert!(r.cross(f).y > 0.0);
    }

    #[rstest]
    fn smoothing_approaches_target_without_overshoot() {
        let mut value = 0.0;
        for _ in 0..200 {
            value = smooth_toward(value, 1.0, 5.0, 0.016);
            assert!(value <= 1.0);
        }
        assert_relative_eq!(value, 1.0, epsilon = 1e-3);
    }

    #[rstest]
    fn nan_components_are_zeroed() {
        let v = sanitize_vec(Vec3::new(f32::NAN, 2.0, f32::INFINITY));
        assert_eq!(v, Vec3::new(0.0, 2.0, 0.0));
    }

    #[rstest]
    #[case(TAU + 0.5, 0.5)]
    #[case(-TAU - 0.5, -0.5)]
    #[case(PI + 0.25, -PI + 0.25)]
    #[case(0.5, 0.5)]
    fn angles_wrap(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(wrap_angle(input), expected, epsilon = 1e-4);
    }
}
