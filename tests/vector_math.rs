//! Yaw direction vectors and safe normalisation.
use approx::assert_relative_eq;
use glam::Vec3;
use skycarpet::{forward_from_yaw, vec_normalize};

#[test]
fn normalize_returns_zero_for_nan() {
    assert_eq!(vec_normalize(Vec3::new(f32::NAN, 1.0, 0.0)), Vec3::ZERO);
}

#[test]
fn normalize_returns_normalized_vector() {
    assert_eq!(vec_normalize(Vec3::new(3.0, 0.0, 0.0)), Vec3::X);
}

#[test]
fn heading_zero_faces_negative_z() {
    let forward = forward_from_yaw(0.0);
    assert_relative_eq!(forward.z, -1.0);
    assert_relative_eq!(forward.length(), 1.0);
}
