//! Numeric guards shared by the simulation.
//!
//! Control inputs, remote snapshots and host-supplied timings are never
//! rejected; they are sanitised here instead. Grid lookups go through
//! [`clamp_index`] so no sample can index outside the cached height grid.

/// Convert a finite `f64` into `f32`, asserting that it fits the target type.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Callers assert that the value fits within f32 bounds."
)]
#[must_use]
pub fn expect_f32(value: f64) -> f32 {
    debug_assert!(value.is_finite(), "expected finite f64 for f32 conversion");
    debug_assert!(
        value <= f64::from(f32::MAX),
        "f64 value {value} exceeds f32::MAX"
    );
    debug_assert!(
        value >= f64::from(f32::MIN),
        "f64 value {value} is below f32::MIN"
    );
    value as f32
}

/// Returns `value` when finite, otherwise `fallback`.
///
/// # Examples
/// ```
/// use skycarpet::numeric::finite_or;
/// assert_eq!(finite_or(2.5, 0.0), 2.5);
/// assert_eq!(finite_or(f32::NAN, 0.0), 0.0);
/// assert_eq!(finite_or(f32::INFINITY, 1.0), 1.0);
/// ```
#[must_use]
pub const fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Clamps a control axis into `[-1, 1]`, mapping non-finite input to zero.
#[must_use]
pub const fn clamp_axis(value: f32) -> f32 {
    finite_or(value, 0.0).clamp(-1.0, 1.0)
}

/// Sanitises a host-supplied timestep into `[0, max_dt]`.
///
/// # Examples
/// ```
/// use skycarpet::numeric::sanitize_dt;
/// assert_eq!(sanitize_dt(0.016, 0.1), 0.016);
/// assert_eq!(sanitize_dt(5.0, 0.1), 0.1);
/// assert_eq!(sanitize_dt(-1.0, 0.1), 0.0);
/// assert_eq!(sanitize_dt(f32::NAN, 0.1), 0.0);
/// ```
#[must_use]
pub const fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    finite_or(dt, 0.0).clamp(0.0, max_dt.max(0.0))
}

/// Floors a continuous grid coordinate and clamps it to `[0, len - 1]`.
///
/// Returns `0` for an empty extent and for non-finite input.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The value is clamped to the grid extent before casting."
)]
#[must_use]
pub fn clamp_index(value: f32, len: usize) -> usize {
    if len == 0 || !value.is_finite() {
        return 0;
    }
    let upper = (len - 1) as f32;
    value.floor().clamp(0.0, upper) as usize
}
