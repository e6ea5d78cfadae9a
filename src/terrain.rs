//! Procedural terrain elevation.
//!
//! [`HeightField`] evaluates three octaves of OpenSimplex2 noise over a fixed
//! grid once per world generation and answers height queries by bilinear
//! interpolation of the cached grid. Collaborators only ever see the
//! read-only [`TerrainSampler`] capability.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use log::debug;

use crate::constants::MAX_TERRAIN_SEED;
use crate::numeric::{clamp_index, expect_f32, finite_or};

/// Read-only terrain elevation lookup.
pub trait TerrainSampler {
    /// Elevation of the ground at world coordinates `(x, z)`.
    ///
    /// Implementations must return a finite value for any input.
    fn sample_height(&self, x: f32, z: f32) -> f32;
}

/// Frequency multiplier and weight of each noise octave.
const OCTAVES: [(f32, f32); 3] = [(1.5, 0.5), (3.0, 0.25), (6.0, 0.125)];

/// Deterministic, cached terrain height grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    world_size: f32,
    height_scale: f32,
    seed: f64,
    resolution: usize,
    /// Row-major samples, `heights[row * resolution + col]`, row along Z.
    heights: Vec<f32>,
}

impl HeightField {
    /// Builds a height field at the default grid resolution.
    ///
    /// Any `f64` is a usable seed: the noise offset wraps it into
    /// `[0, MAX_TERRAIN_SEED)` and non-finite seeds act as zero. A
    /// non-finite `height_scale` yields flat terrain.
    ///
    /// # Examples
    /// ```
    /// use skycarpet::terrain::{HeightField, TerrainSampler};
    /// let field = HeightField::generate(0.0, 1000.0, 60.0);
    /// assert_eq!(field.sample_height(0.0, 0.0), field.sample_height(0.0, 0.0));
    /// ```
    #[must_use]
    pub fn generate(seed: f64, world_size: f32, height_scale: f32) -> Self {
        Self::with_resolution(seed, world_size, height_scale, crate::GRID_RESOLUTION)
    }

    /// Builds a height field with `resolution` samples per side.
    ///
    /// Resolutions below two are raised to two so every lookup has corners
    /// to interpolate between.
    #[must_use]
    pub fn with_resolution(seed: f64, world_size: f32, height_scale: f32, resolution: usize) -> Self {
        let mut field = Self {
            world_size: world_size.abs().max(f32::EPSILON),
            height_scale: finite_or(height_scale, 0.0),
            seed,
            resolution: resolution.max(2),
            heights: Vec::new(),
        };
        field.rebuild();
        field
    }

    /// Recomputes the grid in place for a new seed, keeping extent and scale.
    pub fn regenerate(&mut self, seed: f64) {
        self.seed = seed;
        self.rebuild();
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "Grid indices are far below f32's exact integer range."
    )]
    fn rebuild(&mut self) {
        let mut noise = FastNoiseLite::new();
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(1.0));

        let seed = noise_offset(self.seed);
        let last = (self.resolution - 1) as f32;
        self.heights.clear();
        self.heights.reserve(self.resolution * self.resolution);
        for row in 0..self.resolution {
            let nz = row as f32 / last;
            for col in 0..self.resolution {
                let nx = col as f32 / last;
                let sum: f32 = OCTAVES
                    .iter()
                    .zip(1_u8..)
                    .map(|(&(frequency, weight), octave)| {
                        let offset = seed * f32::from(octave);
                        weight * noise.get_noise_2d(nx * frequency + offset, nz * frequency + offset)
                    })
                    .sum();
                self.heights.push(sum * self.height_scale);
            }
        }
        debug!(
            "generated {}x{} height grid for seed {}",
            self.resolution, self.resolution, self.seed
        );
    }

    /// Seed the current grid was generated from.
    #[must_use]
    pub const fn seed(&self) -> f64 {
        self.seed
    }

    /// Side length of the square world.
    #[must_use]
    pub const fn world_size(&self) -> f32 {
        self.world_size
    }

    /// Elevation multiplier.
    #[must_use]
    pub const fn height_scale(&self) -> f32 {
        self.height_scale
    }

    /// Samples per side of the cached grid.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Cached elevation at a grid corner, clamped to the grid extent.
    #[must_use]
    pub fn grid_height(&self, col: usize, row: usize) -> f32 {
        let last = self.resolution - 1;
        let index = row.min(last) * self.resolution + col.min(last);
        self.heights.get(index).copied().unwrap_or(0.0)
    }

    /// Maps a world coordinate onto continuous grid space `[0, resolution - 1]`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Grid indices are far below f32's exact integer range."
    )]
    const fn to_grid(&self, world: f32) -> f32 {
        let coord = if world.is_finite() { world } else { 0.0 };
        let last = (self.resolution - 1) as f32;
        ((coord / self.world_size) + 0.5) * last
    }
}

impl TerrainSampler for HeightField {
    #[expect(
        clippy::cast_precision_loss,
        reason = "Grid indices are far below f32's exact integer range."
    )]
    fn sample_height(&self, x: f32, z: f32) -> f32 {
        let last = (self.resolution - 1) as f32;
        let gx = self.to_grid(x).clamp(0.0, last);
        let gz = self.to_grid(z).clamp(0.0, last);

        let col0 = clamp_index(gx, self.resolution);
        let row0 = clamp_index(gz, self.resolution);
        let col1 = (col0 + 1).min(self.resolution - 1);
        let row1 = (row0 + 1).min(self.resolution - 1);
        let tx = gx - col0 as f32;
        let tz = gz - row0 as f32;

        let h00 = self.grid_height(col0, row0);
        let h10 = self.grid_height(col1, row0);
        let h01 = self.grid_height(col0, row1);
        let h11 = self.grid_height(col1, row1);

        let near = h00 + (h10 - h00) * tx;
        let far = h01 + (h11 - h01) * tx;
        near + (far - near) * tz
    }
}

/// Wraps a seed into the range the noise offsets are computed from.
fn noise_offset(seed: f64) -> f32 {
    if seed.is_finite() {
        expect_f32(seed.rem_euclid(MAX_TERRAIN_SEED))
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn field() -> HeightField {
        HeightField::with_resolution(42.0, 1000.0, 60.0, 32)
    }

    #[rstest]
    fn grid_corners_are_reproduced_exactly(field: HeightField) {
        // Corner (0, 0) sits at (-500, -500); corner (31, 31) at (500, 500).
        assert_relative_eq!(field.sample_height(-500.0, -500.0), field.grid_height(0, 0));
        assert_relative_eq!(field.sample_height(500.0, 500.0), field.grid_height(31, 31));
    }

    #[rstest]
    fn midpoint_is_bilinear_average(field: HeightField) {
        let spacing = 1000.0 / 31.0;
        let x = -500.0 + spacing * 0.5;
        let z = -500.0 + spacing * 0.5;
        let expected = (field.grid_height(0, 0)
            + field.grid_height(1, 0)
            + field.grid_height(0, 1)
            + field.grid_height(1, 1))
            / 4.0;
        assert_relative_eq!(field.sample_height(x, z), expected, epsilon = 1e-3);
    }

    #[rstest]
    #[case(-1.0e6, 0.0)]
    #[case(1.0e6, 1.0e6)]
    #[case(f32::NAN, 3.0)]
    #[case(f32::INFINITY, f32::NEG_INFINITY)]
    fn out_of_range_samples_clamp_to_the_grid(
        field: HeightField,
        #[case] x: f32,
        #[case] z: f32,
    ) {
        assert!(field.sample_height(x, z).is_finite());
    }

    #[rstest]
    fn far_outside_matches_edge(field: HeightField) {
        assert_relative_eq!(
            field.sample_height(9_000.0, 9_000.0),
            field.grid_height(31, 31)
        );
    }

    #[rstest]
    fn elevation_is_bounded_by_octave_weights(field: HeightField) {
        let bound = 0.875 * 60.0 + 1e-3;
        for row in 0..field.resolution() {
            for col in 0..field.resolution() {
                assert!(field.grid_height(col, row).abs() <= bound);
            }
        }
    }

    #[rstest]
    fn regeneration_changes_terrain_and_is_reversible(mut field: HeightField) {
        let original = field.clone();
        field.regenerate(7.5);
        assert_ne!(field, original);
        field.regenerate(42.0);
        assert_eq!(field, original);
    }

    #[rstest]
    #[case(1.0e40)]
    #[case(-1.0e300)]
    #[case(f64::MAX)]
    #[case(f64::NAN)]
    #[case(f64::NEG_INFINITY)]
    fn any_seed_generates_finite_terrain(#[case] seed: f64) {
        let field = HeightField::with_resolution(seed, 1000.0, 60.0, 8);
        assert!(field.sample_height(10.0, -20.0).is_finite());
    }

    #[rstest]
    fn seeds_wrap_around_the_seed_range() {
        let small = HeightField::with_resolution(12.5, 1000.0, 60.0, 8);
        let wrapped = HeightField::with_resolution(12.5 + MAX_TERRAIN_SEED, 1000.0, 60.0, 8);
        assert_relative_eq!(small.sample_height(3.0, 4.0), wrapped.sample_height(3.0, 4.0));
    }

    #[rstest]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    fn non_finite_scale_is_flat(#[case] scale: f32) {
        let field = HeightField::with_resolution(4.0, 1000.0, scale, 8);
        assert_relative_eq!(field.sample_height(-70.0, 15.0), 0.0);
    }

    #[rstest]
    fn tiny_resolution_is_raised() {
        let flat = HeightField::with_resolution(1.0, 10.0, 1.0, 0);
        assert_eq!(flat.resolution(), 2);
        assert!(flat.sample_height(0.0, 0.0).is_finite());
    }
}
