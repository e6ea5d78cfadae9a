//! World boundary detection and the regeneration fade.
//!
//! Crossing the boundary starts a fade whose `alpha` climbs from 0 to 2 at
//! `rate` per second. The world is regenerated exactly once, when alpha
//! first reaches 1 (fully faded out), and play resumes when it reaches 2.

use glam::Vec3;
use log::info;

/// Phase of the world transition.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TransitionState {
    /// Play is running.
    #[default]
    Normal,
    /// The fade is in progress.
    Transitioning {
        /// Fade progress in `[0, 2)`.
        alpha: f32,
        /// Whether this transition has already regenerated the world.
        regenerated: bool,
    },
}

/// Drives boundary-triggered world regeneration.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldTransitionController {
    state: TransitionState,
    boundary_buffer: f32,
    rate: f32,
}

impl WorldTransitionController {
    /// Creates an idle controller.
    ///
    /// Crossing within `boundary_buffer` of the world edge triggers a
    /// transition that advances at `rate` alpha per second.
    #[must_use]
    pub const fn new(boundary_buffer: f32, rate: f32) -> Self {
        Self {
            state: TransitionState::Normal,
            boundary_buffer,
            rate,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether a transition is in progress.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning { .. })
    }

    /// Fade progress, zero while [`TransitionState::Normal`].
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        match self.state {
            TransitionState::Normal => 0.0,
            TransitionState::Transitioning { alpha, .. } => alpha,
        }
    }

    /// Screen fade opacity in `[0, 1]`: rises to 1 at regeneration and
    /// falls back to 0.
    #[must_use]
    pub const fn fade(&self) -> f32 {
        let alpha = self.alpha();
        if alpha <= 1.0 {
            alpha
        } else {
            (2.0 - alpha).max(0.0)
        }
    }

    /// Starts a transition if `position` lies beyond the playable square.
    ///
    /// Returns `true` only when this call started the transition.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use skycarpet::transition::WorldTransitionController;
    /// let mut controller = WorldTransitionController::new(50.0, 1.0);
    /// assert!(!controller.check_boundary(Vec3::new(400.0, 0.0, 0.0), 1000.0));
    /// assert!(controller.check_boundary(Vec3::new(460.0, 0.0, 0.0), 1000.0));
    /// assert!(controller.is_transitioning());
    /// ```
    pub fn check_boundary(&mut self, position: Vec3, world_size: f32) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let limit = world_size / 2.0 - self.boundary_buffer;
        if position.x.abs() > limit || position.z.abs() > limit {
            info!(
                "boundary crossed at ({:.1}, {:.1}); starting world transition",
                position.x, position.z
            );
            self.state = TransitionState::Transitioning {
                alpha: 0.0,
                regenerated: false,
            };
            return true;
        }
        false
    }

    /// Advances the fade by `dt` seconds.
    ///
    /// `regenerate` runs at most once per transition, on the call where
    /// alpha first reaches 1, even if the same call also completes the fade.
    pub fn advance<F: FnOnce()>(&mut self, dt: f32, regenerate: F) -> TransitionState {
        let TransitionState::Transitioning {
            alpha,
            mut regenerated,
        } = self.state
        else {
            return self.state;
        };
        let step = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let next = alpha + self.rate * step;

        if next >= 1.0 && !regenerated {
            regenerate();
            regenerated = true;
            info!("world regenerated at fade peak");
        }

        self.state = if next >= 2.0 {
            info!("world transition complete");
            TransitionState::Normal
        } else {
            TransitionState::Transitioning {
                alpha: next,
                regenerated,
            }
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::cell::Cell;

    #[fixture]
    fn controller() -> WorldTransitionController {
        WorldTransitionController::new(50.0, 1.0)
    }

    #[rstest]
    #[case(Vec3::new(451.0, 0.0, 0.0), true)]
    #[case(Vec3::new(0.0, 0.0, -451.0), true)]
    #[case(Vec3::new(449.0, 900.0, 449.0), false)]
    fn boundary_uses_buffered_half_extent(
        mut controller: WorldTransitionController,
        #[case] position: Vec3,
        #[case] crosses: bool,
    ) {
        assert_eq!(controller.check_boundary(position, 1000.0), crosses);
    }

    #[rstest]
    fn regeneration_fires_once_across_the_fade(mut controller: WorldTransitionController) {
        let calls = Cell::new(0);
        controller.check_boundary(Vec3::new(999.0, 0.0, 0.0), 1000.0);
        for _ in 0..30 {
            controller.advance(0.1, || calls.set(calls.get() + 1));
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(controller.state(), TransitionState::Normal);
    }

    #[rstest]
    fn boundary_is_ignored_while_transitioning(mut controller: WorldTransitionController) {
        assert!(controller.check_boundary(Vec3::new(999.0, 0.0, 0.0), 1000.0));
        controller.advance(0.5, || {});
        assert!(!controller.check_boundary(Vec3::new(999.0, 0.0, 0.0), 1000.0));
        assert!((controller.alpha() - 0.5).abs() < 1e-6);
    }

    #[rstest]
    fn single_large_step_still_regenerates(mut controller: WorldTransitionController) {
        let calls = Cell::new(0);
        controller.check_boundary(Vec3::new(999.0, 0.0, 0.0), 1000.0);
        let state = controller.advance(5.0, || calls.set(calls.get() + 1));
        assert_eq!(state, TransitionState::Normal);
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn advance_is_inert_when_normal(mut controller: WorldTransitionController) {
        let state = controller.advance(1.5, || panic!("must not regenerate"));
        assert_eq!(state, TransitionState::Normal);
    }

    #[rstest]
    #[case(0.5, 0.5)]
    #[case(1.5, 0.5)]
    fn fade_peaks_at_regeneration(
        mut controller: WorldTransitionController,
        #[case] elapsed: f32,
        #[case] expected: f32,
    ) {
        controller.check_boundary(Vec3::new(999.0, 0.0, 0.0), 1000.0);
        controller.advance(elapsed, || {});
        assert!((controller.fade() - expected).abs() < 1e-6);
    }
}
