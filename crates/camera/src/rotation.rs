use crate::easing::ease_in_out_quad;

/// Seconds of slack when testing for completion, so summed frame times that
/// round just short of the duration still finish on that tick.
const COMPLETION_SLACK: f32 = 1e-4;

/// Yaw animation state. Exactly one rotation may be in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationState {
    Idle,
    Animating {
        start: f32,
        target: f32,
        /// Seconds since the rotation started.
        elapsed: f32,
    },
}

/// Fixed-duration eased yaw animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationAnimator {
    state: RotationState,
    duration: f32,
}

impl RotationAnimator {
    /// A non-positive `duration` makes every rotation finish on its first
    /// advance.
    pub fn new(duration: f32) -> Self {
        Self {
            state: RotationState::Idle,
            duration,
        }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, RotationState::Animating { .. })
    }

    /// Target yaw of the rotation in flight.
    pub fn target(&self) -> Option<f32> {
        match self.state {
            RotationState::Animating { target, .. } => Some(target),
            RotationState::Idle => None,
        }
    }

    /// Begin rotating from `current` by `delta` degrees.
    ///
    /// Returns false, leaving the running animation untouched, if a rotation
    /// is already in flight.
    pub fn start(&mut self, current: f32, delta: f32) -> bool {
        if self.is_animating() {
            return false;
        }
        self.state = RotationState::Animating {
            start: current,
            target: current + delta,
            elapsed: 0.0,
        };
        true
    }

    /// Advance by `dt` seconds and return the yaw to apply, or `None` when
    /// idle. The final step returns the exact target and goes idle.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        let RotationState::Animating {
            start,
            target,
            elapsed,
        } = self.state
        else {
            return None;
        };

        let elapsed = elapsed + dt;
        if elapsed >= self.duration - COMPLETION_SLACK {
            self.state = RotationState::Idle;
            return Some(target);
        }

        self.state = RotationState::Animating {
            start,
            target,
            elapsed,
        };
        let t = ease_in_out_quad(elapsed / self.duration);
        Some(start + (target - start) * t)
    }
}
