use serde::{Deserialize, Serialize};

/// A high-level action the camera rig consumes.
///
/// Movement actions are polled as "held"; rotation actions as "pressed this
/// frame".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move along the camera's ground-projected forward axis.
    MoveForward,
    /// Move against the camera's ground-projected forward axis.
    MoveBack,
    /// Move against the camera's ground-projected right axis.
    MoveLeft,
    /// Move along the camera's ground-projected right axis.
    MoveRight,
    /// Start a left (positive yaw) rotation step.
    RotateLeft,
    /// Start a right (negative yaw) rotation step.
    RotateRight,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
        Action::RotateLeft,
        Action::RotateRight,
    ];

    /// The rotation this action requests, if any.
    pub fn rotation(self) -> Option<RotateDirection> {
        match self {
            Action::RotateLeft => Some(RotateDirection::Left),
            Action::RotateRight => Some(RotateDirection::Right),
            _ => None,
        }
    }
}

/// Direction of a discrete yaw step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateDirection {
    Left,
    Right,
}

impl RotateDirection {
    /// Sign applied to the yaw step: left is positive.
    pub fn sign(self) -> f32 {
        match self {
            RotateDirection::Left => 1.0,
            RotateDirection::Right => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rotate_actions_carry_a_rotation() {
        assert_eq!(Action::RotateLeft.rotation(), Some(RotateDirection::Left));
        assert_eq!(Action::RotateRight.rotation(), Some(RotateDirection::Right));
        assert_eq!(Action::MoveForward.rotation(), None);
    }

    #[test]
    fn left_is_positive_yaw() {
        assert_eq!(RotateDirection::Left.sign(), 1.0);
        assert_eq!(RotateDirection::Right.sign(), -1.0);
    }
}
