use glam::Vec2;

use crate::services::InputSource;

/// What a character wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    /// Unit heading, or zero to stand still
    pub move_dir: Vec2,
    /// Aim direction; `None` keeps the current facing
    pub aim: Option<Vec2>,
    pub attack: bool,
}

impl Intent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walk(direction: Vec2) -> Self {
        Self {
            move_dir: direction.normalize_or_zero(),
            ..Self::default()
        }
    }
}

/// WASD movement, cursor aim, attack button
pub fn player_intent(input: &dyn InputSource, position: Vec2) -> Intent {
    let mut dir = Vec2::ZERO;
    if input.is_pressed('W') {
        dir.y += 1.0;
    }
    if input.is_pressed('S') {
        dir.y -= 1.0;
    }
    if input.is_pressed('A') {
        dir.x -= 1.0;
    }
    if input.is_pressed('D') {
        dir.x += 1.0;
    }
    let aim = input.cursor_world() - position;
    Intent {
        move_dir: dir.normalize_or_zero(),
        aim: (aim.length_squared() > 0.0).then_some(aim.normalize()),
        attack: input.attack_held(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::KeySnapshot;

    #[test]
    fn test_diagonal_is_normalized() {
        let input = KeySnapshot::new().press('w').press('d');
        let intent = player_intent(&input, Vec2::ZERO);
        assert!((intent.move_dir.length() - 1.0).abs() < 1e-6);
        assert!(!intent.attack);
    }

    #[test]
    fn test_aim_points_at_cursor() {
        let input = KeySnapshot::new().aim_at(Vec2::new(10.0, 0.0)).firing();
        let intent = player_intent(&input, Vec2::new(5.0, 0.0));
        assert_eq!(intent.aim, Some(Vec2::X));
        assert!(intent.attack);
    }
}
