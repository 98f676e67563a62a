use super::state::{CollisionType, Position};

/// Classify a candidate head position.
///
/// `body` is the snake before the move, tail included. Moving into the cell
/// the tail is about to vacate therefore counts as a self-collision.
pub fn detect_collision(
    head: Position,
    body: &[Position],
    grid_size: i32,
) -> Option<CollisionType> {
    if head.x < 0 || head.x >= grid_size || head.y < 0 || head.y >= grid_size {
        return Some(CollisionType::Wall);
    }

    if body.contains(&head) {
        return Some(CollisionType::SelfCollision);
    }

    None
}
