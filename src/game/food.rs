use rand::Rng;

use super::state::Position;

/// Pick a random cell not in `occupied`.
///
/// Rejection sampling: loops until a free cell turns up, so it only returns
/// while at least one cell of the grid is free.
pub fn place_food<R: Rng + ?Sized>(rng: &mut R, occupied: &[Position], grid_size: i32) -> Position {
    loop {
        let x = rng.gen_range(0..grid_size);
        let y = rng.gen_range(0..grid_size);
        let pos = Position::new(x, y);

        if !occupied.contains(&pos) {
            return pos;
        }
    }
}
