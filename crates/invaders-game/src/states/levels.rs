use invaders_engine::coords::Viewport;

use crate::entity::{Entity, INVADER_SIZE};

pub const MAX_LEVELS: u32 = 3;

const START_Y: f32 = 80.0;

/// `rows × cols` invaders from (`start_x`, `start_y`); even rows are rank 1, odd rows rank 2.
fn grid(rows: u32, cols: u32, start_x: f32, start_y: f32, padding: f32) -> impl Iterator<Item = Entity> {
    let step_x = INVADER_SIZE.x + padding;
    let step_y = INVADER_SIZE.y + padding;
    (0..rows).flat_map(move |r| {
        (0..cols).map(move |c| {
            Entity::invader(
                start_x + c as f32 * step_x,
                start_y + r as f32 * step_y,
                (r % 2) as u8 + 1,
            )
        })
    })
}

/// Invader layout for `level`; empty past [`MAX_LEVELS`].
pub fn formation(level: u32, field: Viewport) -> Vec<Entity> {
    match level {
        1 => grid(3, 6, 50.0, START_Y, 15.0).collect(),
        2 => grid(3, 3, 40.0, START_Y, 15.0)
            .chain(grid(3, 3, field.width - 200.0, START_Y, 15.0))
            .collect(),
        3 => grid(4, 8, 30.0, START_Y, 10.0).collect(),
        _ => Vec::new(),
    }
}
