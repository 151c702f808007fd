use super::collision::tile_collision;
use super::creature::Creature;
use super::tilemap::{pixels_to_tiles, tiles_to_pixels, TileGrid, TILE_SIZE};

/// Turns the creature toward its motion and pulls it down unless it flies.
pub(crate) fn begin_step(creature: &mut Creature, gravity: f32, dt_ms: f32) {
    creature.update_facing();
    if !creature.is_flying() {
        creature.body_mut().velocity.y += gravity * dt_ms;
    }
}

/// Moves along x, stopping flush against the first blocking tile found.
pub(crate) fn move_horizontal(creature: &mut Creature, grid: &TileGrid, dt_ms: f32) {
    let dx = creature.body().velocity.x;
    let new_x = creature.body().position.x + dx * dt_ms;
    let y = creature.body().position.y;
    match tile_collision(grid, creature.body(), new_x, y) {
        None => creature.set_x(new_x),
        Some(tile) => {
            if dx > 0.0 {
                let width = creature.body().width();
                creature.set_x(tiles_to_pixels(tile.x) - width);
            } else if dx < 0.0 {
                creature.set_x(tiles_to_pixels(tile.x + 1));
            }
            creature.collide_horizontal();
        }
    }
}

/// Moves along y from the already resolved x. Returns the y before the move.
pub(crate) fn move_vertical(creature: &mut Creature, grid: &TileGrid, dt_ms: f32) -> f32 {
    let dy = creature.body().velocity.y;
    let old_y = creature.body().position.y;
    let new_y = old_y + dy * dt_ms;
    let x = creature.body().position.x;
    match tile_collision(grid, creature.body(), x, new_y) {
        None => creature.set_y(new_y),
        Some(tile) => {
            if dy > 0.0 {
                let height = creature.body().height();
                creature.set_y(tiles_to_pixels(tile.y) - height);
            } else if dy < 0.0 {
                creature.set_y(tiles_to_pixels(tile.y + 1));
            }
            creature.collide_vertical();
        }
    }
    old_y
}

/// Drops the creature through a one-tile-thick floor.
///
/// The creature's box, extended one pixel below its feet, is scanned like a
/// tile sweep. On the first blocking cell whose cell below is open, the
/// creature moves down by one tile plus its own height, provided the new top
/// stays above the bottom of the map.
pub(crate) fn drop_through_floor(creature: &mut Creature, grid: &TileGrid) -> bool {
    let body = creature.body();
    let (x, y) = (body.position.x, body.position.y);
    let (width, height) = (body.width(), body.height());

    let from_tile_x = pixels_to_tiles(x);
    let from_tile_y = pixels_to_tiles(y);
    let to_tile_x = pixels_to_tiles(x + width - 1.0);
    let to_tile_y = pixels_to_tiles(y + height);
    let target_y = y + TILE_SIZE as f32 + height;

    for tile_x in from_tile_x..=to_tile_x {
        for tile_y in from_tile_y..=to_tile_y {
            let blocked = !grid.contains_column(tile_x) || grid.is_solid(tile_x, tile_y);
            if !blocked || grid.is_solid(tile_x, tile_y + 1) {
                continue;
            }
            if target_y < grid.pixel_height() {
                creature.set_y(target_y);
                return true;
            }
        }
    }
    false
}
