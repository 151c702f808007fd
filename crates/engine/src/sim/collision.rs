use super::body::Body;
use super::tilemap::{pixels_to_tiles, TileCoord, TileGrid};

/// Finds a tile blocking the sweep of `body` from its current position to
/// `(new_x, new_y)`. Only one axis may differ between the two positions.
///
/// Tiles are scanned column by column, top to bottom, and the first hit is
/// returned, which is not necessarily the closest one. Columns outside the
/// grid count as solid; rows outside the grid do not.
pub fn tile_collision(grid: &TileGrid, body: &Body, new_x: f32, new_y: f32) -> Option<TileCoord> {
    let from_x = body.position.x.min(new_x);
    let from_y = body.position.y.min(new_y);
    let to_x = body.position.x.max(new_x);
    let to_y = body.position.y.max(new_y);

    let from_tile_x = pixels_to_tiles(from_x);
    let from_tile_y = pixels_to_tiles(from_y);
    let to_tile_x = pixels_to_tiles(to_x + body.width() - 1.0);
    let to_tile_y = pixels_to_tiles(to_y + body.height() - 1.0);

    for x in from_tile_x..=to_tile_x {
        for y in from_tile_y..=to_tile_y {
            if !grid.contains_column(x) || grid.is_solid(x, y) {
                return Some(TileCoord { x, y });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Size, Vec2};
    use crate::sim::tilemap::{tiles_to_pixels, TILE_SIZE};

    // 6x4 grid with a wall in column 4 and a floor on row 3.
    fn walled_grid() -> TileGrid {
        let mut tiles = vec![0u16; 24];
        for y in 0..4 {
            tiles[y * 6 + 4] = 1;
        }
        for x in 0..6 {
            tiles[3 * 6 + x] = 1;
        }
        TileGrid::new(6, 4, tiles).expect("grid")
    }

    fn body_at(x: f32, y: f32) -> Body {
        Body::new(Vec2::new(x, y), Size::new(32, 48).expect("size"))
    }

    #[test]
    fn open_move_reports_no_collision() {
        let grid = walled_grid();
        let body = body_at(70.0, 100.0);
        assert_eq!(tile_collision(&grid, &body, 90.0, 100.0), None);
        assert_eq!(tile_collision(&grid, &body, 70.0, 130.0), None);
    }

    #[test]
    fn sweep_into_wall_reports_wall_column() {
        let grid = walled_grid();
        let body = body_at(200.0, 100.0);
        let hit = tile_collision(&grid, &body, 240.0, 100.0).expect("hit");
        assert_eq!(hit.x, 4);
        assert_eq!(tiles_to_pixels(hit.x) - body.width(), 256.0 - 32.0);
    }

    #[test]
    fn sweep_covers_tiles_skipped_in_one_step() {
        let grid = walled_grid();
        let body = body_at(10.0, 100.0);
        let hit = tile_collision(&grid, &body, 300.0, 100.0).expect("tunnel check");
        assert_eq!(hit.x, 4);
    }

    #[test]
    fn horizontal_grid_edges_are_solid() {
        let grid = walled_grid();
        let body = body_at(2.0, 100.0);
        let hit = tile_collision(&grid, &body, -4.0, 100.0).expect("left edge");
        assert_eq!(hit.x, -1);
    }

    #[test]
    fn vertical_grid_edges_are_open() {
        let grid = TileGrid::empty(4, 2).expect("grid");
        let body = body_at(10.0, 10.0);
        assert_eq!(tile_collision(&grid, &body, 10.0, -200.0), None);
        assert_eq!(tile_collision(&grid, &body, 10.0, 600.0), None);
    }

    #[test]
    fn landing_reports_floor_row() {
        let grid = walled_grid();
        let body = body_at(70.0, 130.0);
        let hit = tile_collision(&grid, &body, 70.0, 150.0).expect("floor");
        assert_eq!(hit.y, 3);
        assert_eq!(tiles_to_pixels(hit.y), 3.0 * TILE_SIZE as f32);
    }
}
