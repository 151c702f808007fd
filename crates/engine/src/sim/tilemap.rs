use thiserror::Error;

pub const TILE_SIZE_BITS: u32 = 6;
pub const TILE_SIZE: i32 = 1 << TILE_SIZE_BITS;
pub const EMPTY_TILE: u16 = 0;

/// Converts a pixel coordinate to a tile index. The coordinate is rounded to
/// the nearest pixel first, so a box edge at 63.6 lands in tile 1.
pub fn pixels_to_tiles(pixels: f32) -> i32 {
    let rounded = (pixels + 0.5).floor() as i32;
    rounded >> TILE_SIZE_BITS
}

pub fn tiles_to_pixels(tiles: i32) -> f32 {
    (tiles << TILE_SIZE_BITS) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

/// Static tile grid. Row-major, `(0, 0)` is the top-left cell and y grows
/// downward. Cells holding [`EMPTY_TILE`] do not block movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileGridError {
    #[error("tile grid must have non-zero dimensions, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tiles: Vec<u16>) -> Result<Self, TileGridError> {
        if width == 0 || height == 0 {
            return Err(TileGridError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TileGridError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn empty(width: u32, height: u32) -> Result<Self, TileGridError> {
        Self::new(width, height, vec![EMPTY_TILE; width as usize * height as usize])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_width(&self) -> f32 {
        tiles_to_pixels(self.width as i32)
    }

    pub fn pixel_height(&self) -> f32 {
        tiles_to_pixels(self.height as i32)
    }

    pub fn contains_column(&self, x: i32) -> bool {
        x >= 0 && (x as u32) < self.width
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains_column(x) || y < 0 || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Tile id at a cell, `None` for empty cells and for cells outside the grid.
    pub fn tile(&self, x: i32, y: i32) -> Option<u16> {
        self.index_of(x, y)
            .and_then(|index| self.tiles.get(index).copied())
            .filter(|tile| *tile != EMPTY_TILE)
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_tile_conversion_rounds_before_flooring() {
        assert_eq!(pixels_to_tiles(0.0), 0);
        assert_eq!(pixels_to_tiles(63.0), 0);
        assert_eq!(pixels_to_tiles(63.6), 1);
        assert_eq!(pixels_to_tiles(64.0), 1);
        assert_eq!(pixels_to_tiles(-1.0), -1);
        assert_eq!(pixels_to_tiles(-0.4), 0);
        assert_eq!(tiles_to_pixels(3), 192.0);
    }

    #[test]
    fn tile_count_must_match_dimensions() {
        let err = TileGrid::new(2, 2, vec![0; 3]).expect_err("mismatch");
        assert_eq!(
            err,
            TileGridError::TileCountMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert!(TileGrid::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn out_of_range_cells_read_as_empty() {
        let grid = TileGrid::new(2, 1, vec![1, 0]).expect("grid");
        assert!(grid.is_solid(0, 0));
        assert!(!grid.is_solid(1, 0));
        assert!(!grid.is_solid(-1, 0));
        assert!(!grid.is_solid(0, 1));
        assert!(!grid.is_solid(0, -1));
        assert_eq!(grid.pixel_width(), 128.0);
    }
}
