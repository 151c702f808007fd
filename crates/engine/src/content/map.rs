use std::fmt;
use std::path::{Path, PathBuf};

use crate::sim::{
    Body, BodyError, Enemy, EnemyKind, Hazard, HazardKind, Level, Pickup, PickupKind, Player,
    ProjectileTemplate, SimulationConfig, Size, Sprite, SpriteSize, TileGrid, Vec2, EMPTY_TILE,
};
use crate::sim::{tiles_to_pixels, TILE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapErrorCode {
    Empty,
    NonAsciiCharacter,
    InvalidGrid,
    InvalidSpriteSize,
    InvalidPlayerConfig,
    InvalidLevel,
}

#[derive(Debug, Clone)]
pub struct MapError {
    pub code: MapErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for MapError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Tile(u16),
    Pickup(PickupKind),
    Hazard(HazardKind),
    Enemy(EnemyKind),
}

fn classify(ch: char) -> Cell {
    match ch {
        'A'..='Z' => Cell::Tile(ch as u16 - 'A' as u16 + 1),
        'o' => Cell::Pickup(PickupKind::Star),
        '!' => Cell::Pickup(PickupKind::Music),
        'm' => Cell::Pickup(PickupKind::Mushroom),
        '*' => Cell::Pickup(PickupKind::Goal),
        'x' => Cell::Hazard(HazardKind::Explode),
        'g' => Cell::Hazard(HazardKind::Gas),
        '1' => Cell::Enemy(EnemyKind::Grub),
        '2' => Cell::Enemy(EnemyKind::Fly),
        _ => Cell::Empty,
    }
}

/// Parses an ASCII level map.
///
/// Lines starting with `#` are skipped. Every other line is one row of
/// tiles; the grid is as wide as the longest row. Sprites sit centred in
/// their cell and rest on its bottom edge. The player always starts at the
/// configured spawn column, at the top of the map.
pub fn parse_map(
    name: &str,
    file_path: &Path,
    raw: &str,
    config: &SimulationConfig,
) -> Result<Level, MapError> {
    let error = |code: MapErrorCode, message: String, location: Option<SourceLocation>| MapError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location,
    };

    let mut rows = Vec::<&str>::new();
    for (index, line) in raw.lines().enumerate() {
        if line.starts_with('#') {
            continue;
        }
        if let Some((column, ch)) = line.chars().enumerate().find(|(_, ch)| !ch.is_ascii()) {
            return Err(error(
                MapErrorCode::NonAsciiCharacter,
                format!("map rows must be ASCII, found '{ch}'"),
                Some(SourceLocation {
                    line: index + 1,
                    column: column + 1,
                }),
            ));
        }
        rows.push(line);
    }

    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let height = rows.len();
    if width == 0 || height == 0 {
        return Err(error(
            MapErrorCode::Empty,
            "map has no tiles".to_string(),
            None,
        ));
    }

    let sizes = SpriteSizes::from_config(config).map_err(|(what, source)| {
        error(
            MapErrorCode::InvalidSpriteSize,
            format!("{what} size is invalid: {source}"),
            None,
        )
    })?;

    let mut tiles = vec![EMPTY_TILE; width * height];
    let mut sprites = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let (tile_x, tile_y) = (x as i32, y as i32);
            match classify(ch) {
                Cell::Empty => {}
                Cell::Tile(tile) => tiles[y * width + x] = tile,
                Cell::Pickup(kind) => sprites.push(Sprite::Pickup(Pickup {
                    kind,
                    body: place_in_cell(tile_x, tile_y, sizes.pickup),
                })),
                Cell::Hazard(kind) => sprites.push(Sprite::Hazard(Hazard {
                    kind,
                    body: place_in_cell(tile_x, tile_y, sizes.hazard),
                })),
                Cell::Enemy(kind) => {
                    let size = match kind {
                        EnemyKind::Grub => sizes.grub,
                        EnemyKind::Fly => sizes.fly,
                    };
                    let body = place_in_cell(tile_x, tile_y, size);
                    sprites.push(Sprite::Enemy(Enemy::new(kind, body, &config.enemies)));
                }
            }
        }
    }

    let grid = TileGrid::new(width as u32, height as u32, tiles).map_err(|source| {
        error(MapErrorCode::InvalidGrid, source.to_string(), None)
    })?;

    let spawn = Vec2::new(tiles_to_pixels(config.player.spawn_tile_x), 0.0);
    let player = Player::new(Body::new(spawn, sizes.player), &config.player).map_err(|source| {
        error(
            MapErrorCode::InvalidPlayerConfig,
            format!("player health config is invalid: {source}"),
            None,
        )
    })?;
    let template = ProjectileTemplate::new(sizes.projectile);

    Level::new(name, grid, player, sprites, template)
        .map_err(|source| error(MapErrorCode::InvalidLevel, source.to_string(), None))
}

/// Centres a body horizontally in the tile and puts its bottom on the tile's
/// bottom edge.
fn place_in_cell(tile_x: i32, tile_y: i32, size: Size) -> Body {
    let x = tiles_to_pixels(tile_x) + ((TILE_SIZE - size.width() as i32) / 2) as f32;
    let y = tiles_to_pixels(tile_y + 1) - size.height() as f32;
    Body::new(Vec2::new(x, y), size)
}

struct SpriteSizes {
    player: Size,
    grub: Size,
    fly: Size,
    pickup: Size,
    hazard: Size,
    projectile: Size,
}

impl SpriteSizes {
    fn from_config(
        config: &SimulationConfig,
    ) -> Result<Self, (&'static str, BodyError)> {
        let size = |what: &'static str, size: SpriteSize| size.to_size().map_err(|err| (what, err));
        Ok(Self {
            player: size("player", config.player.size)?,
            grub: size("grub", config.enemies.grub_size)?,
            fly: size("fly", config.enemies.fly_size)?,
            pickup: size("pickup", config.items.pickup_size)?,
            hazard: size("hazard", config.items.hazard_size)?,
            projectile: size("projectile", config.projectile.size)?,
        })
    }
}
