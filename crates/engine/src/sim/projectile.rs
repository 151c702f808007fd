use super::body::{Body, Size, Vec2};
use super::collision::tile_collision;
use super::creature::Facing;
use super::tilemap::TileGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

/// Factory for projectiles of one look and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileTemplate {
    size: Size,
}

impl ProjectileTemplate {
    pub fn new(size: Size) -> Self {
        Self { size }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn spawn(&self, position: Vec2, facing: Facing, owner: ProjectileOwner) -> Projectile {
        Projectile {
            body: Body::new(position, self.size),
            facing,
            owner,
            distance_traveled: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    body: Body,
    facing: Facing,
    owner: ProjectileOwner,
    distance_traveled: f32,
}

impl Projectile {
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn owner(&self) -> ProjectileOwner {
        self.owner
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    /// Moves the projectile horizontally. Returns `false` once it has flown
    /// past `max_range` or would enter a blocking tile; it should then be
    /// dropped.
    pub(crate) fn advance(&mut self, grid: &TileGrid, dt_ms: f32, speed: f32, max_range: f32) -> bool {
        let old_x = self.body.position.x;
        let new_x = old_x + speed * self.facing.sign() * dt_ms;
        self.distance_traveled += (new_x - old_x).abs();
        if self.distance_traveled > max_range {
            return false;
        }

        if tile_collision(grid, &self.body, new_x, self.body.position.y).is_some() {
            return false;
        }
        self.body.position.x = new_x;
        true
    }
}
