use thiserror::Error;
use tracing::trace;

use super::body::{Body, Vec2};
use super::creature::{Facing, LifeState};
use super::enemy::Enemy;
use super::items::{Hazard, Pickup};
use super::player::Player;
use super::projectile::{Projectile, ProjectileOwner, ProjectileTemplate};
use super::tilemap::TileGrid;

/// Everything in a level besides the player and projectiles, in the order the
/// loader placed it. Collision queries take the first match in this order.
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    Enemy(Enemy),
    Pickup(Pickup),
    Hazard(Hazard),
}

impl Sprite {
    pub fn body(&self) -> &Body {
        match self {
            Self::Enemy(enemy) => enemy.creature().body(),
            Self::Pickup(pickup) => &pickup.body,
            Self::Hazard(hazard) => &hazard.body,
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Enemy(enemy) if enemy.creature().state() == LifeState::Dead)
    }

    /// Creatures that are dying or dead no longer collide with anything.
    pub fn is_collidable(&self) -> bool {
        match self {
            Self::Enemy(enemy) => enemy.creature().is_alive(),
            Self::Pickup(_) | Self::Hazard(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level '{name}' has a non-finite {what} position")]
    NonFinitePosition { name: String, what: &'static str },
    #[error("level '{name}' must start with a live player")]
    PlayerNotAlive { name: String },
}

/// A tile grid plus the entities currently in it. The level owns exactly one
/// player, kept apart from the sprite list.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    name: String,
    pub(crate) grid: TileGrid,
    pub(crate) player: Player,
    pub(crate) sprites: Vec<Sprite>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) projectile_template: ProjectileTemplate,
}

impl Level {
    pub fn new(
        name: impl Into<String>,
        grid: TileGrid,
        player: Player,
        sprites: Vec<Sprite>,
        projectile_template: ProjectileTemplate,
    ) -> Result<Self, LevelError> {
        let name = name.into();
        if !player.body().is_finite() {
            return Err(LevelError::NonFinitePosition {
                name,
                what: "player",
            });
        }
        if !player.is_alive() {
            return Err(LevelError::PlayerNotAlive { name });
        }
        if sprites.iter().any(|sprite| !sprite.body().is_finite()) {
            return Err(LevelError::NonFinitePosition {
                name,
                what: "sprite",
            });
        }
        Ok(Self {
            name,
            grid,
            player,
            sprites,
            projectiles: Vec::new(),
            projectile_template,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn spawn_projectile(&mut self, position: Vec2, facing: Facing, owner: ProjectileOwner) {
        let projectile = self.projectile_template.spawn(position, facing, owner);
        self.projectiles.push(projectile);
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.sprites.iter().filter_map(|sprite| match sprite {
            Sprite::Enemy(enemy) => Some(enemy),
            _ => None,
        })
    }

    /// Wakes every enemy whose rounded x lies in `[view_left, view_left + view_width)`.
    pub fn wake_creatures_in_view(&mut self, view_left: i32, view_width: i32) -> usize {
        let mut woken = 0;
        for sprite in &mut self.sprites {
            let Sprite::Enemy(enemy) = sprite else {
                continue;
            };
            let screen_x = (enemy.creature().body().position.x + 0.5).floor() as i32 - view_left;
            if !(0..view_width).contains(&screen_x) {
                continue;
            }
            let was_idle = enemy.creature().body().velocity.x == 0.0;
            enemy.creature_mut().wake_up();
            if was_idle && enemy.creature().body().velocity.x != 0.0 {
                woken += 1;
                trace!(kind = enemy.kind().as_token(), screen_x, "creature_woken");
            }
        }
        woken
    }
}
