mod body;
mod collaborators;
mod collision;
mod config;
mod creature;
mod effects;
mod enemy;
mod items;
mod level;
mod physics;
mod player;
mod projectile;
mod simulation;
mod tilemap;

pub use body::{Body, BodyError, Size, Vec2};
pub use collaborators::{
    Audio, AudioEffect, Cue, LevelLoader, LevelSource, LoaderError, NullAudio, Renderer,
    PRIZE_ECHO,
};
pub use collision::tile_collision;
pub use config::{
    EffectLimits, EnemyConfig, HealthBoundsError, ItemConfig, PlayerConfig, ProjectileConfig, RewardConfig,
    SimulationConfig, SpriteSize, DIE_TIME_MS, DRUM_TRACK, GRAVITY,
};
pub use creature::{Creature, Facing, LifeState, WallResponse};
pub use effects::{StatusEffectKind, StatusEffects, TimedEffect, TravelOutcome, TravelTracker};
pub use enemy::{Enemy, EnemyKind};
pub use items::{Hazard, HazardKind, Pickup, PickupKind};
pub use level::{Level, LevelError, Sprite};
pub use player::{FireControl, FirePhase, Player};
pub use projectile::{Projectile, ProjectileOwner, ProjectileTemplate};
pub use simulation::{FrameReport, LevelTransition, Simulation, SimulationError};
pub use tilemap::{
    pixels_to_tiles, tiles_to_pixels, TileCoord, TileGrid, TileGridError, EMPTY_TILE, TILE_SIZE,
    TILE_SIZE_BITS,
};
