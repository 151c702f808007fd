use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::{BodyError, Size};

/// Downward acceleration in pixels per millisecond squared.
pub const GRAVITY: f32 = 0.002;
pub const DIE_TIME_MS: f32 = 1000.0;
pub const DRUM_TRACK: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: u32,
    pub height: u32,
}

impl SpriteSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Result<Size, BodyError> {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: SpriteSize,
    pub max_speed: f32,
    pub jump_speed: f32,
    pub min_health: i32,
    pub max_health: i32,
    pub initial_health: i32,
    pub burst_interval_ms: f32,
    pub burst_size: u32,
    pub cooldown_ms: f32,
    pub muzzle_offset: f32,
    pub spawn_tile_x: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HealthBoundsError {
    #[error("max_health {max} is below min_health {min}")]
    Inverted { min: i32, max: i32 },
    #[error("initial_health {initial} is outside {min}..={max}")]
    InitialOutOfRange { initial: i32, min: i32, max: i32 },
}

impl PlayerConfig {
    /// Health must start inside `min_health..=max_health`, and that range
    /// must not be empty.
    pub fn validate_health(&self) -> Result<(), HealthBoundsError> {
        let (min, max) = (self.min_health, self.max_health);
        if max < min {
            return Err(HealthBoundsError::Inverted { min, max });
        }
        if !(min..=max).contains(&self.initial_health) {
            return Err(HealthBoundsError::InitialOutOfRange {
                initial: self.initial_health,
                min,
                max,
            });
        }
        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: SpriteSize::new(64, 64),
            max_speed: 0.5,
            jump_speed: -0.95,
            min_health: 1,
            max_health: 40,
            initial_health: 20,
            burst_interval_ms: 300.0,
            burst_size: 10,
            cooldown_ms: 1000.0,
            muzzle_offset: 100.0,
            spawn_tile_x: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub grub_size: SpriteSize,
    pub fly_size: SpriteSize,
    pub grub_speed: f32,
    pub fly_speed: f32,
    pub fire_interval_ms: f32,
    pub muzzle_offset: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            grub_size: SpriteSize::new(64, 64),
            fly_size: SpriteSize::new(64, 64),
            grub_speed: 0.05,
            fly_speed: 0.2,
            fire_interval_ms: 600.0,
            muzzle_offset: 65.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub size: SpriteSize,
    pub speed: f32,
    /// Range as a multiple of the player's width.
    pub range_in_player_widths: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            size: SpriteSize::new(20, 10),
            speed: 0.8,
            range_in_player_widths: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectLimits {
    pub duration_ms: f32,
    pub displacement_limit: u32,
}

impl Default for EffectLimits {
    fn default() -> Self {
        Self {
            duration_ms: 5000.0,
            displacement_limit: 10,
        }
    }
}

/// Health and score amounts applied by collisions, pickups and hazards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub travel_heal: i32,
    pub rest_heal: i32,
    pub rest_interval_ms: f32,
    pub stomp_score: u32,
    pub shot_kill_heal: i32,
    pub shot_kill_score: u32,
    pub projectile_damage: i32,
    pub mushroom_heal: i32,
    pub explode_damage: i32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            travel_heal: 1,
            rest_heal: 5,
            rest_interval_ms: 1000.0,
            stomp_score: 5,
            shot_kill_heal: 10,
            shot_kill_score: 5,
            projectile_damage: 5,
            mushroom_heal: 5,
            explode_damage: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    pub pickup_size: SpriteSize,
    pub hazard_size: SpriteSize,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            pickup_size: SpriteSize::new(32, 32),
            hazard_size: SpriteSize::new(64, 64),
        }
    }
}

/// Every tunable of the simulation. Missing fields fall back to defaults
/// when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity: f32,
    pub die_time_ms: f32,
    pub drum_track: usize,
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    pub projectile: ProjectileConfig,
    pub items: ItemConfig,
    pub effects: EffectLimits,
    pub rewards: RewardConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            die_time_ms: DIE_TIME_MS,
            drum_track: DRUM_TRACK,
            player: PlayerConfig::default(),
            enemies: EnemyConfig::default(),
            projectile: ProjectileConfig::default(),
            items: ItemConfig::default(),
            effects: EffectLimits::default(),
            rewards: RewardConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let raw = r#"{ "gravity": 0.004, "player": { "max_health": 60 } }"#;
        let config: SimulationConfig = serde_json::from_str(raw).expect("config");
        assert_eq!(config.gravity, 0.004);
        assert_eq!(config.player.max_health, 60);
        assert_eq!(config.player.min_health, 1);
        assert_eq!(config.enemies.fire_interval_ms, 600.0);
        assert_eq!(config.effects, EffectLimits::default());
    }

    #[test]
    fn health_bounds_must_hold_the_initial_health() {
        assert_eq!(PlayerConfig::default().validate_health(), Ok(()));

        let inverted = PlayerConfig {
            min_health: 10,
            max_health: 5,
            initial_health: 7,
            ..PlayerConfig::default()
        };
        assert_eq!(
            inverted.validate_health(),
            Err(HealthBoundsError::Inverted { min: 10, max: 5 })
        );

        let overfull = PlayerConfig {
            initial_health: 41,
            ..PlayerConfig::default()
        };
        assert!(matches!(
            overfull.validate_health(),
            Err(HealthBoundsError::InitialOutOfRange { initial: 41, .. })
        ));
    }

    #[test]
    fn zero_sprite_size_is_rejected() {
        assert!(SpriteSize::new(0, 4).to_size().is_err());
        assert!(SpriteSize::new(4, 4).to_size().is_ok());
    }
}
