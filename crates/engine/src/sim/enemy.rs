use super::body::Body;
use super::config::EnemyConfig;
use super::creature::{Creature, WallResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Grub,
    Fly,
}

impl EnemyKind {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Grub => "grub",
            Self::Fly => "fly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    kind: EnemyKind,
    creature: Creature,
    fire_timer_ms: f32,
}

impl Enemy {
    /// Enemies start asleep; they walk once something wakes them.
    pub fn new(kind: EnemyKind, body: Body, config: &EnemyConfig) -> Self {
        let (max_speed, flying) = match kind {
            EnemyKind::Grub => (config.grub_speed, false),
            EnemyKind::Fly => (config.fly_speed, true),
        };
        Self {
            kind,
            creature: Creature::new(body, max_speed, flying, WallResponse::Reverse),
            fire_timer_ms: 0.0,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub(crate) fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    /// Accumulates the fire timer while the enemy is walking and the player
    /// has moved since the last travel reset. Returns `true` when a shot is due.
    pub(crate) fn advance_fire_timer(
        &mut self,
        player_displacement: f32,
        dt_ms: f32,
        fire_interval_ms: f32,
    ) -> bool {
        if self.creature.body().velocity.x == 0.0 || player_displacement == 0.0 {
            return false;
        }
        if self.fire_timer_ms > fire_interval_ms {
            self.fire_timer_ms = 0.0;
            true
        } else {
            self.fire_timer_ms += dt_ms;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Size, Vec2};

    fn grub() -> Enemy {
        let body = Body::new(Vec2::new(0.0, 0.0), Size::new(64, 48).expect("size"));
        Enemy::new(EnemyKind::Grub, body, &EnemyConfig::default())
    }

    #[test]
    fn sleeping_enemy_never_fires() {
        let mut enemy = grub();
        for _ in 0..100 {
            assert!(!enemy.advance_fire_timer(10.0, 100.0, 600.0));
        }
    }

    #[test]
    fn still_player_holds_fire() {
        let mut enemy = grub();
        enemy.creature_mut().wake_up();
        for _ in 0..100 {
            assert!(!enemy.advance_fire_timer(0.0, 100.0, 600.0));
        }
    }

    #[test]
    fn walking_enemy_fires_after_interval() {
        let mut enemy = grub();
        enemy.creature_mut().wake_up();
        let shots = (0..8)
            .filter(|_| enemy.advance_fire_timer(5.0, 100.0, 600.0))
            .count();
        assert_eq!(shots, 1);
    }
}
