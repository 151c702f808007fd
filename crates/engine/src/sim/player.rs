use super::body::Body;
use super::config::{HealthBoundsError, PlayerConfig};
use super::creature::{Creature, LifeState, WallResponse};

/// Where the burst-then-cooldown fire control currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePhase {
    Ready,
    Bursting,
    Cooling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FireControl {
    shots_in_burst: u32,
    timer_ms: f32,
    can_shoot: bool,
}

impl Default for FireControl {
    fn default() -> Self {
        Self {
            shots_in_burst: 0,
            timer_ms: 0.0,
            can_shoot: true,
        }
    }
}

impl FireControl {
    pub fn phase(&self) -> FirePhase {
        match (self.can_shoot, self.shots_in_burst) {
            (false, _) => FirePhase::Cooling,
            (true, 0) => FirePhase::Ready,
            (true, _) => FirePhase::Bursting,
        }
    }

    pub fn shots_in_burst(&self) -> u32 {
        self.shots_in_burst
    }

    /// Runs one frame of fire control and reports whether a shot goes off.
    ///
    /// While the trigger is held, shots fire every `burst_interval_ms` until
    /// the burst is spent; the cooldown then ends with one final shot. Letting
    /// go clears the burst count but not the timer, so a cooldown in progress
    /// keeps counting.
    pub fn advance(&mut self, trigger_held: bool, dt_ms: f32, config: &PlayerConfig) -> bool {
        let mut fired = false;
        if trigger_held {
            if self.shots_in_burst >= config.burst_size {
                self.can_shoot = false;
            }

            if self.can_shoot && self.timer_ms > config.burst_interval_ms {
                self.shots_in_burst += 1;
                self.timer_ms = 0.0;
                fired = true;
            } else if !self.can_shoot && self.timer_ms >= config.cooldown_ms {
                self.can_shoot = true;
                self.shots_in_burst = 0;
                self.timer_ms = 0.0;
                fired = true;
            }
        } else {
            self.shots_in_burst = 0;
        }
        self.timer_ms += dt_ms;
        fired
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    creature: Creature,
    health: i32,
    min_health: i32,
    max_health: i32,
    jump_speed: f32,
    score: u32,
    fire: FireControl,
}

impl Player {
    /// Fails when the configured health bounds are empty or do not contain
    /// the initial health.
    pub fn new(body: Body, config: &PlayerConfig) -> Result<Self, HealthBoundsError> {
        config.validate_health()?;
        Ok(Self {
            creature: Creature::new(body, config.max_speed, false, WallResponse::Stop),
            health: config.initial_health,
            min_health: config.min_health,
            max_health: config.max_health,
            jump_speed: config.jump_speed,
            score: 0,
            fire: FireControl::default(),
        })
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub(crate) fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    pub fn body(&self) -> &Body {
        self.creature.body()
    }

    pub fn is_alive(&self) -> bool {
        self.creature.is_alive()
    }

    pub fn state(&self) -> LifeState {
        self.creature.state()
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn fire_control(&self) -> &FireControl {
        &self.fire
    }

    pub(crate) fn fire_control_mut(&mut self) -> &mut FireControl {
        &mut self.fire
    }

    /// Heals only while below the cap, then clamps to it.
    pub fn heal(&mut self, amount: i32) {
        if self.health < self.max_health {
            self.health = self.health.saturating_add(amount);
        }
        self.health = self.health.min(self.max_health);
    }

    /// Removes health. Dropping below the minimum starts dying and pins
    /// health at the minimum.
    pub fn hurt(&mut self, amount: i32) {
        self.health = self.health.saturating_sub(amount);
        if self.health < self.min_health {
            self.health = self.min_health;
            self.creature.set_state(LifeState::Dying);
        }
    }

    pub fn kill(&mut self) {
        self.creature.set_state(LifeState::Dying);
    }

    /// Jumps when standing on something, or unconditionally when forced.
    pub fn jump(&mut self, force: bool) {
        if self.creature.is_grounded() || force {
            self.creature.set_grounded(false);
            self.creature.body_mut().velocity.y = self.jump_speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Size, Vec2};

    fn player() -> Player {
        let body = Body::new(Vec2::new(0.0, 0.0), Size::new(64, 64).expect("size"));
        Player::new(body, &PlayerConfig::default()).expect("player")
    }

    #[test]
    fn invalid_health_config_is_refused() {
        let body = Body::new(Vec2::new(0.0, 0.0), Size::new(64, 64).expect("size"));
        let config = PlayerConfig {
            min_health: 30,
            max_health: 20,
            ..PlayerConfig::default()
        };
        let err = Player::new(body, &config).expect_err("inverted bounds");
        assert_eq!(err, HealthBoundsError::Inverted { min: 30, max: 20 });
    }

    #[test]
    fn heal_clamps_to_cap() {
        let mut player = player();
        player.heal(35);
        assert_eq!(player.health(), 40);
        player.heal(5);
        assert_eq!(player.health(), 40);
    }

    #[test]
    fn hurt_below_minimum_starts_dying_and_clamps() {
        let mut player = player();
        player.hurt(19);
        assert_eq!(player.health(), 1);
        assert!(player.is_alive());

        player.hurt(5);
        assert_eq!(player.health(), 1);
        assert_eq!(player.state(), LifeState::Dying);
    }

    #[test]
    fn jump_requires_ground_unless_forced() {
        let mut player = player();
        player.jump(false);
        assert_eq!(player.body().velocity.y, 0.0);

        player.jump(true);
        assert_eq!(player.body().velocity.y, -0.95);
        assert!(!player.creature().is_grounded());
    }

    #[test]
    fn held_trigger_fires_burst_then_cooldown_shot() {
        let config = PlayerConfig::default();
        let mut fire = FireControl::default();
        let mut shot_times = Vec::new();
        let mut now = 0.0f32;
        while now < 4200.0 {
            if fire.advance(true, 10.0, &config) {
                shot_times.push(now);
            }
            now += 10.0;
        }

        assert_eq!(shot_times.len(), 11);
        assert_eq!(fire.phase(), FirePhase::Ready);
        let cooldown_gap = shot_times[10] - shot_times[9];
        assert!(cooldown_gap >= 1000.0, "gap {cooldown_gap}");
    }

    #[test]
    fn release_clears_burst_but_not_cooldown_timer() {
        let config = PlayerConfig::default();
        let mut fire = FireControl::default();
        for _ in 0..400 {
            fire.advance(true, 10.0, &config);
            if fire.shots_in_burst() == 10 {
                break;
            }
        }
        fire.advance(true, 10.0, &config);
        assert_eq!(fire.phase(), FirePhase::Cooling);

        assert!(!fire.advance(false, 500.0, &config));
        assert_eq!(fire.shots_in_burst(), 0);
        assert_eq!(fire.phase(), FirePhase::Cooling);

        let mut fired = false;
        for _ in 0..60 {
            fired |= fire.advance(true, 10.0, &config);
        }
        assert!(fired);
        assert_eq!(fire.phase(), FirePhase::Ready);
    }
}
