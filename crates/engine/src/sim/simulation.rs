use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::app::{InputAction, InputSnapshot};

use super::body::Vec2;
use super::collaborators::{Audio, Cue, LevelLoader, LevelSource, LoaderError, PRIZE_ECHO};
use super::config::SimulationConfig;
use super::creature::{Facing, LifeState};
use super::effects::{StatusEffectKind, StatusEffects, TravelTracker};
use super::items::{HazardKind, PickupKind};
use super::level::{Level, Sprite};
use super::physics;
use super::projectile::ProjectileOwner;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to load the initial level: {source}")]
    InitialLevel {
        #[source]
        source: LoaderError,
    },
    #[error("failed to reload the level after the player died: {source}")]
    Respawn {
        #[source]
        source: LoaderError,
    },
    #[error("failed to load the next level: {source}")]
    Advance {
        #[source]
        source: LoaderError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTransition {
    Respawned,
    Advanced,
}

/// What happened during one [`Simulation::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub exit_requested: bool,
    pub transition: Option<LevelTransition>,
    pub projectiles_spawned: u32,
}

enum Contact {
    Pickup(PickupKind),
    Hazard(HazardKind),
    Enemy,
}

/// Owns the current level and advances it one variable-length frame at a time.
pub struct Simulation<L, A> {
    config: SimulationConfig,
    loader: L,
    audio: A,
    level: Level,
    source: Option<LevelSource>,
    effects: StatusEffects,
    travel: TravelTracker,
}

impl<L: LevelLoader, A: Audio> Simulation<L, A> {
    /// Loads the first level, either from `source` or from the loader's own
    /// sequence. When a source is given, deaths reload that same source.
    pub fn new(
        config: SimulationConfig,
        mut loader: L,
        audio: A,
        source: Option<LevelSource>,
    ) -> Result<Self, SimulationError> {
        let level = loader
            .load_initial_level(source.as_ref())
            .map_err(|source| SimulationError::InitialLevel { source })?;
        info!(
            level = level.name(),
            sprites = level.sprites().len(),
            "simulation_started"
        );
        Ok(Self {
            config,
            loader,
            audio,
            level,
            source,
            effects: StatusEffects::default(),
            travel: TravelTracker::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn effects(&self) -> &StatusEffects {
        &self.effects
    }

    pub fn travel(&self) -> &TravelTracker {
        &self.travel
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn wake_creatures_in_view(&mut self, view_left: i32, view_width: i32) -> usize {
        self.level.wake_creatures_in_view(view_left, view_width)
    }

    pub fn update(
        &mut self,
        elapsed: Duration,
        input: &InputSnapshot,
    ) -> Result<FrameReport, SimulationError> {
        self.step_ms(elapsed.as_secs_f32() * 1000.0, input)
    }

    /// Runs one frame of `dt_ms` milliseconds.
    ///
    /// A dying or dead player is replaced by a freshly loaded level and
    /// nothing else happens that frame. Reaching the goal also ends the frame right after
    /// the next level is swapped in.
    pub fn step_ms(
        &mut self,
        dt_ms: f32,
        input: &InputSnapshot,
    ) -> Result<FrameReport, SimulationError> {
        let mut report = FrameReport {
            exit_requested: input.was_pressed(InputAction::Exit),
            ..FrameReport::default()
        };

        self.tick_status_effects(dt_ms);
        self.regulate_health(dt_ms);

        if !self.level.player.is_alive() {
            self.respawn()?;
            report.transition = Some(LevelTransition::Respawned);
            return Ok(report);
        }

        self.apply_input(dt_ms, input, &mut report);
        if self.update_player(dt_ms)? {
            report.transition = Some(LevelTransition::Advanced);
            return Ok(report);
        }
        self.update_enemies(dt_ms, &mut report);
        self.update_projectiles(dt_ms);
        Ok(report)
    }

    fn tick_status_effects(&mut self, dt_ms: f32) {
        for kind in [StatusEffectKind::Invincibility, StatusEffectKind::Gas] {
            if self.effects.get_mut(kind).tick(dt_ms, &self.config.effects) {
                debug!(effect = kind.as_token(), "status_effect_expired");
            }
        }
    }

    fn regulate_health(&mut self, dt_ms: f32) {
        let rewards = &self.config.rewards;
        let player = &mut self.level.player;
        let outcome = self.travel.observe(
            player.body().position.x,
            player.body().width(),
            dt_ms,
            rewards.rest_interval_ms,
        );
        if outcome.traveled {
            player.heal(rewards.travel_heal);
            self.effects.record_displacement();
        }
        if outcome.rested {
            player.heal(rewards.rest_heal);
        }
    }

    fn respawn(&mut self) -> Result<(), SimulationError> {
        info!(
            level = self.level.name(),
            health = self.level.player.health(),
            score = self.level.player.score(),
            "player_died"
        );
        let level = match &self.source {
            Some(source) => self.loader.load_level_from_source(source),
            None => self.loader.reload_current_level(),
        }
        .map_err(|source| SimulationError::Respawn { source })?;
        self.level = level;
        Ok(())
    }

    fn apply_input(&mut self, dt_ms: f32, input: &InputSnapshot, report: &mut FrameReport) {
        let player = &mut self.level.player;
        if !player.is_alive() {
            return;
        }

        let speed = player.creature().max_speed();
        let mut velocity_x = 0.0;
        if input.is_down(InputAction::MoveLeft) {
            velocity_x -= speed;
            player.creature_mut().set_facing(Facing::Left);
        }
        if input.is_down(InputAction::MoveRight) {
            velocity_x += speed;
            player.creature_mut().set_facing(Facing::Right);
        }
        if input.was_pressed(InputAction::Jump) {
            player.jump(false);
        }
        if input.was_pressed(InputAction::Down)
            && physics::drop_through_floor(player.creature_mut(), &self.level.grid)
        {
            debug!(y = player.body().position.y, "player_dropped");
        }

        let trigger_held = input.is_down(InputAction::Shoot) && !self.effects.gas.is_active();
        let fired = player
            .fire_control_mut()
            .advance(trigger_held, dt_ms, &self.config.player);
        if fired {
            let facing = player.creature().facing();
            let origin = player.body().position;
            let muzzle = Vec2::new(
                origin.x + self.config.player.muzzle_offset * facing.sign(),
                origin.y,
            );
            self.level
                .spawn_projectile(muzzle, facing, ProjectileOwner::Player);
            self.audio.play_cue(Cue::Boop);
            report.projectiles_spawned += 1;
            debug!(owner = "player", x = muzzle.x, y = muzzle.y, "projectile_spawned");
        }

        self.level.player.creature_mut().body_mut().velocity.x = velocity_x;
    }

    /// Moves the player one axis at a time, checking contacts after each.
    /// Returns `true` when a goal swapped in the next level.
    fn update_player(&mut self, dt_ms: f32) -> Result<bool, SimulationError> {
        let creature = self.level.player.creature_mut();
        physics::begin_step(creature, self.config.gravity, dt_ms);
        physics::move_horizontal(creature, &self.level.grid, dt_ms);
        if self.check_player_contacts(false)? {
            return Ok(true);
        }

        let old_y = physics::move_vertical(self.level.player.creature_mut(), &self.level.grid, dt_ms);
        let can_kill = old_y < self.level.player.body().position.y;
        if self.check_player_contacts(can_kill)? {
            return Ok(true);
        }

        self.level
            .player
            .creature_mut()
            .update(dt_ms, self.config.die_time_ms);
        Ok(false)
    }

    /// Resolves the first sprite the player touches, then every projectile.
    /// `can_kill` is set when the player just moved down onto something.
    fn check_player_contacts(&mut self, can_kill: bool) -> Result<bool, SimulationError> {
        if !self.level.player.is_alive() {
            return Ok(false);
        }

        let player_body = *self.level.player.body();
        let hit = self
            .level
            .sprites
            .iter()
            .position(|sprite| sprite.is_collidable() && player_body.overlaps(sprite.body()));
        if let Some(index) = hit {
            let contact = match &self.level.sprites[index] {
                Sprite::Pickup(pickup) => Contact::Pickup(pickup.kind),
                Sprite::Hazard(hazard) => Contact::Hazard(hazard.kind),
                Sprite::Enemy(_) => Contact::Enemy,
            };
            match contact {
                Contact::Pickup(kind) => {
                    self.level.sprites.remove(index);
                    if self.acquire_pickup(kind)? {
                        return Ok(true);
                    }
                }
                Contact::Hazard(kind) => {
                    self.level.sprites.remove(index);
                    self.trigger_hazard(kind);
                }
                Contact::Enemy => self.strike_enemy(index, can_kill),
            }
        }

        self.absorb_projectiles();
        Ok(false)
    }

    fn acquire_pickup(&mut self, kind: PickupKind) -> Result<bool, SimulationError> {
        debug!(pickup = kind.as_token(), "pickup_consumed");
        match kind {
            PickupKind::Star => self.effects.invincibility.activate(),
            PickupKind::Mushroom => {
                self.audio.play_cue(Cue::Prize);
                self.level.player.heal(self.config.rewards.mushroom_heal);
            }
            PickupKind::Music => {
                self.audio.play_cue(Cue::Prize);
                self.audio.toggle_track_mute(self.config.drum_track);
            }
            PickupKind::Goal => {
                self.advance_level()?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn advance_level(&mut self) -> Result<(), SimulationError> {
        let score = self.level.player.score();
        self.audio
            .play_cue_with(Cue::Prize, Some(PRIZE_ECHO), false);
        let mut next = self
            .loader
            .load_next_level()
            .map_err(|source| SimulationError::Advance { source })?;
        next.player.add_score(score);
        info!(
            from = self.level.name(),
            to = next.name(),
            score,
            "level_advanced"
        );
        self.level = next;
        Ok(())
    }

    fn trigger_hazard(&mut self, kind: HazardKind) {
        match kind {
            HazardKind::Explode => self.level.player.hurt(self.config.rewards.explode_damage),
            HazardKind::Gas => self.effects.gas.activate(),
        }
        debug!(
            hazard = kind.as_token(),
            health = self.level.player.health(),
            "hazard_triggered"
        );
    }

    fn strike_enemy(&mut self, index: usize, can_kill: bool) {
        self.audio.play_cue(Cue::Boop);
        if let Some(Sprite::Enemy(enemy)) = self.level.sprites.get_mut(index) {
            enemy.creature_mut().set_state(LifeState::Dying);
        }

        let player = &mut self.level.player;
        if can_kill {
            player.jump(true);
            player.add_score(self.config.rewards.stomp_score);
            debug!(score = player.score(), "enemy_stomped");
        } else if !self.effects.invincibility.is_active() {
            player.kill();
        }
    }

    /// Every projectile touching the live player is consumed, whoever fired it.
    fn absorb_projectiles(&mut self) {
        let invincible = self.effects.invincibility.is_active();
        let damage = self.config.rewards.projectile_damage;
        let player = &mut self.level.player;
        self.level.projectiles.retain(|projectile| {
            if !player.is_alive() || !player.body().overlaps(projectile.body()) {
                return true;
            }
            if !invincible {
                player.hurt(damage);
            }
            false
        });
    }

    fn update_enemies(&mut self, dt_ms: f32, report: &mut FrameReport) {
        self.level.sprites.retain(|sprite| !sprite.is_dead());

        let displacement = self.travel.displacement();
        let rewards = &self.config.rewards;
        let enemy_config = &self.config.enemies;
        for sprite in &mut self.level.sprites {
            let Sprite::Enemy(enemy) = sprite else {
                continue;
            };

            let creature = enemy.creature_mut();
            physics::begin_step(creature, self.config.gravity, dt_ms);
            physics::move_horizontal(creature, &self.level.grid, dt_ms);
            physics::move_vertical(creature, &self.level.grid, dt_ms);

            if enemy.creature().is_alive() {
                let body = *enemy.creature().body();
                let hit = self.level.projectiles.iter().position(|projectile| {
                    projectile.owner() == ProjectileOwner::Player && body.overlaps(projectile.body())
                });
                if let Some(hit) = hit {
                    self.level.projectiles.remove(hit);
                    self.level.player.heal(rewards.shot_kill_heal);
                    self.audio
                        .play_cue_with(Cue::Prize, Some(PRIZE_ECHO), false);
                    enemy.creature_mut().set_state(LifeState::Dying);
                    self.level.player.add_score(rewards.shot_kill_score);
                    debug!(kind = enemy.kind().as_token(), "enemy_shot");
                }
            }

            if enemy.advance_fire_timer(displacement, dt_ms, enemy_config.fire_interval_ms) {
                let facing = enemy.creature().facing();
                let origin = enemy.creature().body().position;
                let muzzle = Vec2::new(origin.x + enemy_config.muzzle_offset * facing.sign(), origin.y);
                let projectile =
                    self.level
                        .projectile_template
                        .spawn(muzzle, facing, ProjectileOwner::Enemy);
                self.level.projectiles.push(projectile);
                report.projectiles_spawned += 1;
                debug!(
                    owner = enemy.kind().as_token(),
                    x = muzzle.x,
                    y = muzzle.y,
                    "projectile_spawned"
                );
            }

            enemy
                .creature_mut()
                .update(dt_ms, self.config.die_time_ms);
        }
    }

    fn update_projectiles(&mut self, dt_ms: f32) {
        let max_range =
            self.config.projectile.range_in_player_widths * self.level.player.body().width();
        let speed = self.config.projectile.speed;
        let grid = &self.level.grid;
        self.level
            .projectiles
            .retain_mut(|projectile| projectile.advance(grid, dt_ms, speed, max_range));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Body, Size};
    use crate::sim::collaborators::NullAudio;
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::items::{Hazard, Pickup};
    use crate::sim::player::Player;
    use crate::sim::projectile::ProjectileTemplate;
    use crate::sim::tilemap::TileGrid;

    const FRAME_MS: f32 = 16.0;

    struct FixedLoader {
        level: Level,
        reloads: usize,
        sourced: usize,
        advances: usize,
    }

    impl FixedLoader {
        fn new(level: Level) -> Self {
            Self {
                level,
                reloads: 0,
                sourced: 0,
                advances: 0,
            }
        }
    }

    impl LevelLoader for FixedLoader {
        fn reload_current_level(&mut self) -> Result<Level, LoaderError> {
            self.reloads += 1;
            Ok(self.level.clone())
        }

        fn load_next_level(&mut self) -> Result<Level, LoaderError> {
            self.advances += 1;
            Ok(self.level.clone())
        }

        fn load_level_from_source(&mut self, _source: &LevelSource) -> Result<Level, LoaderError> {
            self.sourced += 1;
            Ok(self.level.clone())
        }
    }

    // 20x6 grid with a floor on row 5; the player stands on it at x = 192.
    fn level_with(sprites: Vec<Sprite>) -> Level {
        let (w, h) = (20usize, 6usize);
        let mut tiles = vec![0u16; w * h];
        for x in 0..w {
            tiles[5 * w + x] = 1;
        }
        let grid = TileGrid::new(w as u32, h as u32, tiles).expect("grid");
        let config = SimulationConfig::default();
        let player_body = Body::new(
            Vec2::new(192.0, 256.0),
            config.player.size.to_size().expect("size"),
        );
        let player = Player::new(player_body, &config.player).expect("player");
        let template = ProjectileTemplate::new(Size::new(20, 10).expect("size"));
        Level::new("test", grid, player, sprites, template).expect("level")
    }

    fn simulation(sprites: Vec<Sprite>) -> Simulation<FixedLoader, NullAudio> {
        let loader = FixedLoader::new(level_with(sprites));
        Simulation::new(SimulationConfig::default(), loader, NullAudio, None).expect("simulation")
    }

    fn grub_at(x: f32) -> Sprite {
        let config = SimulationConfig::default();
        let body = Body::new(Vec2::new(x, 272.0), Size::new(64, 48).expect("size"));
        Sprite::Enemy(Enemy::new(EnemyKind::Grub, body, &config.enemies))
    }

    fn item_body(x: f32) -> Body {
        Body::new(Vec2::new(x, 288.0), Size::new(32, 32).expect("size"))
    }

    #[test]
    fn exit_press_is_reported_without_stopping_the_frame() {
        let mut sim = simulation(Vec::new());
        let input = InputSnapshot::empty().with_action_pressed(InputAction::Exit);
        let report = sim.step_ms(FRAME_MS, &input).expect("step");
        assert!(report.exit_requested);
        assert_eq!(report.transition, None);
    }

    #[test]
    fn standing_player_stays_grounded_on_floor() {
        let mut sim = simulation(Vec::new());
        for _ in 0..5 {
            sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        }
        let player = sim.level().player();
        assert_eq!(player.body().position.y, 256.0);
        assert!(player.creature().is_grounded());
    }

    #[test]
    fn walking_into_enemy_kills_player_then_level_reloads() {
        let mut sim = simulation(vec![grub_at(232.0)]);
        sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        assert_eq!(sim.level().player().state(), LifeState::Dying);
        assert!(!sim.level().enemies().any(|enemy| enemy.creature().is_alive()));

        let report = sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        assert_eq!(report.transition, Some(LevelTransition::Respawned));
        assert_eq!(sim.loader().reloads, 1);
        assert!(sim.level().player().is_alive());
    }

    #[test]
    fn player_killed_and_expired_in_one_long_frame_still_respawns() {
        let mut sim = simulation(vec![grub_at(232.0)]);
        let report = sim.step_ms(1000.0, &InputSnapshot::empty()).expect("step");
        assert_eq!(report.transition, None);
        assert_eq!(sim.level().player().state(), LifeState::Dead);

        let report = sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        assert_eq!(report.transition, Some(LevelTransition::Respawned));
        assert_eq!(sim.loader().reloads, 1);
        assert!(sim.level().player().is_alive());
    }

    #[test]
    fn respawn_uses_explicit_source_when_given() {
        let loader = FixedLoader::new(level_with(vec![grub_at(232.0)]));
        let source = LevelSource::new("custom.txt");
        let mut sim = Simulation::new(SimulationConfig::default(), loader, NullAudio, Some(source))
            .expect("simulation");
        sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        assert_eq!(sim.loader().sourced, 2);
        assert_eq!(sim.loader().reloads, 0);
    }

    #[test]
    fn invincible_player_survives_enemy_contact() {
        let star = Sprite::Pickup(Pickup {
            kind: PickupKind::Star,
            body: item_body(200.0),
        });
        let mut sim = simulation(vec![star, grub_at(232.0)]);
        sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        assert!(sim.effects().invincibility.is_active());

        sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        assert!(sim.level().player().is_alive());
        assert_eq!(sim.level().sprites().len(), 1);
    }

    #[test]
    fn gas_blocks_the_trigger() {
        let gas = Sprite::Hazard(Hazard {
            kind: HazardKind::Gas,
            body: item_body(200.0),
        });
        let mut sim = simulation(vec![gas]);
        let shoot = InputSnapshot::empty().with_action_down(InputAction::Shoot, true);
        let mut spawned = 0;
        for _ in 0..40 {
            spawned += sim.step_ms(FRAME_MS, &shoot).expect("step").projectiles_spawned;
        }
        assert!(sim.effects().gas.is_active());
        assert_eq!(spawned, 0);
    }

    #[test]
    fn explode_hazard_hurts_and_disappears() {
        let explode = Sprite::Hazard(Hazard {
            kind: HazardKind::Explode,
            body: item_body(200.0),
        });
        let mut sim = simulation(vec![explode]);
        sim.step_ms(FRAME_MS, &InputSnapshot::empty()).expect("step");
        assert_eq!(sim.level().player().health(), 10);
        assert!(sim.level().sprites().is_empty());
    }

    #[test]
    fn held_move_sets_velocity_and_facing() {
        let mut sim = simulation(Vec::new());
        let right = InputSnapshot::empty().with_action_down(InputAction::MoveRight, true);
        sim.step_ms(10.0, &right).expect("step");
        let player = sim.level().player();
        assert_eq!(player.body().velocity.x, 0.5);
        assert_eq!(player.body().position.x, 197.0);
        assert_eq!(player.creature().facing(), Facing::Right);
    }
}
