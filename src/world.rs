//! The game session: entity registry, state machine and score timebase.
//!
//! Per-frame order, driven by the front end:
//! 1. [`GameWorld::handle_event`] for every queued input/timer event.
//! 2. [`GameWorld::tick`]: update pass, collisions, win check, compaction.
//! 3. Rendering reads the world through its accessors.
//!
//! All randomness comes through the injected `rng` so callers control
//! determinism (tests use a seeded RNG).

use glam::Vec2;
use rand::Rng;

use crate::assets::Assets;
use crate::audio::SoundEffect;
use crate::collision;
use crate::config::GameConfig;
use crate::entities::{
    Bounds, Entity, Explosion, FrameContext, GameState, Meteor, MeteorSource, Player, Star,
};
use crate::error::{GameError, GameResult};
use crate::input::{GameEvent, InputState};
use crate::registry::{EntityId, EntityRegistry};
use crate::rotation::RotationCache;

/// Smallest play field the overlays fit in, in pixels.
pub const MIN_WIDTH: usize = 32;
pub const MIN_HEIGHT: usize = 20;

/// What the frame loop should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct GameWorld {
    config: GameConfig,
    assets: Assets,
    bounds: Bounds,
    registry: EntityRegistry,
    rotation: RotationCache,
    state: GameState,
    /// Tick at which the current run started; score counts from here.
    start_ms: u64,
    /// Score frozen when leaving `Playing`.
    final_score: u32,
    sounds: Vec<SoundEffect>,
}

impl GameWorld {
    /// Build a world and seed the first run.
    pub fn new(
        config: GameConfig,
        assets: Assets,
        width: usize,
        height: usize,
        now: u64,
        rng: &mut impl Rng,
    ) -> GameResult<Self> {
        let min_width = MIN_WIDTH.max(assets.player.width());
        let min_height = MIN_HEIGHT.max(assets.player.height());
        if width < min_width || height < min_height {
            return Err(GameError::SurfaceTooSmall {
                width,
                height,
                min_width,
                min_height,
            });
        }
        let mut world = Self {
            rotation: RotationCache::new(config.rotation_step_deg),
            config,
            assets,
            bounds: Bounds {
                width: width as f32,
                height: height as f32,
            },
            registry: EntityRegistry::new(),
            state: GameState::Playing,
            start_ms: now,
            final_score: 0,
            sounds: Vec::new(),
        };
        world.reset(now, rng);
        Ok(world)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn rotation(&self) -> &RotationCache {
        &self.rotation
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Live score while playing; the frozen final score on end screens.
    pub fn score(&self, now: u64) -> u32 {
        match self.state {
            GameState::Playing => self.live_score(now),
            GameState::GameOver | GameState::Win => self.final_score,
        }
    }

    fn live_score(&self, now: u64) -> u32 {
        (now.saturating_sub(self.start_ms) / self.config.score_divisor_ms.max(1)) as u32
    }

    /// Sound effects produced since the last drain.
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Clear everything and start a fresh run at `now`.
    pub fn reset(&mut self, now: u64, rng: &mut impl Rng) {
        self.registry.clear();
        for _ in 0..self.config.star_count {
            let star = Star::random(&self.assets, self.bounds, rng);
            self.registry.insert(Entity::Star(star));
        }
        let player = Player::new(&self.assets, self.bounds.center(), self.config.player_speed);
        self.registry.insert(Entity::Player(player));
        self.state = GameState::Playing;
        self.start_ms = now;
        self.final_score = 0;
        self.sounds.clear();
        tracing::info!(now, stars = self.config.star_count, "run started");
    }

    /// Apply one discrete event. Events that make no sense in the current
    /// state are ignored.
    pub fn handle_event(&mut self, event: GameEvent, now: u64, rng: &mut impl Rng) -> Flow {
        match (event, self.state) {
            (GameEvent::Close, _) => return Flow::Quit,
            (GameEvent::Quit, GameState::GameOver | GameState::Win) => return Flow::Quit,
            (GameEvent::Restart, GameState::GameOver | GameState::Win) => self.reset(now, rng),
            (GameEvent::SpawnMeteor, GameState::Playing) => {
                self.spawn_meteor(now, rng);
            }
            (event, state) => tracing::trace!(?event, ?state, "event ignored"),
        }
        Flow::Continue
    }

    /// Spawn a random meteor above the window, unless the cap is reached.
    pub fn spawn_meteor(&mut self, now: u64, rng: &mut impl Rng) -> Option<EntityId> {
        if self.state != GameState::Playing || self.at_meteor_cap() {
            return None;
        }
        let meteor = Meteor::random(self.bounds, now, rng, self.meteor_source());
        Some(self.insert_meteor(meteor))
    }

    /// Spawn a meteor at an exact spot. Same gating as [`Self::spawn_meteor`].
    pub fn spawn_meteor_at(
        &mut self,
        center: Vec2,
        direction: Vec2,
        speed: f32,
        rotation_speed: f32,
        now: u64,
    ) -> Option<EntityId> {
        if self.state != GameState::Playing || self.at_meteor_cap() {
            return None;
        }
        let meteor = Meteor::new(
            center,
            direction,
            speed,
            rotation_speed,
            now,
            self.meteor_source(),
        );
        Some(self.insert_meteor(meteor))
    }

    fn at_meteor_cap(&self) -> bool {
        self.registry.meteor_count() >= self.config.meteor_cap
    }

    fn meteor_source(&mut self) -> MeteorSource<'_> {
        MeteorSource {
            assets: &self.assets,
            config: &self.config,
            rotation: &mut self.rotation,
        }
    }

    fn insert_meteor(&mut self, meteor: Meteor) -> EntityId {
        let center = meteor.rect.center();
        let id = self.registry.insert(Entity::Meteor(meteor));
        tracing::trace!(x = center.x, y = center.y, "meteor spawned");
        id
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Advance the simulation by one frame.
    pub fn tick(&mut self, now: u64, dt: f32, input: &InputState) {
        let mut spawns = Vec::new();
        {
            let mut ctx = FrameContext {
                dt,
                now,
                state: self.state,
                input,
                bounds: self.bounds,
                config: &self.config,
                assets: &self.assets,
                rotation: &mut self.rotation,
                spawns: &mut spawns,
                sounds: &mut self.sounds,
            };
            self.registry.update_all(|entity| entity.update(&mut ctx));
        }
        for entity in spawns {
            self.registry.insert(entity);
        }

        if self.state == GameState::Playing {
            self.check_collisions(now);
        }
        if self.state == GameState::Playing && self.live_score(now) >= self.config.win_score {
            self.win(now);
        }
        self.registry.compact();
    }

    /// Player pass first, then lasers; the laser pass runs even when the
    /// player was just hit.
    fn check_collisions(&mut self, now: u64) {
        let crashed = collision::resolve_player_hits(&mut self.registry);
        if !crashed.is_empty() {
            tracing::debug!(meteors = crashed.len(), "player hit");
            self.game_over(now);
        }

        for hit in collision::resolve_laser_hits(&mut self.registry) {
            tracing::debug!(x = hit.impact.x, y = hit.impact.y, "meteor destroyed");
            let explosion = Explosion::new(
                &self.assets,
                hit.impact,
                self.config.explosion_frame_rate,
            );
            self.registry.insert(Entity::Explosion(explosion));
            self.sounds.push(SoundEffect::Explosion);
        }
    }

    fn game_over(&mut self, now: u64) {
        self.final_score = self.live_score(now);
        self.state = GameState::GameOver;
        self.sounds.push(SoundEffect::Damage);
        tracing::info!(score = self.final_score, "game over");
    }

    fn win(&mut self, now: u64) {
        self.final_score = self.live_score(now);
        self.state = GameState::Win;
        tracing::info!(score = self.final_score, "player won");
    }
}
