//! All game entity types and their per-frame behaviour.
//!
//! Every entity is a variant of [`Entity`]; the registry stores them in one
//! arena and dispatches `update` / `rect` / `sprite` through the enum.

use std::rc::Rc;

use glam::Vec2;
use rand::Rng;

use crate::assets::Assets;
use crate::audio::SoundEffect;
use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::input::InputState;
use crate::rotation::{RotatedFrame, RotationCache};
use crate::sprite::{Mask, Sprite};
use crate::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
    Win,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Star,
    Laser,
    Meteor,
    Explosion,
}

/// What an entity wants after its update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Alive,
    Remove,
}

/// Play-field size in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Everything an entity may read or produce during one update pass.
pub struct FrameContext<'a> {
    pub dt: f32,
    pub now: u64,
    pub state: GameState,
    pub input: &'a InputState,
    pub bounds: Bounds,
    pub config: &'a GameConfig,
    pub assets: &'a Assets,
    pub rotation: &'a mut RotationCache,
    /// Entities created during the pass; inserted once the pass is over.
    pub spawns: &'a mut Vec<Entity>,
    pub sounds: &'a mut Vec<SoundEffect>,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub direction: Vec2,
    pub speed: f32,
    /// Running shoot cooldown, `None` when the gun is ready.
    pub cooldown: Option<Timer>,
    /// Set once the win animation reaches the centre and starts the climb.
    pub boosting: bool,
    sprite: Rc<Sprite>,
    mask: Rc<Mask>,
}

impl Player {
    pub fn new(assets: &Assets, center: Vec2, speed: f32) -> Self {
        let sprite = Rc::clone(&assets.player);
        Self {
            rect: Rect::from_center(center, sprite.width() as f32, sprite.height() as f32),
            direction: Vec2::ZERO,
            speed,
            cooldown: None,
            boosting: false,
            mask: Rc::clone(&assets.player_mask),
            sprite,
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// True when no cooldown is running (an expired one is cleared first).
    pub fn can_shoot(&mut self, now: u64) -> bool {
        if self.cooldown.is_some_and(|t| t.expired(now)) {
            self.cooldown = None;
        }
        self.cooldown.is_none()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Lifecycle {
        match ctx.state {
            GameState::Playing => {
                self.steer(ctx);
                if ctx.input.shoot && self.can_shoot(ctx.now) {
                    self.shoot(ctx);
                }
            }
            GameState::Win => self.fly_out(ctx),
            GameState::GameOver => {}
        }
        Lifecycle::Alive
    }

    fn steer(&mut self, ctx: &FrameContext<'_>) {
        let input = ctx.input;
        let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
        self.direction = Vec2::new(
            axis(input.right, input.left),
            axis(input.down, input.up),
        )
        .normalize_or_zero();

        let center = self.rect.center() + self.direction * self.speed * ctx.dt;
        self.rect = Rect::from_center(center, self.rect.w, self.rect.h);
        self.rect.clamp_within(ctx.bounds.width, ctx.bounds.height);
    }

    fn shoot(&mut self, ctx: &mut FrameContext<'_>) {
        let laser = Laser::new(ctx.assets, self.rect.midtop(), ctx.config.laser_speed);
        ctx.spawns.push(Entity::Laser(laser));
        ctx.sounds.push(SoundEffect::Laser);
        self.cooldown = Some(Timer::start(ctx.now, ctx.config.shoot_cooldown_ms));
    }

    /// Win animation: glide to the centre, then climb off the top.
    fn fly_out(&mut self, ctx: &FrameContext<'_>) {
        if self.boosting {
            self.direction = Vec2::NEG_Y;
            self.rect.y -= ctx.config.win_boost_speed * ctx.dt;
            return;
        }
        let to_center = ctx.bounds.center() - self.rect.center();
        let distance = to_center.length();
        if distance <= ctx.config.win_center_epsilon {
            self.boosting = true;
            return;
        }
        self.direction = to_center / distance;
        let step = (ctx.config.win_approach_speed * ctx.dt).min(distance);
        let center = self.rect.center() + self.direction * step;
        self.rect = Rect::from_center(center, self.rect.w, self.rect.h);
    }
}

// ── Star ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Star {
    pub rect: Rect,
    sprite: Rc<Sprite>,
}

impl Star {
    pub fn new(assets: &Assets, center: Vec2) -> Self {
        let sprite = Rc::clone(&assets.star);
        Self {
            rect: Rect::from_center(center, sprite.width() as f32, sprite.height() as f32),
            sprite,
        }
    }

    /// A star somewhere on the play field.
    pub fn random(assets: &Assets, bounds: Bounds, rng: &mut impl Rng) -> Self {
        let center = Vec2::new(
            rng.gen_range(0.0..=bounds.width),
            rng.gen_range(0.0..=bounds.height),
        );
        Self::new(assets, center)
    }
}

// ── Laser ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Laser {
    pub rect: Rect,
    pub speed: f32,
    sprite: Rc<Sprite>,
}

impl Laser {
    /// A laser whose bottom edge sits on `midbottom`.
    pub fn new(assets: &Assets, midbottom: Vec2, speed: f32) -> Self {
        let sprite = Rc::clone(&assets.laser);
        Self {
            rect: Rect::from_midbottom(midbottom, sprite.width() as f32, sprite.height() as f32),
            speed,
            sprite,
        }
    }

    fn update(&mut self, ctx: &FrameContext<'_>) -> Lifecycle {
        self.rect.y -= self.speed * ctx.dt;
        if self.rect.bottom() < 0.0 {
            Lifecycle::Remove
        } else {
            Lifecycle::Alive
        }
    }
}

// ── Meteor ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Meteor {
    pub rect: Rect,
    pub direction: Vec2,
    pub speed: f32,
    /// Degrees in `[0, 360)`.
    pub angle: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub lifetime: Timer,
    frame: Rc<RotatedFrame>,
}

impl Meteor {
    pub fn new(
        center: Vec2,
        direction: Vec2,
        speed: f32,
        rotation_speed: f32,
        now: u64,
        source: MeteorSource<'_>,
    ) -> Self {
        let MeteorSource {
            assets,
            config,
            rotation,
        } = source;
        let frame = rotation.get_frame(&assets.meteor, 0.0);
        let rect = Rect::from_center(
            center,
            frame.sprite.width() as f32,
            frame.sprite.height() as f32,
        );
        Self {
            rect,
            direction: direction.normalize_or_zero(),
            speed,
            angle: 0.0,
            rotation_speed,
            lifetime: Timer::start(now, config.meteor_lifetime_ms),
            frame,
        }
    }

    /// A meteor just above the visible window, heading down with some drift.
    pub fn random(
        bounds: Bounds,
        now: u64,
        rng: &mut impl Rng,
        source: MeteorSource<'_>,
    ) -> Self {
        let config = source.config;
        let height = source.assets.meteor.height() as f32;
        let center = Vec2::new(
            rng.gen_range(0.0..=bounds.width),
            rng.gen_range(-3.0 * height..=-height),
        );
        let drift = if config.meteor_drift > 0.0 {
            rng.gen_range(-config.meteor_drift..=config.meteor_drift)
        } else {
            0.0
        };
        let speed = rng.gen_range(config.meteor_speed_min..=config.meteor_speed_max);
        let rotation_speed =
            rng.gen_range(config.meteor_rotation_speed_min..=config.meteor_rotation_speed_max);
        Self::new(
            center,
            Vec2::new(drift, 1.0),
            speed,
            rotation_speed,
            now,
            source,
        )
    }

    pub fn mask(&self) -> &Mask {
        &self.frame.mask
    }

    /// Milliseconds since the meteor was created.
    pub fn age(&self, now: u64) -> u64 {
        self.lifetime.elapsed(now)
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Lifecycle {
        if ctx.state != GameState::Playing {
            return Lifecycle::Alive;
        }
        if self.lifetime.expired(ctx.now) {
            return Lifecycle::Remove;
        }
        let center = self.rect.center() + self.direction * self.speed * ctx.dt;
        self.angle = (self.angle + self.rotation_speed * ctx.dt).rem_euclid(360.0);
        self.frame = ctx.rotation.get_frame(&ctx.assets.meteor, self.angle);
        self.rect = Rect::from_center(
            center,
            self.frame.sprite.width() as f32,
            self.frame.sprite.height() as f32,
        );
        Lifecycle::Alive
    }
}

/// Shared inputs for building a meteor.
pub struct MeteorSource<'a> {
    pub assets: &'a Assets,
    pub config: &'a GameConfig,
    pub rotation: &'a mut RotationCache,
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Explosion {
    pub center: Vec2,
    /// Fractional index into `frames`.
    pub frame_index: f32,
    /// Frames per second.
    pub rate: f32,
    frames: Rc<[Sprite]>,
}

impl Explosion {
    pub fn new(assets: &Assets, center: Vec2, rate: f32) -> Self {
        Self {
            center,
            frame_index: 0.0,
            rate,
            frames: Rc::clone(&assets.explosion),
        }
    }

    pub fn current_frame(&self) -> Option<&Sprite> {
        self.frames.get(self.frame_index as usize)
    }

    fn update(&mut self, ctx: &FrameContext<'_>) -> Lifecycle {
        self.frame_index += self.rate * ctx.dt;
        if self.frame_index as usize >= self.frames.len() {
            Lifecycle::Remove
        } else {
            Lifecycle::Alive
        }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum Entity {
    Player(Player),
    Star(Star),
    Laser(Laser),
    Meteor(Meteor),
    Explosion(Explosion),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::Player,
            Entity::Star(_) => EntityKind::Star,
            Entity::Laser(_) => EntityKind::Laser,
            Entity::Meteor(_) => EntityKind::Meteor,
            Entity::Explosion(_) => EntityKind::Explosion,
        }
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> Lifecycle {
        match self {
            Entity::Player(p) => p.update(ctx),
            Entity::Star(_) => Lifecycle::Alive,
            Entity::Laser(l) => l.update(ctx),
            Entity::Meteor(m) => m.update(ctx),
            Entity::Explosion(e) => e.update(ctx),
        }
    }

    /// Screen-space bounds of the current image.
    pub fn rect(&self) -> Rect {
        match self {
            Entity::Player(p) => p.rect,
            Entity::Star(s) => s.rect,
            Entity::Laser(l) => l.rect,
            Entity::Meteor(m) => m.rect,
            Entity::Explosion(e) => {
                let (w, h) = e
                    .current_frame()
                    .map(|s| (s.width() as f32, s.height() as f32))
                    .unwrap_or((0.0, 0.0));
                Rect::from_center(e.center, w, h)
            }
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Entity::Explosion(e) => e.center,
            other => other.rect().center(),
        }
    }

    /// Image to blit this frame, if any.
    pub fn sprite(&self) -> Option<&Sprite> {
        match self {
            Entity::Player(p) => Some(&*p.sprite),
            Entity::Star(s) => Some(&*s.sprite),
            Entity::Laser(l) => Some(&*l.sprite),
            Entity::Meteor(m) => Some(&m.frame.sprite),
            Entity::Explosion(e) => e.current_frame(),
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_meteor(&self) -> Option<&Meteor> {
        match self {
            Entity::Meteor(m) => Some(m),
            _ => None,
        }
    }
}
