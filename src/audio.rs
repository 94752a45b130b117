//! Sound effects.
//!
//! The world queues effects as they happen; the front end drains the queue
//! once per frame. On a terminal the only speaker is the bell: effects at or
//! above the configured threshold ring it, quieter ones are dropped. With the
//! default threshold the laser is silent; lowering it to `0.3` makes shots
//! audible too.

use std::io::Write;

use crossterm::{style::Print, QueueableCommand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEffect {
    Laser,
    Explosion,
    Damage,
}

impl SoundEffect {
    /// Playback volume in `0.0..=1.0`.
    pub fn volume(self) -> f32 {
        match self {
            SoundEffect::Laser => 0.3,
            SoundEffect::Explosion => 0.5,
            SoundEffect::Damage => 0.8,
        }
    }
}

/// Terminal bell player.
pub struct Audio {
    enabled: bool,
    /// Effects quieter than this are not played.
    threshold: f32,
}

impl Audio {
    pub fn new(enabled: bool, threshold: f32) -> Self {
        Self { enabled, threshold }
    }

    pub fn audible(&self, effect: SoundEffect) -> bool {
        self.enabled && effect.volume() >= self.threshold
    }

    /// Queue the bell for every audible effect (at most one ring per frame).
    pub fn play<W: Write>(&self, out: &mut W, effects: &[SoundEffect]) -> std::io::Result<()> {
        if effects.iter().any(|e| self.audible(*e)) {
            out.queue(Print('\x07'))?;
        }
        Ok(())
    }
}
