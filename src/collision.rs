//! Collision passes over the registry.
//!
//! Both passes remove what they hit straight away, so a meteor consumed by
//! the player pass is invisible to the laser pass, and a meteor destroyed by
//! one laser cannot absorb a second laser in the same frame.

use glam::Vec2;

use crate::entities::Entity;
use crate::registry::{EntityId, EntityRegistry};

/// A laser that destroyed a meteor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaserHit {
    pub laser: EntityId,
    pub meteor: EntityId,
    /// Laser's top-centre at impact; explosions spawn here.
    pub impact: Vec2,
}

/// Remove every meteor whose mask overlaps the player's mask.
/// Returns the removed meteor ids.
pub fn resolve_player_hits(registry: &mut EntityRegistry) -> Vec<EntityId> {
    let Some(player) = registry.player() else {
        return Vec::new();
    };
    let origin = player.rect.pixel_origin();
    let player_mask = player.mask();

    let hits: Vec<EntityId> = registry
        .meteor_ids()
        .into_iter()
        .filter(|id| {
            registry.meteor(*id).is_some_and(|m| {
                let (mx, my) = m.rect.pixel_origin();
                player_mask.overlaps(m.mask(), (mx - origin.0, my - origin.1))
            })
        })
        .collect();

    for id in &hits {
        registry.remove(*id);
    }
    hits
}

/// For each laser, destroy it together with the first meteor whose bounding
/// box it overlaps.
pub fn resolve_laser_hits(registry: &mut EntityRegistry) -> Vec<LaserHit> {
    let mut hits = Vec::new();
    for laser_id in registry.laser_ids() {
        let Some(Entity::Laser(laser)) = registry.get(laser_id) else {
            continue;
        };
        let laser_rect = laser.rect;
        let target = registry.meteor_ids().into_iter().find(|id| {
            registry
                .meteor(*id)
                .is_some_and(|m| m.rect.overlaps(&laser_rect))
        });
        if let Some(meteor_id) = target {
            registry.remove(laser_id);
            registry.remove(meteor_id);
            hits.push(LaserHit {
                laser: laser_id,
                meteor: meteor_id,
                impact: laser_rect.midtop(),
            });
        }
    }
    hits
}
