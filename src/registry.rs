//! Arena storage for live entities.
//!
//! Entities live in insertion order in a single slot vector. Removal only
//! marks a slot dead, so it is safe in the middle of an update pass; dead
//! slots are skipped by every view and dropped by [`EntityRegistry::compact`]
//! at the end of the frame. Ids grow monotonically, which keeps the slot
//! vector sorted by id and lets lookups binary-search it.

use crate::entities::{Entity, EntityKind, Lifecycle, Meteor, Player};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

#[derive(Debug)]
struct Slot {
    id: EntityId,
    alive: bool,
    entity: Entity,
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    meteors: Vec<EntityId>,
    lasers: Vec<EntityId>,
    player: Option<EntityId>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to every view it belongs to. Inserting a player retires
    /// the previous one.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        match entity.kind() {
            EntityKind::Meteor => self.meteors.push(id),
            EntityKind::Laser => self.lasers.push(id),
            EntityKind::Player => {
                if let Some(old) = self.player.take() {
                    self.remove(old);
                }
                self.player = Some(id);
            }
            EntityKind::Star | EntityKind::Explosion => {}
        }
        self.slots.push(Slot {
            id,
            alive: true,
            entity,
        });
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |s| s.id).ok()
    }

    fn live_index(&self, id: EntityId) -> Option<usize> {
        self.index_of(id).filter(|&i| self.slots[i].alive)
    }

    fn kill(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.alive = false;
        if self.player == Some(slot.id) {
            self.player = None;
        }
    }

    /// Mark an entity dead in every view. Returns false if it was not alive.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.live_index(id) {
            Some(i) => {
                self.kill(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.live_index(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.live_index(id).map(|i| &self.slots[i].entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let i = self.live_index(id)?;
        Some(&mut self.slots[i].entity)
    }

    /// Live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.slots.iter().filter(|s| s.alive).map(|s| &s.entity)
    }

    /// Live meteor ids in insertion order.
    pub fn meteor_ids(&self) -> Vec<EntityId> {
        self.live(&self.meteors)
    }

    /// Live laser ids in insertion order.
    pub fn laser_ids(&self) -> Vec<EntityId> {
        self.live(&self.lasers)
    }

    fn live(&self, view: &[EntityId]) -> Vec<EntityId> {
        view.iter().copied().filter(|id| self.contains(*id)).collect()
    }

    pub fn meteor_count(&self) -> usize {
        self.meteors.iter().filter(|id| self.contains(**id)).count()
    }

    pub fn laser_count(&self) -> usize {
        self.lasers.iter().filter(|id| self.contains(**id)).count()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.iter().filter(|e| e.kind() == kind).count()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Player> {
        self.get(self.player?)?.as_player()
    }

    pub fn meteor(&self, id: EntityId) -> Option<&Meteor> {
        self.get(id)?.as_meteor()
    }

    /// Run `f` once on every entity alive when the pass starts, in insertion
    /// order. Entities asking for removal are marked dead immediately, so an
    /// entity removed earlier in the pass is never visited.
    pub fn update_all(&mut self, mut f: impl FnMut(&mut Entity) -> Lifecycle) -> usize {
        let end = self.slots.len();
        let mut removed = 0;
        for i in 0..end {
            if !self.slots[i].alive {
                continue;
            }
            if f(&mut self.slots[i].entity) == Lifecycle::Remove {
                self.kill(i);
                removed += 1;
            }
        }
        removed
    }

    /// Drop dead slots and stale view entries.
    pub fn compact(&mut self) {
        self.slots.retain(|s| s.alive);
        let slots = &self.slots;
        let live = |id: &EntityId| slots.binary_search_by_key(id, |s| s.id).is_ok();
        self.meteors.retain(live);
        self.lasers.retain(live);
    }

    /// Forget every entity. Ids keep growing so stale ids never match again.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.meteors.clear();
        self.lasers.clear();
        self.player = None;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::assets::Assets;
    use crate::entities::{Laser, Star};

    fn assets() -> Assets {
        Assets::builtin().unwrap()
    }

    #[test]
    fn insert_populates_views() {
        let a = assets();
        let mut reg = EntityRegistry::new();
        reg.insert(Entity::Star(Star::new(&a, Vec2::ZERO)));
        let laser = reg.insert(Entity::Laser(Laser::new(&a, Vec2::new(5.0, 5.0), 10.0)));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.laser_ids(), vec![laser]);
        assert_eq!(reg.meteor_count(), 0);
    }

    #[test]
    fn removed_entity_leaves_all_views() {
        let a = assets();
        let mut reg = EntityRegistry::new();
        let laser = reg.insert(Entity::Laser(Laser::new(&a, Vec2::new(5.0, 5.0), 10.0)));
        assert!(reg.remove(laser));
        assert!(!reg.remove(laser));
        assert!(reg.get(laser).is_none());
        assert_eq!(reg.laser_count(), 0);
        assert_eq!(reg.iter().count(), 0);
        reg.compact();
        assert!(reg.is_empty());
    }

    #[test]
    fn second_player_replaces_first() {
        let a = assets();
        let mut reg = EntityRegistry::new();
        let first = reg.insert(Entity::Player(Player::new(&a, Vec2::ZERO, 1.0)));
        let second = reg.insert(Entity::Player(Player::new(&a, Vec2::ONE, 1.0)));
        assert!(!reg.contains(first));
        assert_eq!(reg.player_id(), Some(second));
        assert_eq!(reg.count(EntityKind::Player), 1);
    }

    #[test]
    fn removal_during_pass_skips_dead_and_keeps_order() {
        let a = assets();
        let mut reg = EntityRegistry::new();
        for x in 0..5 {
            reg.insert(Entity::Star(Star::new(&a, Vec2::new(x as f32, 0.0))));
        }
        let mut seen = Vec::new();
        let removed = reg.update_all(|e| {
            let x = e.position().x.round() as i32;
            seen.push(x);
            if x % 2 == 0 {
                Lifecycle::Remove
            } else {
                Lifecycle::Alive
            }
        });
        assert_eq!(removed, 3);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        reg.compact();
        let left: Vec<i32> = reg.iter().map(|e| e.position().x.round() as i32).collect();
        assert_eq!(left, vec![1, 3]);
    }

    #[test]
    fn ids_survive_compaction() {
        let a = assets();
        let mut reg = EntityRegistry::new();
        let first = reg.insert(Entity::Laser(Laser::new(&a, Vec2::new(1.0, 9.0), 1.0)));
        let second = reg.insert(Entity::Laser(Laser::new(&a, Vec2::new(2.0, 9.0), 1.0)));
        reg.remove(first);
        reg.compact();
        assert!(reg.contains(second));
        assert_eq!(reg.laser_ids(), vec![second]);
    }
}
