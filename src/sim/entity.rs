//! Sprites and fixed-capacity entity pools

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::to_cell;

/// Where inactive sprites are parked (off the playfield)
pub const PARKED: Vec2 = Vec2::new(-1.0, -1.0);

/// Anything drawn on the playfield: actors, cheese, traps, fireworks, the door
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed bounding size (1x1 for terminal cells)
    pub size: Vec2,
    pub visible: bool,
}

impl Sprite {
    /// An inactive sprite parked off-screen
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: PARKED,
            vel: Vec2::ZERO,
            size,
            visible: false,
        }
    }

    /// A visible sprite at a position with a velocity
    pub fn actor(pos: Vec2, vel: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel,
            size,
            visible: true,
        }
    }

    /// Integer cell of the top-left corner
    #[inline]
    pub fn cell(&self) -> IVec2 {
        to_cell(self.pos)
    }

    /// Size in whole cells (never smaller than one)
    #[inline]
    pub fn cell_size(&self) -> IVec2 {
        self.size.round().as_ivec2().max(IVec2::ONE)
    }

    /// Cell under the middle of the sprite, used to drop things "at" an actor
    pub fn anchor(&self) -> Vec2 {
        (self.pos + (self.size * 0.5).floor()).round()
    }

    /// Make the sprite visible at a position
    pub fn show_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.visible = true;
    }

    /// Hide and park the sprite
    pub fn park(&mut self) {
        self.pos = PARKED;
        self.vel = Vec2::ZERO;
        self.visible = false;
    }

    /// Move by the current velocity scaled by `factor`
    #[inline]
    pub fn advance(&mut self, factor: f32) {
        self.pos += self.vel * factor;
    }
}

/// Fixed-capacity pool of anonymous sprite slots
///
/// Allocation takes the first inactive slot; when every slot is active the
/// request is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    slots: Vec<Sprite>,
}

impl Pool {
    pub fn new(capacity: usize, size: Vec2) -> Self {
        Self {
            slots: vec![Sprite::new(size); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.visible).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.visible)
    }

    /// Activate the first free slot at `pos`; `None` when the pool is full
    pub fn spawn(&mut self, pos: Vec2) -> Option<usize> {
        let index = self.slots.iter().position(|s| !s.visible)?;
        let slot = &mut self.slots[index];
        slot.vel = Vec2::ZERO;
        slot.show_at(pos);
        Some(index)
    }

    /// Free a slot for reuse
    pub fn despawn(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.park();
        }
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.park();
        }
    }

    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.slots.get(index)
    }

    /// All slots, active or not
    pub fn slots(&self) -> &[Sprite] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Sprite] {
        &mut self.slots
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Sprite> {
        self.slots.iter().filter(|s| s.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_takes_first_free_slot() {
        let mut pool = Pool::new(3, Vec2::ONE);
        assert_eq!(pool.spawn(Vec2::new(1.0, 1.0)), Some(0));
        assert_eq!(pool.spawn(Vec2::new(2.0, 2.0)), Some(1));

        pool.despawn(0);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.get(0).map(|s| s.pos), Some(PARKED));

        // Freed slot is reused before the untouched one
        assert_eq!(pool.spawn(Vec2::new(3.0, 3.0)), Some(0));
        assert_eq!(pool.spawn(Vec2::new(4.0, 4.0)), Some(2));
        assert!(pool.is_full());
    }

    #[test]
    fn test_full_pool_drops_request() {
        let mut pool = Pool::new(1, Vec2::ONE);
        assert!(pool.spawn(Vec2::ZERO).is_some());
        assert_eq!(pool.spawn(Vec2::ONE), None);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.get(0).map(|s| s.pos), Some(Vec2::ZERO));
    }

    #[test]
    fn test_clear_parks_everything() {
        let mut pool = Pool::new(4, Vec2::ONE);
        for i in 0..4 {
            pool.spawn(Vec2::splat(i as f32));
        }
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert!(pool.slots().iter().all(|s| s.pos == PARKED));
    }

    #[test]
    fn test_anchor_centres_large_sprites() {
        let tom = Sprite::actor(Vec2::new(10.0, 20.0), Vec2::ZERO, Vec2::new(6.0, 5.0));
        assert_eq!(tom.anchor(), Vec2::new(13.0, 22.0));

        let cell = Sprite::actor(Vec2::new(4.4, 7.6), Vec2::ZERO, Vec2::ONE);
        assert_eq!(cell.anchor(), Vec2::new(4.0, 8.0));
    }

    proptest! {
        #[test]
        fn prop_active_count_stays_in_bounds(
            capacity in 1usize..12,
            ops in proptest::collection::vec((any::<bool>(), 0usize..16), 0..64),
        ) {
            let mut pool = Pool::new(capacity, Vec2::ONE);
            for (spawn, index) in ops {
                if spawn {
                    pool.spawn(Vec2::ONE);
                } else {
                    pool.despawn(index);
                }
                prop_assert!(pool.active_count() <= pool.capacity());
            }
        }
    }
}
