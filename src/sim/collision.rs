//! Contact tests, wall classification and the per-tick collision response
//!
//! Two contact models coexist: coarse terminal cells collide on equal rounded
//! coordinates, LCD sprites collide on overlapping bounding boxes.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::Sprite;
use super::playfield::Playfield;
use super::spawner::reveal_door;
use super::state::{GameEvent, GameState};
use super::tick::Direction;

/// How two sprites are tested for contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactModel {
    /// Rounded integer positions must be equal
    Point,
    /// Axis-aligned rectangles overlap, edges inclusive
    BoundingBox,
}

impl ContactModel {
    /// Do two visible sprites touch under this model
    #[inline]
    pub fn collides(self, a: &Sprite, b: &Sprite) -> bool {
        match self {
            ContactModel::Point => point_collision(a, b),
            ContactModel::BoundingBox => box_collision(a, b),
        }
    }
}

/// Point-equality contact: both visible and on the same cell
pub fn point_collision(a: &Sprite, b: &Sprite) -> bool {
    a.visible && b.visible && a.cell() == b.cell()
}

/// Bounding-box contact: both visible and the rectangles overlap (edges count)
pub fn box_collision(a: &Sprite, b: &Sprite) -> bool {
    a.visible
        && b.visible
        && a.pos.x + a.size.x >= b.pos.x
        && a.pos.x <= b.pos.x + b.size.x
        && a.pos.y + a.size.y >= b.pos.y
        && a.pos.y <= b.pos.y + b.size.y
}

/// Which side of the playfield (or a wall) a sprite is touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallContact {
    NoCollision,
    Left,
    Right,
    Top,
    Bottom,
}

impl WallContact {
    /// Priority order used by [`classify_wall`]
    pub const PRIORITY: [WallContact; 4] = [
        WallContact::Left,
        WallContact::Right,
        WallContact::Top,
        WallContact::Bottom,
    ];

    #[inline]
    pub fn is_contact(self) -> bool {
        self != WallContact::NoCollision
    }

    /// Side a movement direction runs into
    pub fn facing(dir: Direction) -> Self {
        match dir {
            Direction::Left => WallContact::Left,
            Direction::Right => WallContact::Right,
            Direction::Up => WallContact::Top,
            Direction::Down => WallContact::Bottom,
        }
    }
}

/// Is the sprite touching the given side, either the playfield edge or a wall
/// in the strip just outside its rectangle
pub fn touches(sprite: &Sprite, side: WallContact, field: &Playfield) -> bool {
    let pos = sprite.pos.round();
    let origin = sprite.cell();
    let size = sprite.cell_size();

    match side {
        WallContact::NoCollision => false,
        WallContact::Left => {
            pos.x < 1.0 || field.any_wall(IVec2::new(origin.x - 1, origin.y), IVec2::new(1, size.y))
        }
        WallContact::Right => {
            pos.x + sprite.size.x >= field.width as f32
                || field.any_wall(IVec2::new(origin.x + size.x, origin.y), IVec2::new(1, size.y))
        }
        WallContact::Top => {
            pos.y <= field.top as f32
                || field.any_wall(IVec2::new(origin.x, origin.y - 1), IVec2::new(size.x, 1))
        }
        WallContact::Bottom => {
            pos.y + sprite.size.y >= field.height as f32
                || field.any_wall(IVec2::new(origin.x, origin.y + size.y), IVec2::new(size.x, 1))
        }
    }
}

/// Classify a sprite's wall contact
///
/// Sides are tested left, right, top, bottom; the first one touching wins, so
/// a corner always reports its horizontal wall.
pub fn classify_wall(sprite: &Sprite, field: &Playfield) -> WallContact {
    WallContact::PRIORITY
        .into_iter()
        .find(|&side| touches(sprite, side, field))
        .unwrap_or(WallContact::NoCollision)
}

/// Run every collision check for the tick in fixed order
///
/// Each check is independent; all matches in a pool are resolved in the same
/// tick. The door opens right after the cheese that completes the quota.
pub fn resolve_collisions(state: &mut GameState) {
    caught_collision(state);
    trap_collisions(state);
    cheese_collisions(state);
    reveal_door(state);
    door_collision(state);
    firework_boundary_collisions(state);
    firework_hit_collisions(state);
}

/// Tom catches Jerry: lose a life and send both back to their spawns
fn caught_collision(state: &mut GameState) {
    if state.profile.contact.collides(&state.tom, &state.jerry) {
        state.session.lives = state.session.lives.saturating_sub(1);
        state.reset_actors();
        state.events.push(GameEvent::Caught);
    }
}

fn trap_collisions(state: &mut GameState) {
    let contact = state.profile.contact;
    for trap in state.traps.slots_mut() {
        if contact.collides(&state.jerry, trap) {
            trap.park();
            state.session.lives = state.session.lives.saturating_sub(1);
            state.events.push(GameEvent::TrapSprung);
        }
    }
}

fn cheese_collisions(state: &mut GameState) {
    let contact = state.profile.contact;
    for cheese in state.cheese.slots_mut() {
        if contact.collides(&state.jerry, cheese) {
            cheese.park();
            state.session.score += 1;
            state.session.collected += 1;
            state.events.push(GameEvent::CheeseCollected);
        }
    }
}

fn door_collision(state: &mut GameState) {
    if state.profile.contact.collides(&state.jerry, &state.door) {
        state.next_level();
    }
}

/// Fireworks burn out on any wall or edge contact
fn firework_boundary_collisions(state: &mut GameState) {
    for firework in state.fireworks.slots_mut() {
        if firework.visible && classify_wall(firework, &state.playfield).is_contact() {
            firework.park();
        }
    }
}

/// A firework reaching Tom sends him back to his spawn
fn firework_hit_collisions(state: &mut GameState) {
    let contact = state.profile.contact;
    let mut hits = 0;
    for firework in state.fireworks.slots_mut() {
        if contact.collides(firework, &state.tom) {
            firework.park();
            hits += 1;
        }
    }

    if hits > 0 {
        state.tom.pos = state.current_level().tom_spawn;
        state.session.score += state.profile.firework_bounty * hits;
        state.events.push(GameEvent::TomHit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn cell(x: f32, y: f32) -> Sprite {
        Sprite::actor(Vec2::new(x, y), Vec2::ZERO, Vec2::ONE)
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Sprite {
        Sprite::actor(Vec2::new(x, y), Vec2::ZERO, Vec2::new(w, h))
    }

    #[test]
    fn test_point_collision_rounds() {
        assert!(point_collision(&cell(3.4, 5.0), &cell(2.6, 4.8)));
        assert!(!point_collision(&cell(3.4, 5.0), &cell(3.6, 5.0)));
    }

    #[test]
    fn test_hidden_sprites_never_collide() {
        let mut hidden = cell(3.0, 3.0);
        hidden.visible = false;
        assert!(!point_collision(&hidden, &hidden));
        assert!(!box_collision(&hidden, &cell(3.0, 3.0)));
    }

    #[test]
    fn test_box_collision_inclusive_edges() {
        let a = rect(0.0, 0.0, 6.0, 5.0);
        assert!(box_collision(&a, &rect(6.0, 5.0, 3.0, 3.0)));
        assert!(!box_collision(&a, &rect(6.5, 0.0, 3.0, 3.0)));
        assert!(box_collision(&rect(-2.0, 1.0, 3.0, 6.0), &a));
    }

    #[test]
    fn test_classify_open_centre() {
        let field = Playfield::new(40, 20, 4);
        assert_eq!(classify_wall(&cell(20.0, 10.0), &field), WallContact::NoCollision);
    }

    #[test]
    fn test_classify_each_edge() {
        let field = Playfield::new(40, 20, 4);
        assert_eq!(classify_wall(&cell(0.0, 10.0), &field), WallContact::Left);
        assert_eq!(classify_wall(&cell(39.0, 10.0), &field), WallContact::Right);
        assert_eq!(classify_wall(&cell(20.0, 4.0), &field), WallContact::Top);
        assert_eq!(classify_wall(&cell(20.0, 19.0), &field), WallContact::Bottom);
    }

    #[test]
    fn test_corner_attributed_to_horizontal_wall() {
        let field = Playfield::new(40, 20, 4);
        let corner = cell(0.0, 4.0);
        assert!(touches(&corner, WallContact::Top, &field));
        assert_eq!(classify_wall(&corner, &field), WallContact::Left);

        let corner = cell(39.0, 19.0);
        assert_eq!(classify_wall(&corner, &field), WallContact::Right);
    }

    #[test]
    fn test_classify_interior_wall_neighbours() {
        use super::super::level::WallSegment;

        let mut field = Playfield::new(40, 20, 4);
        field.add_wall(&WallSegment {
            from: IVec2::new(10, 5),
            to: IVec2::new(10, 15),
        });
        assert_eq!(classify_wall(&cell(11.0, 10.0), &field), WallContact::Left);
        assert_eq!(classify_wall(&cell(9.0, 10.0), &field), WallContact::Right);
        assert_eq!(classify_wall(&cell(10.0, 16.0), &field), WallContact::Top);
        assert_eq!(classify_wall(&cell(10.0, 4.0), &field), WallContact::Top);
        assert_eq!(classify_wall(&cell(12.0, 10.0), &field), WallContact::NoCollision);
    }

    #[test]
    fn test_box_sprite_touches_wall_along_its_edge() {
        use super::super::level::WallSegment;

        let mut field = Playfield::new(84, 48, 9);
        field.add_wall(&WallSegment {
            from: IVec2::new(30, 20),
            to: IVec2::new(30, 30),
        });
        // 6x5 sprite whose right edge strip (x = 30) overlaps the wall
        let tom = rect(24.0, 18.0, 6.0, 5.0);
        assert_eq!(classify_wall(&tom, &field), WallContact::Right);
        // Right screen edge for a wide sprite
        assert_eq!(classify_wall(&rect(78.0, 20.0, 6.0, 5.0), &field), WallContact::Right);
        assert_eq!(classify_wall(&rect(40.0, 43.0, 6.0, 5.0), &field), WallContact::Bottom);
    }

    proptest! {
        #[test]
        fn prop_point_collision_symmetric(
            ax in -5.0f32..50.0, ay in -5.0f32..50.0,
            bx in -5.0f32..50.0, by in -5.0f32..50.0,
        ) {
            let a = cell(ax, ay);
            let b = cell(bx, by);
            prop_assert_eq!(point_collision(&a, &b), point_collision(&b, &a));
            prop_assert!(point_collision(&a, &a));
        }

        #[test]
        fn prop_disjoint_boxes_never_collide(
            ax in 0.0f32..80.0, ay in 0.0f32..40.0,
            w in 1.0f32..8.0, h in 1.0f32..8.0,
            gap in 0.01f32..20.0, offset in -20.0f32..20.0,
            horizontal in any::<bool>(),
        ) {
            let a = rect(ax, ay, w, h);
            let b = if horizontal {
                rect(ax + w + gap, ay + offset, w, h)
            } else {
                rect(ax + offset, ay + h + gap, w, h)
            };
            prop_assert!(!box_collision(&a, &b));
            prop_assert!(!box_collision(&b, &a));
        }

        #[test]
        fn prop_left_beats_top(y in 0i32..5) {
            let field = Playfield::new(40, 20, 4);
            let sprite = cell(0.0, y as f32);
            prop_assert_eq!(classify_wall(&sprite, &field), WallContact::Left);
        }
    }
}
