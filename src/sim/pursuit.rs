//! Steering for the automatically moved actor and for fireworks
//!
//! Tom homes in on Jerry (or Jerry flees Tom) inside a fixed radius; on any
//! wall contact the automatic actor picks a random heading back into the room.

use glam::Vec2;
use rand::Rng;

use super::collision::{WallContact, classify_wall};
use super::entity::Sprite;
use super::playfield::Playfield;
use crate::heading;

/// Steer `actor` along `(target - actor) * fraction / distance` when the
/// target is within `radius`
///
/// A negative fraction steers away. Returns whether the velocity changed.
pub fn steer(actor: &mut Sprite, target: Vec2, radius: f32, fraction: f32) -> bool {
    let offset = target - actor.pos;
    let distance = offset.length();
    if distance > radius || distance <= f32::EPSILON {
        return false;
    }
    actor.vel = offset * fraction / distance;
    true
}

/// Tom heads for Jerry
#[inline]
pub fn chase(tom: &mut Sprite, jerry: Vec2, radius: f32, speed: f32) -> bool {
    steer(tom, jerry, radius, speed)
}

/// Jerry runs from Tom
#[inline]
pub fn evade(jerry: &mut Sprite, tom: Vec2, radius: f32, speed: f32) -> bool {
    steer(jerry, tom, radius, -speed)
}

/// Re-aim a firework at its target and move it one step
pub fn seek(firework: &mut Sprite, target: Vec2, speed: f32) {
    let offset = target - firework.pos;
    let distance = offset.length();
    if distance > f32::EPSILON {
        firework.vel = offset * speed / distance;
    }
    firework.advance(1.0);
}

/// Centre of the arc of headings (degrees) that lead away from a wall
fn escape_angle(contact: WallContact) -> Option<f32> {
    match contact {
        WallContact::NoCollision => None,
        WallContact::Left => Some(0.0),
        WallContact::Right => Some(180.0),
        WallContact::Top => Some(270.0),
        WallContact::Bottom => Some(90.0),
    }
}

/// New velocity after bouncing off `contact`
///
/// The heading is drawn uniformly from `spread` degrees either side of the
/// direction pointing straight back into the room, keeping the current speed
/// unless `max_speed` asks for a fresh random one.
///
/// The incoming heading is discarded rather than rotated: a random rotation
/// of it can still point into the wall just hit, a heading drawn around the
/// inward normal never does.
pub fn bounce<R: Rng + ?Sized>(
    vel: Vec2,
    contact: WallContact,
    spread: f32,
    max_speed: Option<f32>,
    rng: &mut R,
) -> Vec2 {
    let Some(centre) = escape_angle(contact) else {
        return vel;
    };
    let speed = match max_speed {
        Some(max) if max > 0.0 => rng.random_range(0.0..max),
        _ => vel.length(),
    };
    let angle = if spread > 0.0 {
        rng.random_range(centre - spread..=centre + spread)
    } else {
        centre
    };
    heading(angle) * speed
}

/// Move the automatic actor and turn it if it ran into something
pub fn automatic_movement<R: Rng + ?Sized>(
    actor: &mut Sprite,
    field: &Playfield,
    throttle: f32,
    spread: f32,
    max_speed: Option<f32>,
    rng: &mut R,
) -> WallContact {
    actor.advance(throttle);
    let contact = classify_wall(actor, field);
    if contact.is_contact() {
        actor.vel = bounce(actor.vel, contact, spread, max_speed, rng);
    }
    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn actor(x: f32, y: f32) -> Sprite {
        Sprite::actor(Vec2::new(x, y), Vec2::new(-0.1, -0.1), Vec2::ONE)
    }

    #[test]
    fn test_chase_within_radius() {
        let mut tom = actor(10.0, 10.0);
        assert!(chase(&mut tom, Vec2::new(16.0, 18.0), 10.0, 0.05));
        // Distance 10, so velocity is 0.05 along (0.6, 0.8)
        assert!((tom.vel - Vec2::new(0.03, 0.04)).length() < 1e-6);
    }

    #[test]
    fn test_chase_ignores_distant_target() {
        let mut tom = actor(0.0, 0.0);
        assert!(!chase(&mut tom, Vec2::new(20.0, 0.0), 10.0, 0.05));
        assert_eq!(tom.vel, Vec2::new(-0.1, -0.1));
    }

    #[test]
    fn test_evade_points_away() {
        let mut jerry = actor(10.0, 10.0);
        assert!(evade(&mut jerry, Vec2::new(13.0, 10.0), 10.0, 0.1));
        assert!((jerry.vel - Vec2::new(-0.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_same_cell_leaves_velocity() {
        let mut tom = actor(5.0, 5.0);
        assert!(!chase(&mut tom, Vec2::new(5.0, 5.0), 10.0, 0.05));
        assert_eq!(tom.vel, Vec2::new(-0.1, -0.1));
    }

    #[test]
    fn test_seek_moves_toward_target() {
        let mut firework = actor(0.0, 0.0);
        seek(&mut firework, Vec2::new(0.0, 10.0), 0.5);
        assert!((firework.pos - Vec2::new(0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_automatic_movement_bounces_off_left_edge() {
        let field = Playfield::new(40, 20, 4);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut tom = Sprite::actor(Vec2::new(0.5, 10.0), Vec2::new(-0.1, 0.0), Vec2::ONE);

        let contact = automatic_movement(&mut tom, &field, 1.0, 90.0, None, &mut rng);
        assert_eq!(contact, WallContact::Left);
        assert!(tom.vel.x >= -1e-6);
        assert!((tom.vel.length() - 0.1).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_bounce_heads_back_inside(seed in any::<u64>(), side in 0usize..4) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let contact = WallContact::PRIORITY[side];
            let vel = bounce(Vec2::new(0.3, -0.4), contact, 60.0, None, &mut rng);

            prop_assert!((vel.length() - 0.5).abs() < 1e-4);
            let inward = match contact {
                WallContact::Left => vel.x,
                WallContact::Right => -vel.x,
                WallContact::Top => vel.y,
                _ => -vel.y,
            };
            prop_assert!(inward > 0.0);
        }

        #[test]
        fn prop_bounce_respeed_below_max(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let vel = bounce(Vec2::X, WallContact::Right, 60.0, Some(1.0), &mut rng);
            prop_assert!(vel.length() < 1.0 + 1e-5);
        }
    }
}
