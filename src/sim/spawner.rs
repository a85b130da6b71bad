//! Timed and player-triggered spawning
//!
//! Cheese appears on a random empty cell every couple of seconds, traps are
//! dropped where Tom stands, fireworks launch from Jerry. Every spawn goes
//! through a fixed-capacity pool and is silently dropped when it cannot fit.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};
use crate::consts::MAX_PLACEMENT_ATTEMPTS;

/// Fires at most once each time elapsed seconds land on a multiple of the
/// interval; re-arms when the elapsed seconds move off the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnGate {
    pub interval_secs: u64,
    armed: bool,
}

impl SpawnGate {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs,
            armed: true,
        }
    }

    /// Should the spawner fire at this elapsed time
    pub fn poll(&mut self, elapsed_secs: u64) -> bool {
        let on_boundary = self.interval_secs > 0
            && elapsed_secs != 0
            && elapsed_secs % self.interval_secs == 0;

        if !on_boundary {
            self.armed = true;
            return false;
        }
        std::mem::replace(&mut self.armed, false)
    }

    pub fn rearm(&mut self) {
        self.armed = true;
    }
}

/// Search for a random empty region of `size` cells inside the playfield
///
/// Gives up after a bounded number of attempts so a level packed with walls
/// drops the spawn instead of stalling the tick.
pub fn find_empty_region(state: &mut GameState, size: IVec2) -> Option<Vec2> {
    let field = &state.playfield;
    let max_x = field.width - size.x;
    let (min_y, max_y) = (field.top, field.height - size.y);
    if max_x < 0 || max_y < min_y {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let origin = IVec2::new(
            state.rng.random_range(0..=max_x),
            state.rng.random_range(min_y..=max_y),
        );
        if state.region_free(origin, size) {
            return Some(origin.as_vec2());
        }
    }

    log::debug!(
        "No empty {}x{} region after {MAX_PLACEMENT_ATTEMPTS} attempts",
        size.x,
        size.y
    );
    None
}

/// Run the timed spawners for this tick
pub fn run_spawners(state: &mut GameState) {
    let secs = state.session.stopwatch.seconds();
    let ceiling = state.profile.spawn_ceiling;

    if state.cheese_gate.poll(secs) && state.cheese.active_count() < ceiling {
        spawn_cheese(state);
    }

    if state.trap_gate.poll(secs) && state.traps.active_count() < ceiling {
        spawn_trap(state);
    }
}

/// Drop a cheese on a random empty cell
pub fn spawn_cheese(state: &mut GameState) -> bool {
    if state.cheese.is_full() {
        return false;
    }
    let size = state.profile.cheese_size.round().as_ivec2().max(IVec2::ONE);
    match find_empty_region(state, size) {
        Some(pos) => state.cheese.spawn(pos).is_some(),
        None => {
            log::warn!("No room left for cheese; spawn dropped");
            false
        }
    }
}

/// Drop a trap under Tom
pub fn spawn_trap(state: &mut GameState) -> bool {
    let pos = state.tom.anchor();
    state.traps.spawn(pos).is_some()
}

/// Tom (player controlled) leaves a cheese where he stands
pub fn place_cheese(state: &mut GameState) -> bool {
    let pos = state.tom.anchor();
    state.cheese.spawn(pos).is_some()
}

/// Launch a firework from Jerry, gated on the score threshold
pub fn launch_firework(state: &mut GameState) -> bool {
    if state.session.score < state.profile.firework_cost {
        return false;
    }
    let pos = state.jerry.pos;
    state.fireworks.spawn(pos).is_some()
}

/// Open the door once enough cheese has been eaten this level
///
/// When the level has no room for it the search is retried once per elapsed
/// second, and the failure is only logged the first time.
pub fn reveal_door(state: &mut GameState) {
    if state.door.visible || state.session.collected < state.profile.door_threshold {
        return;
    }
    let secs = state.session.stopwatch.seconds();
    if state.door_blocked_at == Some(secs) {
        return;
    }

    let size = state.door.cell_size();
    match find_empty_region(state, size) {
        Some(pos) => {
            state.door_blocked_at = None;
            state.door.show_at(pos);
            state.events.push(GameEvent::DoorOpened);
            log::info!("Door opened at ({}, {})", pos.x, pos.y);
        }
        None => {
            if state.door_blocked_at.is_none() {
                log::warn!(
                    "No room for the door on level {}; retrying every second",
                    state.session.level_index + 1
                );
            }
            state.door_blocked_at = Some(secs);
        }
    }
}
