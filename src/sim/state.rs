//! Game state and session bookkeeping
//!
//! Everything the tick mutates lives in one `GameState` owned by the frame
//! driver: both actors, the entity pools, level geometry and the session.

use std::fmt::Write as _;
use std::time::Duration;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Stopwatch;
use super::entity::{Pool, Sprite};
use super::level::Level;
use super::playfield::Playfield;
use super::spawner::SpawnGate;
use crate::settings::Profile;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Time and movement frozen
    Paused,
    /// Out of lives or out of levels; waiting for restart/quit
    GameOver,
}

/// Which actor the player is steering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Jerry,
    Tom,
}

impl Role {
    pub fn swapped(self) -> Self {
        match self {
            Role::Jerry => Role::Tom,
            Role::Tom => Role::Jerry,
        }
    }

    /// Single letter shown in the status block
    pub fn glyph(self) -> char {
        match self {
            Role::Jerry => 'J',
            Role::Tom => 'T',
        }
    }
}

/// Things that happened during a tick, drained by the frame driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    CheeseCollected,
    TrapSprung,
    /// Tom caught Jerry
    Caught,
    /// A firework reached Tom
    TomHit,
    DoorOpened,
    LevelAdvanced { level: usize },
    GameOver,
    /// Multi-line status report requested by the operator
    Status(String),
}

/// Lives, score and progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Current level (0-based)
    pub level_index: usize,
    pub lives: u8,
    pub score: u32,
    /// Cheese eaten on the current level
    pub collected: u32,
    pub phase: GamePhase,
    pub stopwatch: Stopwatch,
}

impl Session {
    fn new(lives: u8, now: Duration) -> Self {
        Self {
            level_index: 0,
            lives,
            score: 0,
            collected: 0,
            phase: GamePhase::Playing,
            stopwatch: Stopwatch::new(now),
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub profile: Profile,
    /// Level geometry, played in order
    pub levels: Vec<Level>,
    /// Wall grid for the current level
    pub playfield: Playfield,
    pub session: Session,
    pub role: Role,
    pub jerry: Sprite,
    pub tom: Sprite,
    pub cheese: Pool,
    pub traps: Pool,
    pub fireworks: Pool,
    pub door: Sprite,
    pub cheese_gate: SpawnGate,
    pub trap_gate: SpawnGate,
    /// Elapsed second of the last failed door placement on this level
    pub door_blocked_at: Option<u64>,
    pub rng: Pcg32,
    /// Pending events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on level 0
    pub fn new(profile: Profile, levels: Vec<Level>, seed: u64, now: Duration) -> Self {
        let levels = if levels.is_empty() {
            vec![Level::open("open room", &profile)]
        } else {
            levels
        };

        let mut state = Self {
            playfield: Playfield::new(profile.width, profile.height, profile.top),
            session: Session::new(profile.starting_lives, now),
            role: Role::Jerry,
            jerry: Sprite::actor(levels[0].jerry_spawn, profile.jerry_velocity, profile.jerry_size),
            tom: Sprite::actor(levels[0].tom_spawn, profile.tom_velocity, profile.tom_size),
            cheese: Pool::new(profile.max_cheese, profile.cheese_size),
            traps: Pool::new(profile.max_traps, profile.trap_size),
            fireworks: Pool::new(profile.max_fireworks, profile.firework_size),
            door: Sprite::new(profile.door_size),
            cheese_gate: SpawnGate::new(profile.cheese_interval_secs),
            trap_gate: SpawnGate::new(profile.trap_interval_secs),
            door_blocked_at: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            levels,
            profile,
        };
        state.load_level(0);
        state
    }

    /// Geometry of the level being played
    pub fn current_level(&self) -> &Level {
        let last = self.levels.len().saturating_sub(1);
        &self.levels[self.session.level_index.min(last)]
    }

    /// Switch to a level: clears every pool, hides the door and puts both
    /// actors back on the level's spawn points
    pub fn load_level(&mut self, index: usize) {
        self.session.level_index = index;
        self.session.collected = 0;
        self.playfield = Playfield::from_level(
            self.current_level(),
            self.profile.width,
            self.profile.height,
            self.profile.top,
        );

        self.cheese.clear();
        self.traps.clear();
        self.fireworks.clear();
        self.door.park();
        self.door_blocked_at = None;
        self.cheese_gate.rearm();
        self.trap_gate.rearm();
        self.reset_actors();
    }

    /// Advance to the next level, or end the game after the last one
    pub fn next_level(&mut self) {
        let next = self.session.level_index + 1;
        if next >= self.levels.len() {
            log::info!("Final level cleared with score {}", self.session.score);
            self.game_over();
            return;
        }

        self.load_level(next);
        self.events.push(GameEvent::LevelAdvanced { level: next });
        log::info!("Advanced to level {} ({})", next, self.current_level().name);
    }

    /// Both actors back to their spawn points with their starting velocities
    pub fn reset_actors(&mut self) {
        let level = self.current_level();
        let (jerry_spawn, tom_spawn) = (level.jerry_spawn, level.tom_spawn);

        self.jerry = Sprite::actor(jerry_spawn, self.profile.jerry_velocity, self.profile.jerry_size);
        self.tom = Sprite::actor(tom_spawn, self.profile.tom_velocity, self.profile.tom_size);
    }

    pub fn game_over(&mut self) {
        if self.session.phase != GamePhase::GameOver {
            self.session.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }

    /// Fresh session on level 0
    pub fn restart(&mut self, now: Duration) {
        log::info!("Restarting session");
        self.session = Session::new(self.profile.starting_lives, now);
        self.role = Role::Jerry;
        self.load_level(0);
    }

    /// Flip between playing and paused; ignored after game over
    pub fn toggle_pause(&mut self, now: Duration) {
        match self.session.phase {
            GamePhase::Playing => {
                self.session.stopwatch.pause(now);
                self.session.phase = GamePhase::Paused;
            }
            GamePhase::Paused => {
                self.session.stopwatch.resume(now);
                self.session.phase = GamePhase::Playing;
            }
            GamePhase::GameOver => {}
        }
    }

    /// The actor the player steers, with the walls it moves between
    pub fn controlled_mut(&mut self) -> (&mut Sprite, &Playfield) {
        let actor = match self.role {
            Role::Jerry => &mut self.jerry,
            Role::Tom => &mut self.tom,
        };
        (actor, &self.playfield)
    }

    /// The actor driven by pursuit and wall bouncing, with the walls and the
    /// RNG it turns with
    pub fn automatic_mut(&mut self) -> (&mut Sprite, &Playfield, &mut Pcg32) {
        let actor = match self.role {
            Role::Jerry => &mut self.tom,
            Role::Tom => &mut self.jerry,
        };
        (actor, &self.playfield, &mut self.rng)
    }

    /// Every visible sprite on the playfield
    pub fn visible_sprites(&self) -> impl Iterator<Item = &Sprite> {
        [&self.jerry, &self.tom, &self.door]
            .into_iter()
            .filter(|s| s.visible)
            .chain(self.cheese.iter_active())
            .chain(self.traps.iter_active())
            .chain(self.fireworks.iter_active())
    }

    /// True when a `size` region at `origin` is inside the playfield and free
    /// of walls and visible sprites
    pub fn region_free(&self, origin: IVec2, size: IVec2) -> bool {
        let far = origin + size - IVec2::ONE;
        if !self.playfield.in_bounds(origin) || !self.playfield.in_bounds(far) {
            return false;
        }
        if self.playfield.any_wall(origin, size) {
            return false;
        }

        self.visible_sprites().all(|sprite| {
            let min = sprite.cell();
            let max = min + sprite.cell_size();
            origin.x >= max.x || far.x < min.x || origin.y >= max.y || far.y < min.y
        })
    }

    /// Take every event pushed since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Human-readable snapshot of the session, one `\r\n` terminated line each
    pub fn status_report(&self) -> String {
        let (minutes, seconds) = self.session.stopwatch.minutes_seconds();
        let paused = if self.session.is_paused() { "True" } else { "False" };

        let mut report = String::new();
        // Writing to a String cannot fail
        let _ = write!(
            report,
            "Timestamp: {minutes:02}:{seconds:02}\r\n\
             Current Level: {}\r\n\
             Jerry's Lives: {}\r\n\
             Score: {}\r\n\
             Number of Fireworks: {}\r\n\
             Number of Cheese: {}\r\n\
             Amount of cheese consumed: {}\r\n\
             Number of Mousetraps: {}\r\n\
             Paused: {paused}\r\n",
            self.session.level_index + 1,
            self.session.lives,
            self.session.score,
            self.fireworks.active_count(),
            self.cheese.active_count(),
            self.session.collected,
            self.traps.active_count(),
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn two_levels() -> GameState {
        let profile = Profile::terminal(60, 24);
        let first = Level::parse("one", "J 0.1 0.1\nT 0.9 0.9\n", &profile);
        let second = Level::parse("two", "J 0.5 0.2\nT 0.2 0.8\nW 0.3 0.0 0.3 0.5\n", &profile);
        GameState::new(profile, vec![first, second], 42, Duration::ZERO)
    }

    #[test]
    fn test_new_starts_on_first_spawns() {
        let state = two_levels();
        assert_eq!(state.session.level_index, 0);
        assert_eq!(state.session.lives, 5);
        assert_eq!(state.session.phase, GamePhase::Playing);
        assert_eq!(state.jerry.pos, state.levels[0].jerry_spawn);
        assert_eq!(state.tom.pos, state.levels[0].tom_spawn);
        assert_eq!(state.playfield.wall_cells().count(), 0);
    }

    #[test]
    fn test_empty_level_list_gets_open_room() {
        let state = GameState::new(Profile::terminal(40, 20), Vec::new(), 1, Duration::ZERO);
        assert_eq!(state.levels.len(), 1);
        assert!(state.levels[0].walls.is_empty());
    }

    #[test]
    fn test_level_advance_resets_pools_and_actors() {
        let mut state = two_levels();
        state.cheese.spawn(Vec2::new(5.0, 8.0));
        state.traps.spawn(Vec2::new(6.0, 8.0));
        state.fireworks.spawn(Vec2::new(7.0, 8.0));
        state.door.show_at(Vec2::new(9.0, 9.0));
        state.session.collected = 5;
        state.jerry.pos = Vec2::new(30.0, 12.0);

        state.next_level();

        assert_eq!(state.session.level_index, 1);
        assert_eq!(state.cheese.active_count(), 0);
        assert_eq!(state.traps.active_count(), 0);
        assert_eq!(state.fireworks.active_count(), 0);
        assert!(!state.door.visible);
        assert_eq!(state.session.collected, 0);
        assert_eq!(state.jerry.pos, state.levels[1].jerry_spawn);
        assert_eq!(state.tom.pos, state.levels[1].tom_spawn);
        assert!(state.playfield.wall_cells().count() > 0);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelAdvanced { level: 1 }]);
    }

    #[test]
    fn test_advancing_past_last_level_ends_game() {
        let mut state = two_levels();
        state.next_level();
        state.drain_events();
        state.next_level();
        assert_eq!(state.session.phase, GamePhase::GameOver);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = two_levels();
        state.next_level();
        state.session.lives = 0;
        state.session.score = 17;
        state.role = Role::Tom;
        state.game_over();

        state.restart(Duration::from_secs(30));
        assert_eq!(state.session.phase, GamePhase::Playing);
        assert_eq!((state.session.lives, state.session.score), (5, 0));
        assert_eq!(state.session.level_index, 0);
        assert_eq!(state.role, Role::Jerry);
        assert_eq!(state.session.stopwatch.update(Duration::from_secs(31)), Duration::from_secs(1));
    }

    #[test]
    fn test_region_free_rejects_occupied_cells() {
        let state = two_levels();
        let jerry = state.jerry.cell();
        assert!(!state.region_free(jerry, IVec2::ONE));
        assert!(!state.region_free(IVec2::new(5, 0), IVec2::ONE));
        assert!(!state.region_free(IVec2::new(59, 10), IVec2::new(2, 1)));
        assert!(state.region_free(IVec2::new(30, 12), IVec2::ONE));
    }

    #[test]
    fn test_role_selects_controlled_actor() {
        let mut state = two_levels();
        let jerry = state.jerry.pos;
        assert_eq!(state.controlled_mut().0.pos, jerry);
        state.role = state.role.swapped();
        let tom = state.tom.pos;
        assert_eq!(state.controlled_mut().0.pos, tom);
        state.automatic_mut().0.pos = Vec2::new(3.0, 7.0);
        assert_eq!(state.jerry.pos, Vec2::new(3.0, 7.0));
    }

    #[test]
    fn test_status_report_lines() {
        let mut state = two_levels();
        state.session.score = 4;
        state.toggle_pause(Duration::ZERO);
        let report = state.status_report();

        assert!(report.starts_with("Timestamp: 00:00\r\n"));
        assert!(report.contains("Current Level: 1\r\n"));
        assert!(report.contains("Score: 4\r\n"));
        assert!(report.ends_with("Paused: True\r\n"));
        assert_eq!(report.matches("\r\n").count(), 9);
    }
}
