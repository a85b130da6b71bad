//! One simulation step
//!
//! input → player actor → automatic actor and fireworks → spawners →
//! collisions → session checks. Rendering happens outside, on the result.

use glam::Vec2;

use super::clock::Clock;
use super::collision::{WallContact, resolve_collisions, touches};
use super::pursuit::{automatic_movement, chase, evade, seek};
use super::spawner::{launch_firework, place_cheese, run_spawners, spawn_trap};
use super::state::{GameEvent, GamePhase, GameState, Role};

/// Movement direction on a y-down screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in screen coordinates
    pub fn offset(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// A single-character operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Fire,
    PlaceCheese,
    PlaceTrap,
    Pause,
    SwapRole,
    SkipLevel,
    Status,
    Restart,
    Quit,
}

impl Command {
    /// Keyboard mapping for the terminal game
    pub fn from_key(key: char) -> Option<Self> {
        let command = match key {
            'w' => Command::Move(Direction::Up),
            'a' => Command::Move(Direction::Left),
            's' => Command::Move(Direction::Down),
            'd' => Command::Move(Direction::Right),
            'f' => Command::Fire,
            'c' => Command::PlaceCheese,
            'm' => Command::PlaceTrap,
            'p' => Command::Pause,
            'z' => Command::SwapRole,
            'l' => Command::SkipLevel,
            'r' => Command::Restart,
            _ => return None,
        };
        Some(command)
    }

    /// Letters accepted over the serial link by the LCD game
    pub fn from_serial(letter: char) -> Option<Self> {
        match letter {
            'i' => Some(Command::Status),
            'w' | 'a' | 's' | 'd' | 'f' | 'p' | 'l' => Self::from_key(letter),
            _ => None,
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Step the controlled actor
    pub movement: Option<Direction>,
    /// Launch a firework (Jerry role)
    pub fire: bool,
    /// Drop a cheese where Tom stands (Tom role)
    pub place_cheese: bool,
    /// Drop a trap where Tom stands (Tom role)
    pub place_trap: bool,
    /// Pause toggle
    pub pause: bool,
    pub swap_role: bool,
    pub skip_level: bool,
    /// Emit a status report event
    pub status: bool,
    /// Start over (only honoured after game over)
    pub restart: bool,
    /// Analog speed knob in [0, 1]; full speed when absent
    pub throttle: Option<f32>,
}

impl TickInput {
    /// Fold a command into this tick's input
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move(dir) => self.movement = Some(dir),
            Command::Fire => self.fire = true,
            Command::PlaceCheese => self.place_cheese = true,
            Command::PlaceTrap => self.place_trap = true,
            Command::Pause => self.pause = true,
            Command::SwapRole => self.swap_role = true,
            Command::SkipLevel => self.skip_level = true,
            Command::Status => self.status = true,
            Command::Restart => self.restart = true,
            Command::Quit => {}
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, clock: &dyn Clock) {
    let now = clock.now();

    if state.session.phase == GamePhase::GameOver {
        if input.restart {
            state.restart(now);
        }
        return;
    }

    if input.pause {
        state.toggle_pause(now);
    }
    if input.status {
        let report = state.status_report();
        state.events.push(GameEvent::Status(report));
    }
    if input.swap_role && state.profile.role_swap {
        state.role = state.role.swapped();
        log::debug!("Player now controls {:?}", state.role);
    }
    if input.skip_level {
        state.next_level();
        if state.session.phase == GamePhase::GameOver {
            return;
        }
    }

    state.session.stopwatch.update(now);

    // Don't simulate while paused
    if state.session.is_paused() {
        return;
    }

    let throttle = input.throttle.map_or(1.0, |t| t.clamp(0.0, 1.0));

    // Player actions
    if let Some(dir) = input.movement {
        move_controlled(state, dir, throttle);
    }
    match state.role {
        Role::Jerry => {
            if input.fire {
                launch_firework(state);
            }
        }
        Role::Tom if state.profile.role_swap => {
            if input.place_cheese {
                place_cheese(state);
            }
            if input.place_trap {
                spawn_trap(state);
            }
        }
        Role::Tom => {}
    }

    steer_actors(state);
    move_automatic(state, throttle);
    move_fireworks(state);

    run_spawners(state);
    resolve_collisions(state);

    if state.session.lives == 0 {
        log::info!("Out of lives with score {}", state.session.score);
        state.game_over();
    }
}

/// Step the controlled actor towards `dir`, stopping as soon as it touches
/// the side it is moving towards
///
/// The step is walked at most one cell at a time so a multi-pixel LCD step
/// can never land inside (or beyond) a thin wall.
fn move_controlled(state: &mut GameState, dir: Direction, throttle: f32) {
    let side = WallContact::facing(dir);
    let mut remaining = state.profile.step * throttle;
    let (actor, field) = state.controlled_mut();
    while remaining > 0.0 && !touches(actor, side, field) {
        let part = remaining.min(1.0);
        actor.pos += dir.offset() * part;
        remaining -= part;
    }
}

/// Distance-triggered chase (player is Jerry) or evasion (player is Tom)
fn steer_actors(state: &mut GameState) {
    let Some(tuning) = state.profile.pursuit else {
        return;
    };
    match state.role {
        Role::Jerry => {
            chase(&mut state.tom, state.jerry.pos, tuning.radius, tuning.chase_speed);
        }
        Role::Tom => {
            evade(&mut state.jerry, state.tom.pos, tuning.radius, tuning.evade_speed);
        }
    }
}

fn move_automatic(state: &mut GameState, throttle: f32) {
    let spread = state.profile.turn_spread_deg;
    let max_speed = state.profile.turn_max_speed;
    let (actor, field, rng) = state.automatic_mut();
    automatic_movement(actor, field, throttle, spread, max_speed, rng);
}

/// Fireworks home in on Tom
fn move_fireworks(state: &mut GameState) {
    let target = state.tom.pos;
    let speed = state.profile.firework_speed;
    for firework in state.fireworks.slots_mut() {
        if firework.visible {
            seek(firework, target, speed);
        }
    }
}
