//! Tom and Jerry - a chase-and-collect arcade game
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (actors, pools, collisions, spawning, session)
//! - `renderer`: Character/pixel framebuffers and the terminal presenter
//! - `platform`: Clocks, keyboard polling and the serial status link
//! - `settings`: Variant profiles and run configuration

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use settings::{Profile, Settings, Variant};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Delay between game updates (milliseconds)
    pub const TICK_DELAY_MS: u64 = 10;

    /// Session defaults
    pub const STARTING_LIVES: u8 = 5;
    /// Cheese that must be eaten before the door opens
    pub const DOOR_THRESHOLD: u32 = 5;
    /// Timed spawners stop topping up once this many are on screen
    pub const SPAWN_CEILING: usize = 5;
    pub const CHEESE_INTERVAL_SECS: u64 = 2;
    pub const TRAP_INTERVAL_SECS: u64 = 3;
    /// Random placement gives up after this many rejected cells
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 500;

    /// Pursuit heuristic
    pub const CHASE_RADIUS: f32 = 10.0;
    pub const CHASE_SPEED: f32 = 0.05;
    pub const EVADE_SPEED: f32 = 0.1;
    pub const FIREWORK_SPEED: f32 = 0.5;

    /// Terminal target: status block occupies rows 0-3, row 3 is the separator
    pub const TERMINAL_TOP_ROW: i32 = 4;
    pub const TERMINAL_DEFAULT_SIZE: (i32, i32) = (80, 24);
    pub const TERMINAL_MAX_CHEESE: usize = 50;
    pub const TERMINAL_MAX_TRAPS: usize = 50;
    pub const TERMINAL_MAX_FIREWORKS: usize = 10;
    pub const TERMINAL_TURN_SPREAD_DEG: f32 = 90.0;

    /// Embedded target: 84x48 monochrome LCD
    pub const LCD_WIDTH: i32 = 84;
    pub const LCD_HEIGHT: i32 = 48;
    pub const STATUS_BAR_HEIGHT: i32 = 8;
    pub const EMBEDDED_MAX_CHEESE: usize = 5;
    pub const EMBEDDED_MAX_TRAPS: usize = 5;
    pub const EMBEDDED_MAX_FIREWORKS: usize = 20;
    pub const EMBEDDED_TURN_SPREAD_DEG: f32 = 60.0;
    pub const JERRY_MAX_SPEED: f32 = 2.0;
    pub const TOM_MAX_SPEED: f32 = 1.0;
    /// Score Jerry needs before fireworks can be launched
    pub const FIREWORK_COST: u32 = 3;

    /// Timer 3 runs at 8 MHz / 256 and overflows every 65536 counts
    pub const TIMER_TICK_SECS: f64 = 256.0 / 8_000_000.0;
    pub const TIMER_OVERFLOW_SECS: f64 = 65536.0 * TIMER_TICK_SECS;
}

/// Heading for an angle in degrees on a y-down screen
///
/// 0° points right, 90° points up, 180° left and 270° down.
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    Vec2::from_angle(-degrees.to_radians())
}

/// Integer cell a position falls in
#[inline]
pub fn to_cell(pos: Vec2) -> IVec2 {
    pos.round().as_ivec2()
}

/// Cells covered by a straight line between two points (Bresenham)
pub fn line_cells(from: IVec2, to: IVec2) -> Vec<IVec2> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);
    let mut cur = from;
    let mut err = dx + dy;
    loop {
        cells.push(cur);
        if cur == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cur.x += sx;
        }
        if e2 <= dx {
            err += dx;
            cur.y += sy;
        }
    }
    cells
}
