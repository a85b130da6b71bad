//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One tick per frame, driven by `TickInput`
//! - Seeded RNG only
//! - Time comes from a `Clock`, never read directly
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod level;
pub mod playfield;
pub mod pursuit;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{Clock, Stopwatch, VirtualClock};
pub use collision::{ContactModel, WallContact, classify_wall, resolve_collisions};
pub use entity::{PARKED, Pool, Sprite};
pub use level::{Level, WallSegment, load_levels};
pub use playfield::Playfield;
pub use spawner::SpawnGate;
pub use state::{GameEvent, GamePhase, GameState, Role, Session};
pub use tick::{Command, Direction, TickInput, tick};
