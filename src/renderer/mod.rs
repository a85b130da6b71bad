//! Rendering module
//!
//! The simulation is drawn into an in-memory frame (character grid or LCD
//! pixel buffer) which the crossterm presenter copies to the terminal.

pub mod canvas;
pub mod hud;
pub mod lcd;
pub mod terminal;

pub use canvas::Canvas;
pub use hud::{LcdFrame, compose_game_over, compose_lcd, compose_terminal};
pub use lcd::PixelBuffer;
pub use terminal::{TerminalPresenter, screen_size};
