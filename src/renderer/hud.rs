//! Frame composition: the status block plus every visible sprite
//!
//! Terminal frames are whole character grids. LCD frames are a pixel buffer
//! with the status text carried alongside, since the emulated panel has no
//! font of its own.

use glam::IVec2;

use super::canvas::Canvas;
use super::lcd::*;
use crate::consts::STATUS_BAR_HEIGHT;
use crate::sim::{GameState, Sprite};

/// Separator row under the terminal status block
const SEPARATOR_ROW: i32 = 3;

pub const JERRY_GLYPH: char = 'J';
pub const TOM_GLYPH: char = 'T';
pub const CHEESE_GLYPH: char = '#';
pub const TRAP_GLYPH: char = '%';
pub const FIREWORK_GLYPH: char = 'F';
pub const DOOR_GLYPH: char = 'X';
pub const WALL_GLYPH: char = '*';

/// Top two status rows of the terminal game
pub fn terminal_status(state: &GameState) -> [String; 2] {
    let session = &state.session;
    let (minutes, seconds) = session.stopwatch.minutes_seconds();
    [
        format!(
            "Score: {}   Lives: {}   Player: {}   Time: {minutes:02}:{seconds:02}",
            session.score,
            session.lives,
            state.role.glyph(),
        ),
        format!(
            "Cheese: {}   Traps: {}   Fireworks: {}   Level: {}",
            state.cheese.active_count(),
            state.traps.active_count(),
            state.fireworks.active_count(),
            session.level_index + 1,
        ),
    ]
}

/// `level:lives:score     mm:ss` shown in the LCD status bar
pub fn lcd_status(state: &GameState) -> String {
    let session = &state.session;
    let (minutes, seconds) = session.stopwatch.minutes_seconds();
    format!(
        "{}:{}:{}     {minutes:02}:{seconds:02}",
        session.level_index + 1,
        session.lives,
        session.score,
    )
}

/// Draw the whole terminal screen into `canvas`
pub fn compose_terminal(state: &GameState, canvas: &mut Canvas) {
    canvas.clear();

    let [scores, counts] = terminal_status(state);
    let margin = (canvas.width() / 20).max(1);
    canvas.text(IVec2::new(margin, 0), &scores);
    if state.session.is_paused() {
        canvas.text(IVec2::new(margin, 1), "PAUSED");
    }
    canvas.text(IVec2::new(margin, 2), &counts);
    canvas.line(
        IVec2::new(0, SEPARATOR_ROW),
        IVec2::new(canvas.width() - 1, SEPARATOR_ROW),
        '~',
    );

    for cell in state.playfield.wall_cells() {
        canvas.put(cell, WALL_GLYPH);
    }

    let pools = [
        (&state.cheese, CHEESE_GLYPH),
        (&state.traps, TRAP_GLYPH),
        (&state.fireworks, FIREWORK_GLYPH),
    ];
    for (pool, glyph) in pools {
        for sprite in pool.iter_active() {
            canvas.put(sprite.cell(), glyph);
        }
    }
    if state.door.visible {
        canvas.put(state.door.cell(), DOOR_GLYPH);
    }
    canvas.put(state.tom.cell(), TOM_GLYPH);
    canvas.put(state.jerry.cell(), JERRY_GLYPH);
}

/// Confirmation screen shown after game over
pub fn compose_game_over(canvas: &mut Canvas) {
    canvas.clear();
    let x = (canvas.width() as f32 * 0.4) as i32;
    let y = (canvas.height() as f32 * 0.38) as i32;
    canvas.text(IVec2::new(x, y), "Press (r) to restart and (q) to quit");
}

/// One rendered LCD frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdFrame {
    pub status: String,
    pub pixels: PixelBuffer,
}

impl LcdFrame {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            status: String::new(),
            pixels: PixelBuffer::new(width, height),
        }
    }

    /// Status text followed by the half-block pixel rows
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.status.clone()];
        lines.extend(self.pixels.lines());
        lines
    }
}

fn blit_sprite(fb: &mut PixelBuffer, sprite: &Sprite, bitmap: &Bitmap) {
    if sprite.visible {
        fb.blit(sprite.cell(), bitmap);
    }
}

/// Draw the whole LCD screen into `frame`
pub fn compose_lcd(state: &GameState, frame: &mut LcdFrame) {
    frame.status = lcd_status(state);

    let fb = &mut frame.pixels;
    fb.clear();
    fb.line(
        IVec2::new(0, STATUS_BAR_HEIGHT),
        IVec2::new(fb.width() - 1, STATUS_BAR_HEIGHT),
    );
    for cell in state.playfield.wall_cells() {
        fb.set(cell);
    }

    for sprite in state.cheese.iter_active() {
        blit_sprite(fb, sprite, &CHEESE_BITMAP);
    }
    for sprite in state.traps.iter_active() {
        blit_sprite(fb, sprite, &TRAP_BITMAP);
    }
    for sprite in state.fireworks.iter_active() {
        blit_sprite(fb, sprite, &FIREWORK_BITMAP);
    }
    blit_sprite(fb, &state.door, &DOOR_BITMAP);
    blit_sprite(fb, &state.tom, &TOM_BITMAP);
    blit_sprite(fb, &state.jerry, &JERRY_BITMAP);
}
