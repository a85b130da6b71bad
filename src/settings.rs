//! Run settings and per-variant rule profiles
//!
//! `Settings` is what the operator configures (persisted as JSON). `Profile`
//! is the full rule set the simulation runs against, derived from the variant.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::sim::ContactModel;

/// Target the game runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Character cells in a terminal
    #[default]
    Terminal,
    /// 84x48 monochrome LCD with a serial link
    Embedded,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Terminal => "terminal",
            Variant::Embedded => "embedded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "terminal" | "pc" => Some(Variant::Terminal),
            "embedded" | "lcd" | "teensy" => Some(Variant::Embedded),
            _ => None,
        }
    }
}

/// Distance-triggered steering between the two actors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuitTuning {
    /// Steering only kicks in within this distance
    pub radius: f32,
    /// Speed fraction Tom uses when chasing
    pub chase_speed: f32,
    /// Speed fraction Jerry uses when fleeing
    pub evade_speed: f32,
}

/// Complete rule set for one variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub variant: Variant,
    /// Playfield size (cells or pixels)
    pub width: i32,
    pub height: i32,
    /// First row below the status area
    pub top: i32,
    pub contact: ContactModel,

    // === Sprite sizes ===
    pub jerry_size: Vec2,
    pub tom_size: Vec2,
    pub cheese_size: Vec2,
    pub trap_size: Vec2,
    pub firework_size: Vec2,
    pub door_size: Vec2,

    // === Initial velocities ===
    pub jerry_velocity: Vec2,
    pub tom_velocity: Vec2,

    // === Pools and spawners ===
    pub max_cheese: usize,
    pub max_traps: usize,
    pub max_fireworks: usize,
    pub spawn_ceiling: usize,
    pub cheese_interval_secs: u64,
    pub trap_interval_secs: u64,
    pub door_threshold: u32,

    // === Fireworks ===
    /// Minimum score before a firework can be launched (not deducted)
    pub firework_cost: u32,
    /// Score awarded when a firework hits Tom
    pub firework_bounty: u32,
    pub firework_speed: f32,

    // === Movement ===
    /// Distance the controlled actor moves per input
    pub step: f32,
    pub pursuit: Option<PursuitTuning>,
    /// Half-width of the random bounce arc (degrees)
    pub turn_spread_deg: f32,
    /// Re-roll speed on bounce, uniform in [0, max)
    pub turn_max_speed: Option<f32>,

    // === Session ===
    pub starting_lives: u8,
    /// Role swap and Tom-only placement commands
    pub role_swap: bool,
}

impl Profile {
    /// Rules for a terminal of the given size
    ///
    /// The playfield always keeps at least one column and one row below the
    /// status rows, however small the terminal reports itself.
    pub fn terminal(width: i32, height: i32) -> Self {
        let cell = Vec2::ONE;
        Self {
            variant: Variant::Terminal,
            width: width.max(1),
            height: height.max(TERMINAL_TOP_ROW + 1),
            top: TERMINAL_TOP_ROW,
            contact: ContactModel::Point,
            jerry_size: cell,
            tom_size: cell,
            cheese_size: cell,
            trap_size: cell,
            firework_size: cell,
            door_size: cell,
            jerry_velocity: Vec2::new(0.1, 0.1),
            tom_velocity: Vec2::new(-0.1, -0.1),
            max_cheese: TERMINAL_MAX_CHEESE,
            max_traps: TERMINAL_MAX_TRAPS,
            max_fireworks: TERMINAL_MAX_FIREWORKS,
            spawn_ceiling: SPAWN_CEILING,
            cheese_interval_secs: CHEESE_INTERVAL_SECS,
            trap_interval_secs: TRAP_INTERVAL_SECS,
            door_threshold: DOOR_THRESHOLD,
            firework_cost: 0,
            firework_bounty: 0,
            firework_speed: FIREWORK_SPEED,
            step: 1.0,
            pursuit: Some(PursuitTuning {
                radius: CHASE_RADIUS,
                chase_speed: CHASE_SPEED,
                evade_speed: EVADE_SPEED,
            }),
            turn_spread_deg: TERMINAL_TURN_SPREAD_DEG,
            turn_max_speed: None,
            starting_lives: STARTING_LIVES,
            role_swap: true,
        }
    }

    /// Rules for the LCD board
    pub fn embedded() -> Self {
        let actor = Vec2::new(6.0, 5.0);
        Self {
            variant: Variant::Embedded,
            width: LCD_WIDTH,
            height: LCD_HEIGHT,
            top: STATUS_BAR_HEIGHT + 1,
            contact: ContactModel::BoundingBox,
            jerry_size: actor,
            tom_size: actor,
            cheese_size: actor,
            trap_size: Vec2::new(3.0, 6.0),
            firework_size: Vec2::new(5.0, 5.0),
            door_size: actor,
            jerry_velocity: Vec2::splat(JERRY_MAX_SPEED),
            tom_velocity: Vec2::new(TOM_MAX_SPEED, 0.0),
            max_cheese: EMBEDDED_MAX_CHEESE,
            max_traps: EMBEDDED_MAX_TRAPS,
            max_fireworks: EMBEDDED_MAX_FIREWORKS,
            spawn_ceiling: SPAWN_CEILING,
            cheese_interval_secs: CHEESE_INTERVAL_SECS,
            trap_interval_secs: TRAP_INTERVAL_SECS,
            door_threshold: DOOR_THRESHOLD,
            firework_cost: FIREWORK_COST,
            firework_bounty: 1,
            firework_speed: FIREWORK_SPEED,
            step: JERRY_MAX_SPEED,
            pursuit: None,
            turn_spread_deg: EMBEDDED_TURN_SPREAD_DEG,
            turn_max_speed: Some(TOM_MAX_SPEED),
            starting_lives: STARTING_LIVES,
            role_swap: false,
        }
    }

    /// Profile for a variant; `screen` is only used by the terminal target
    pub fn for_variant(variant: Variant, screen: (i32, i32)) -> Self {
        match variant {
            Variant::Terminal => Self::terminal(screen.0, screen.1),
            Variant::Embedded => Self::embedded(),
        }
    }
}

/// Operator-facing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    /// Delay between ticks (milliseconds)
    pub tick_delay_ms: u64,
    /// RNG seed; wall clock when unset
    pub seed: Option<u64>,
    pub starting_lives: u8,
    /// Level descriptor files, played in order
    pub level_files: Vec<PathBuf>,
    /// Initial analog speed knob position (embedded, 0.0 - 1.0)
    pub throttle: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Terminal,
            tick_delay_ms: TICK_DELAY_MS,
            seed: None,
            starting_lives: STARTING_LIVES,
            level_files: Vec::new(),
            throttle: 0.5,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path).map_err(|source| GameError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json).map_err(|source| GameError::SettingsFormat {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                log::warn!("{e}; using default settings");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Build the rule profile for these settings
    pub fn profile(&self, screen: (i32, i32)) -> Profile {
        let mut profile = Profile::for_variant(self.variant, screen);
        profile.starting_lives = self.starting_lives;
        profile
    }
}
