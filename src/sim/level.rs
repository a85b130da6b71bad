//! Level geometry and the text level descriptor
//!
//! A descriptor holds one instruction per line, coordinates given as fractions
//! of the playfield:
//!
//! ```text
//! J 0.1 0.2              Jerry's spawn point
//! T 0.8 0.7              Tom's spawn point
//! W 0.3 0.0 0.3 0.5      wall from (x1, y1) to (x2, y2)
//! ```
//!
//! Anything else (unknown commands, wrong field counts, bad numbers) is skipped.

use std::path::{Path, PathBuf};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::settings::{Profile, Variant};

/// One wall line in absolute cells/pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSegment {
    pub from: IVec2,
    pub to: IVec2,
}

/// Geometry of a single level, immutable during play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Descriptor file (or a built-in name) for diagnostics
    pub name: String,
    pub jerry_spawn: Vec2,
    pub tom_spawn: Vec2,
    pub walls: Vec<WallSegment>,
}

impl Level {
    /// A room with no walls and the default spawn points
    pub fn open(name: &str, profile: &Profile) -> Self {
        let jerry_spawn = Vec2::new(1.0, profile.top as f32 + 1.0);
        let tom_spawn = Vec2::new(
            profile.width as f32 - profile.tom_size.x - 4.0,
            profile.height as f32 - profile.tom_size.y - 4.0,
        );
        Self {
            name: name.to_string(),
            jerry_spawn,
            tom_spawn: tom_spawn.max(jerry_spawn),
            walls: Vec::new(),
        }
    }

    /// The room the LCD board ships with
    pub fn lcd_room(profile: &Profile) -> Self {
        let wall = |x1, y1, x2, y2| WallSegment {
            from: IVec2::new(x1, y1),
            to: IVec2::new(x2, y2),
        };
        Self {
            walls: vec![
                wall(18, 15, 13, 25),
                wall(23, 35, 25, 45),
                wall(45, 10, 60, 10),
                wall(58, 25, 72, 30),
            ],
            ..Self::open("built-in", profile)
        }
    }

    /// Parse descriptor text, rescaling fractions to the profile's playfield
    pub fn parse(name: &str, text: &str, profile: &Profile) -> Self {
        let mut level = Self::open(name, profile);

        for (line_no, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(command) = fields.next() else {
                continue;
            };
            let numbers: Option<Vec<f32>> = fields.map(|f| f.parse().ok()).collect();
            let Some(numbers) = numbers else {
                log::debug!("{name}:{}: unparseable field, skipped", line_no + 1);
                continue;
            };

            match (command, numbers.as_slice()) {
                ("J", &[x, y]) => level.jerry_spawn = scale(profile, x, y).as_vec2(),
                ("T", &[x, y]) => level.tom_spawn = scale(profile, x, y).as_vec2(),
                ("W", &[x1, y1, x2, y2]) => level.walls.push(WallSegment {
                    from: scale(profile, x1, y1),
                    to: scale(profile, x2, y2),
                }),
                _ => log::debug!("{name}:{}: unrecognised line {line:?}", line_no + 1),
            }
        }

        level
    }

    /// Read and parse a descriptor file
    pub fn load(path: &Path, profile: &Profile) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::LevelIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&path.display().to_string(), &text, profile))
    }
}

/// Fractional descriptor coordinates to absolute playfield coordinates
fn scale(profile: &Profile, fx: f32, fy: f32) -> IVec2 {
    let x = (fx * profile.width as f32).round() as i32;
    let y = profile.top + (fy * (profile.height - profile.top) as f32).round() as i32;
    // max/min rather than clamp: a degenerate profile must not panic
    IVec2::new(
        x.min(profile.width - 1).max(0),
        y.min(profile.height - 1).max(profile.top),
    )
}

/// Load every level file in order
///
/// An unreadable file is reported and replaced by an empty room so the level
/// count stays what the operator asked for. With no files at all the variant's
/// default room is used.
pub fn load_levels(paths: &[PathBuf], profile: &Profile) -> Vec<Level> {
    if paths.is_empty() {
        let level = match profile.variant {
            Variant::Terminal => Level::open("open room", profile),
            Variant::Embedded => Level::lcd_room(profile),
        };
        return vec![level];
    }

    paths
        .iter()
        .map(|path| match Level::load(path, profile) {
            Ok(level) => {
                log::info!("Loaded level {} ({} walls)", level.name, level.walls.len());
                level
            }
            Err(e) => {
                log::error!("{e}");
                Level::open(&path.display().to_string(), profile)
            }
        })
        .collect()
}
