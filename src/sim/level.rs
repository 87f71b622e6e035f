//! Level builder
//!
//! Turns an integer-coded grid into bricks. Cell codes:
//! - `0` empty
//! - `1` normal (1 hp)
//! - `2`, `3` strong (2 or 3 hp)
//! - `5`, `6`, `7` sliding variants of 1, 2, 3
//! - `9` indestructible
//!
//! Any other positive code is a plain normal brick. Geometry depends only on
//! the grid dimensions, so toggling features changes brick properties but
//! never the layout.

use std::f32::consts::TAU;

use super::state::{Brick, BrickKind, BrickMotion, INDESTRUCTIBLE_HP};
use crate::consts::{CAMPAIGN_LEVELS, QUICK_LEVELS};
use crate::settings::Features;

/// Horizontal padding on each side of the brick band
pub const GRID_PAD: f32 = 8.0;
/// Top edge of the brick band
pub const GRID_TOP: f32 = 120.0;
/// Fixed height of the brick band regardless of row count
pub const GRID_HEIGHT: f32 = 220.0;
/// Gap left on each side of a brick inside its cell
pub const CELL_INSET: f32 = 2.0;

/// Brick generation switches derived from feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub enable_hp: bool,
    pub enable_moving: bool,
}

impl From<&Features> for BuildOptions {
    fn from(features: &Features) -> Self {
        Self {
            enable_hp: features.strong_bricks,
            enable_moving: features.moving_bricks,
        }
    }
}

/// Build bricks from a pattern grid
///
/// The column count comes from the first row; missing cells in shorter rows
/// are empty. A grid with no rows or no columns yields no bricks.
pub fn build_bricks(pattern: &[&[i32]], world_width: f32, opts: BuildOptions) -> Vec<Brick> {
    let rows = pattern.len();
    let cols = pattern.first().map_or(0, |row| row.len());
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let cell_w = (world_width - GRID_PAD * 2.0) / cols as f32;
    let cell_h = GRID_HEIGHT / rows as f32;
    let mut bricks = Vec::new();

    for (r, row) in pattern.iter().enumerate() {
        for c in 0..cols {
            let code = row.get(c).copied().unwrap_or(0);
            if code <= 0 {
                continue;
            }

            let x = GRID_PAD + c as f32 * cell_w + CELL_INSET;
            let y = GRID_TOP + r as f32 * cell_h + CELL_INSET;

            let (hp, kind, moving) = match code {
                2 | 6 if opts.enable_hp => (2, BrickKind::Strong, code == 6),
                3 | 7 if opts.enable_hp => (3, BrickKind::Strong, code == 7),
                5..=7 => (1, BrickKind::Normal, true),
                9 => (INDESTRUCTIBLE_HP, BrickKind::Indestructible, false),
                _ => (1, BrickKind::Normal, false),
            };

            let motion = if moving && opts.enable_moving {
                BrickMotion::Sliding {
                    amplitude: (cell_w * 0.3).min(30.0),
                    speed: 1.0 + (r % 3) as f32 * 0.4,
                    phase: (r as f32 * 0.7 + c as f32 * 0.37) % TAU,
                    base_x: x,
                }
            } else {
                BrickMotion::Static
            };

            bricks.push(Brick {
                x,
                y,
                w: cell_w - CELL_INSET * 2.0,
                h: cell_h - CELL_INSET * 2.0,
                hp,
                kind,
                motion,
            });
        }
    }

    bricks
}

/// Number of levels in the active rotation
pub fn level_total(features: &Features) -> u32 {
    if features.campaign {
        CAMPAIGN_LEVELS
    } else {
        QUICK_LEVELS
    }
}

/// Pattern for a level index within the active rotation
pub fn pattern_for(level_index: u32, features: &Features) -> &'static [&'static [i32]] {
    let total = level_total(features);
    LEVEL_PATTERNS[(level_index % total) as usize]
}

/// Built-in level grids
pub const LEVEL_PATTERNS: [&[&[i32]]; 10] = [
    // 1: warm-up wall
    &[
        &[1, 1, 1, 1, 1, 1, 1, 1],
        &[1, 1, 1, 1, 1, 1, 1, 1],
        &[1, 1, 1, 1, 1, 1, 1, 1],
        &[0, 1, 1, 1, 1, 1, 1, 0],
    ],
    // 2: checkerboard with a strong core
    &[
        &[1, 0, 1, 0, 1, 0, 1, 0],
        &[0, 2, 0, 2, 0, 2, 0, 2],
        &[1, 0, 2, 2, 2, 2, 0, 1],
        &[0, 1, 0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0, 1, 0],
    ],
    // 3: sliding rows
    &[
        &[2, 2, 2, 2, 2, 2, 2, 2],
        &[0, 5, 0, 5, 0, 5, 0, 5],
        &[1, 1, 1, 1, 1, 1, 1, 1],
        &[5, 0, 5, 0, 5, 0, 5, 0],
    ],
    // 4: pyramid
    &[
        &[0, 0, 0, 3, 3, 0, 0, 0],
        &[0, 0, 2, 2, 2, 2, 0, 0],
        &[0, 1, 1, 1, 1, 1, 1, 0],
        &[1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // 5: twin towers
    &[
        &[3, 3, 0, 0, 0, 0, 3, 3],
        &[2, 2, 0, 1, 1, 0, 2, 2],
        &[2, 2, 0, 1, 1, 0, 2, 2],
        &[1, 1, 0, 6, 6, 0, 1, 1],
        &[1, 1, 0, 0, 0, 0, 1, 1],
    ],
    // 6: diamond
    &[
        &[0, 0, 0, 1, 1, 0, 0, 0],
        &[0, 0, 2, 6, 6, 2, 0, 0],
        &[0, 2, 3, 7, 7, 3, 2, 0],
        &[0, 0, 2, 6, 6, 2, 0, 0],
        &[0, 0, 0, 1, 1, 0, 0, 0],
    ],
    // 7: fortress with indestructible ramparts
    &[
        &[9, 1, 1, 1, 1, 1, 1, 9],
        &[1, 2, 2, 9, 9, 2, 2, 1],
        &[1, 2, 3, 3, 3, 3, 2, 1],
        &[9, 0, 5, 5, 5, 5, 0, 9],
    ],
    // 8: zig-zag
    &[
        &[6, 0, 0, 0, 0, 0, 0, 6],
        &[0, 6, 0, 0, 0, 0, 6, 0],
        &[0, 0, 7, 0, 0, 7, 0, 0],
        &[0, 0, 0, 3, 3, 0, 0, 0],
        &[2, 2, 2, 2, 2, 2, 2, 2],
    ],
    // 9: stripes
    &[
        &[3, 3, 3, 3, 3, 3, 3, 3],
        &[5, 5, 5, 5, 5, 5, 5, 5],
        &[2, 2, 2, 2, 2, 2, 2, 2],
        &[6, 6, 6, 6, 6, 6, 6, 6],
        &[1, 1, 1, 1, 1, 1, 1, 1],
    ],
    // 10: gauntlet
    &[
        &[7, 3, 7, 3, 7, 3, 7, 3],
        &[3, 9, 3, 2, 2, 3, 9, 3],
        &[6, 2, 6, 2, 6, 2, 6, 2],
        &[2, 1, 2, 9, 9, 2, 1, 2],
        &[5, 1, 5, 1, 5, 1, 5, 1],
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WORLD_WIDTH;

    const ALL: BuildOptions = BuildOptions {
        enable_hp: true,
        enable_moving: true,
    };

    #[test]
    fn test_builds_bricks_from_pattern() {
        let pattern: &[&[i32]] = &[&[1, 0, 1], &[0, 1, 0]];
        let bricks = build_bricks(pattern, 720.0, ALL);
        assert_eq!(bricks.len(), 3);
        for brick in &bricks {
            assert!(brick.w > 0.0);
            assert!(brick.h > 0.0);
        }
    }

    #[test]
    fn test_empty_grid_yields_no_bricks() {
        assert!(build_bricks(&[], WORLD_WIDTH, ALL).is_empty());
        let no_cols: &[&[i32]] = &[&[], &[]];
        assert!(build_bricks(no_cols, WORLD_WIDTH, ALL).is_empty());
    }

    #[test]
    fn test_codes_map_to_kinds() {
        let pattern: &[&[i32]] = &[&[1, 2, 3, 9, 5, 6, 7, 4]];
        let bricks = build_bricks(pattern, WORLD_WIDTH, ALL);
        let hps: Vec<u8> = bricks.iter().map(|b| b.hp).collect();
        assert_eq!(hps, vec![1, 2, 3, INDESTRUCTIBLE_HP, 1, 2, 3, 1]);
        assert_eq!(bricks[3].kind, BrickKind::Indestructible);
        assert_eq!(bricks[1].kind, BrickKind::Strong);
        assert!(bricks[4..7].iter().all(|b| b.motion.is_moving()));
        assert!(!bricks[0].motion.is_moving());
        assert!(!bricks[7].motion.is_moving());
    }

    #[test]
    fn test_features_change_properties_not_layout() {
        let pattern = LEVEL_PATTERNS[5];
        let full = build_bricks(pattern, WORLD_WIDTH, ALL);
        let plain = build_bricks(
            pattern,
            WORLD_WIDTH,
            BuildOptions {
                enable_hp: false,
                enable_moving: false,
            },
        );
        assert_eq!(full.len(), plain.len());
        for (a, b) in full.iter().zip(&plain) {
            assert_eq!((a.x, a.y, a.w, a.h), (b.x, b.y, b.w, b.h));
        }
        assert!(plain.iter().all(|b| b.hp == 1 && b.kind == BrickKind::Normal));
        assert!(plain.iter().all(|b| !b.motion.is_moving()));
        assert!(full.iter().any(|b| b.hp == 3));
    }

    #[test]
    fn test_sliding_amplitude_capped() {
        let pattern: &[&[i32]] = &[&[5]];
        let bricks = build_bricks(pattern, WORLD_WIDTH, ALL);
        match bricks[0].motion {
            BrickMotion::Sliding { amplitude, .. } => assert_eq!(amplitude, 30.0),
            BrickMotion::Static => panic!("expected sliding brick"),
        }
    }

    #[test]
    fn test_ragged_rows_treated_as_empty() {
        let pattern: &[&[i32]] = &[&[1, 1, 1], &[1]];
        assert_eq!(build_bricks(pattern, WORLD_WIDTH, ALL).len(), 4);
    }

    #[test]
    fn test_level_total_and_patterns() {
        let mut features = Features::default();
        assert_eq!(level_total(&features), 3);
        features.campaign = true;
        assert_eq!(level_total(&features), 10);

        for pattern in LEVEL_PATTERNS {
            assert!(!build_bricks(pattern, WORLD_WIDTH, ALL).is_empty());
        }
        // Level 7 carries indestructible bricks
        assert!(
            build_bricks(LEVEL_PATTERNS[6], WORLD_WIDTH, ALL)
                .iter()
                .any(|b| b.kind == BrickKind::Indestructible)
        );
    }
}
