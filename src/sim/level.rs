//! Level definitions and the brick grid built from them
//!
//! A [`LevelDef`] is static data: a pattern matrix plus a palette. The grid
//! derives brick width from the world width and column count, then centers
//! itself horizontally. A level change always builds a new [`BrickGrid`];
//! grids are never patched across levels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::{Brick, BrickKind};
use crate::tuning::Tuning;

/// Palette used when a level does not bring its own
pub const FALLBACK_PALETTE: [u32; 4] = [0x4FC3F7, 0xFFA726, 0x66BB6A, 0xFF7043];

/// Static level layout
///
/// Pattern cells: 0 = empty, 1 = normal brick, 2 = strong brick. Rows or
/// columns missing from `pattern` are treated as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub rows: usize,
    pub cols: usize,
    /// Row colors as 0xRRGGBB, cycled by row index
    #[serde(default)]
    pub palette: Vec<u32>,
    pub pattern: Vec<Vec<u8>>,
}

impl LevelDef {
    /// Pattern value at a cell, 0 when out of range
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.pattern
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    /// Number of cells that produce a brick
    pub fn brick_count(&self) -> usize {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .filter(|&(r, c)| BrickKind::from_cell(self.cell(r, c)).is_some())
            .count()
    }
}

/// Parse a JSON array of level definitions
pub fn levels_from_json(json: &str) -> Result<Vec<LevelDef>, serde_json::Error> {
    serde_json::from_str(json)
}

/// The three stock levels
pub fn builtin_levels() -> Vec<LevelDef> {
    vec![
        LevelDef {
            rows: 6,
            cols: 11,
            palette: vec![0x4FC3F7, 0xFF7043, 0x66BB6A],
            pattern: vec![
                vec![0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
                vec![1, 1, 2, 1, 1, 2, 1, 1, 2, 1, 1],
                vec![1, 2, 1, 1, 2, 1, 1, 2, 1, 2, 1],
                vec![1, 1, 1, 2, 1, 1, 1, 2, 1, 1, 1],
                vec![1, 1, 2, 1, 1, 2, 1, 1, 2, 1, 1],
                vec![0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
            ],
        },
        LevelDef {
            rows: 7,
            cols: 12,
            palette: vec![0xF06292, 0x9575CD, 0xFFD54F],
            pattern: vec![
                vec![2, 0, 2, 0, 2, 0, 2, 0, 2, 0, 2, 0],
                vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
                vec![2, 0, 2, 0, 2, 0, 2, 0, 2, 0, 2, 0],
                vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
                vec![2, 0, 2, 0, 2, 0, 2, 0, 2, 0, 2, 0],
                vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
                vec![2, 0, 2, 0, 2, 0, 2, 0, 2, 0, 2, 0],
            ],
        },
        LevelDef {
            rows: 8,
            cols: 13,
            palette: vec![0x80DEEA, 0xA5D6A7, 0xEF9A9A, 0xFFCC80],
            pattern: vec![
                vec![0, 0, 1, 1, 1, 2, 2, 2, 1, 1, 1, 0, 0],
                vec![0, 1, 1, 2, 2, 1, 1, 1, 2, 2, 1, 1, 0],
                vec![1, 1, 2, 2, 1, 1, 2, 1, 1, 2, 2, 1, 1],
                vec![1, 2, 2, 1, 1, 2, 2, 2, 1, 1, 2, 2, 1],
                vec![1, 1, 2, 2, 1, 1, 2, 1, 1, 2, 2, 1, 1],
                vec![0, 1, 1, 2, 2, 1, 1, 1, 2, 2, 1, 1, 0],
                vec![0, 0, 1, 1, 1, 2, 2, 2, 1, 1, 1, 0, 0],
                vec![0, 0, 0, 1, 1, 1, 2, 1, 1, 1, 0, 0, 0],
            ],
        },
    ]
}

/// Outcome of damaging one brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrickHit {
    /// Brick survived with this many hit points left
    Damaged { hp: u8 },
    /// Brick removed from the grid
    Destroyed { center: Vec2 },
}

/// Positioned bricks for one level
#[derive(Debug, Clone)]
pub struct BrickGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Option<Brick>>>,
    brick_w: f32,
    brick_h: f32,
    padding: f32,
    offset_left: f32,
    offset_top: f32,
    initial: usize,
    remaining: usize,
}

impl BrickGrid {
    /// Lay out a level inside the world described by `tuning`
    pub fn build(level: &LevelDef, tuning: &Tuning) -> Self {
        let rows = level.rows;
        let cols = level.cols.max(1);
        let padding = tuning.brick_padding;
        let brick_h = tuning.brick_height;

        let gaps = (cols - 1) as f32 * padding;
        let brick_w = ((tuning.world_width - 2.0 * tuning.brick_margin - gaps) / cols as f32)
            .max(tuning.brick_min_width);

        // Re-center from the realized grid width
        let total_w = cols as f32 * brick_w + gaps;
        let offset_left =
            ((tuning.world_width - total_w) / 2.0).floor().max(tuning.brick_min_offset_left);
        let offset_top = tuning.brick_offset_top;

        let palette: &[u32] = if level.palette.is_empty() {
            &FALLBACK_PALETTE
        } else {
            &level.palette
        };

        let mut remaining = 0;
        let cells: Vec<Vec<Option<Brick>>> = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| {
                        let kind = BrickKind::from_cell(level.cell(r, c))?;
                        remaining += 1;
                        let rect = Rect::new(
                            offset_left + c as f32 * (brick_w + padding),
                            offset_top + r as f32 * (brick_h + padding),
                            brick_w,
                            brick_h,
                        );
                        Some(Brick::new(rect, kind, palette[r % palette.len()]))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            rows,
            cols,
            cells,
            brick_w,
            brick_h,
            padding,
            offset_left,
            offset_top,
            initial: remaining,
            remaining,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn brick_width(&self) -> f32 {
        self.brick_w
    }

    #[inline]
    pub fn offset_left(&self) -> f32 {
        self.offset_left
    }

    /// Horizontal and vertical distance between neighbouring cells
    pub fn cell_pitch(&self) -> Vec2 {
        Vec2::new(self.brick_w + self.padding, self.brick_h + self.padding)
    }

    /// Bricks still standing
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Bricks the level started with
    #[inline]
    pub fn initial(&self) -> usize {
        self.initial
    }

    /// Bricks removed so far
    #[inline]
    pub fn destroyed(&self) -> usize {
        self.initial - self.remaining
    }

    /// Estimated (row, col) under a point; may be outside the grid
    pub fn cell_of(&self, pos: Vec2) -> (i64, i64) {
        let pitch = self.cell_pitch();
        let col = ((pos.x - self.offset_left) / pitch.x).floor() as i64;
        let row = ((pos.y - self.offset_top) / pitch.y).floor() as i64;
        (row, col)
    }

    /// Alive brick at a cell, `None` for empty or out-of-range cells
    pub fn get(&self, row: i64, col: i64) -> Option<&Brick> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)?
            .get(col as usize)?
            .as_ref()
            .filter(|b| b.alive)
    }

    /// Take one hit point off the brick at a cell
    ///
    /// Returns `None` when there is no alive brick there.
    pub fn damage(&mut self, row: usize, col: usize) -> Option<BrickHit> {
        let slot = self.cells.get_mut(row)?.get_mut(col)?;
        let brick = slot.as_mut().filter(|b| b.alive)?;
        if brick.hp > 1 {
            brick.hp -= 1;
            return Some(BrickHit::Damaged { hp: brick.hp });
        }
        brick.hp = 0;
        brick.alive = false;
        let center = brick.rect.center();
        *slot = None;
        self.remaining -= 1;
        Some(BrickHit::Destroyed { center })
    }

    /// All alive bricks with their (row, col), row-major
    pub fn bricks(&self) -> impl Iterator<Item = (usize, usize, &Brick)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.as_ref().map(|b| (r, c, b)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny(pattern: Vec<Vec<u8>>) -> LevelDef {
        LevelDef {
            rows: pattern.len(),
            cols: pattern.first().map_or(0, Vec::len),
            palette: vec![0x111111, 0x222222],
            pattern,
        }
    }

    #[test]
    fn test_builtin_levels_counts() {
        let tuning = Tuning::default();
        for level in builtin_levels() {
            let grid = BrickGrid::build(&level, &tuning);
            assert_eq!(grid.remaining(), level.brick_count());
            assert_eq!(grid.initial(), grid.remaining());
            assert_eq!(grid.bricks().count(), grid.remaining());
        }
    }

    #[test]
    fn test_width_and_centering() {
        let tuning = Tuning::default();
        let grid = BrickGrid::build(&builtin_levels()[0], &tuning);
        // (800 - 70 - 10*8) / 11
        let expected_w = (800.0 - 70.0 - 80.0) / 11.0;
        assert!((grid.brick_width() - expected_w).abs() < 1e-4);
        let total = 11.0 * expected_w + 80.0;
        assert_eq!(grid.offset_left(), ((800.0 - total) / 2.0).floor());
    }

    #[test]
    fn test_min_width_and_min_offset() {
        let tuning = Tuning::default();
        let level = tiny(vec![vec![1; 40]]);
        let grid = BrickGrid::build(&level, &tuning);
        assert_eq!(grid.brick_width(), tuning.brick_min_width);
        // Realized grid overflows the world, so the offset floors at its minimum
        assert_eq!(grid.offset_left(), tuning.brick_min_offset_left);
    }

    #[test]
    fn test_strong_and_empty_cells() {
        let tuning = Tuning::default();
        let level = tiny(vec![vec![0, 1, 2], vec![2, 0, 7]]);
        let grid = BrickGrid::build(&level, &tuning);
        assert_eq!(grid.remaining(), 3);
        assert!(grid.get(0, 0).is_none());
        assert_eq!(grid.get(0, 1).map(|b| b.hp), Some(1));
        assert_eq!(grid.get(0, 2).map(|b| b.hp), Some(2));
        // Unknown pattern value is empty
        assert!(grid.get(1, 2).is_none());
        // Colors follow the row index
        assert_eq!(grid.get(0, 1).map(|b| b.color), Some(0x111111));
        assert_eq!(grid.get(1, 0).map(|b| b.color), Some(0x222222));
    }

    #[test]
    fn test_short_pattern_rows_are_empty() {
        let tuning = Tuning::default();
        let level = LevelDef {
            rows: 2,
            cols: 4,
            palette: Vec::new(),
            pattern: vec![vec![1, 1]],
        };
        let grid = BrickGrid::build(&level, &tuning);
        assert_eq!(grid.remaining(), 2);
        assert_eq!(grid.get(0, 0).map(|b| b.color), Some(FALLBACK_PALETTE[0]));
    }

    #[test]
    fn test_damage_strong_then_destroy() {
        let tuning = Tuning::default();
        let mut grid = BrickGrid::build(&tiny(vec![vec![2, 1]]), &tuning);
        assert_eq!(grid.damage(0, 0), Some(BrickHit::Damaged { hp: 1 }));
        assert_eq!(grid.remaining(), 2);
        assert!(matches!(grid.damage(0, 0), Some(BrickHit::Destroyed { .. })));
        assert_eq!(grid.remaining(), 1);
        assert_eq!(grid.destroyed(), 1);
        assert!(grid.get(0, 0).is_none());
        assert_eq!(grid.damage(0, 0), None);
    }

    #[test]
    fn test_out_of_range_cells_are_none() {
        let tuning = Tuning::default();
        let mut grid = BrickGrid::build(&tiny(vec![vec![1]]), &tuning);
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(0, -1).is_none());
        assert!(grid.get(5, 5).is_none());
        assert_eq!(grid.damage(3, 3), None);
    }

    #[test]
    fn test_cell_of_brick_center() {
        let tuning = Tuning::default();
        let grid = BrickGrid::build(&builtin_levels()[2], &tuning);
        for (r, c, brick) in grid.bricks() {
            assert_eq!(grid.cell_of(brick.rect.center()), (r as i64, c as i64));
        }
    }

    #[test]
    fn test_levels_from_json() {
        let json = r#"[{ "rows": 1, "cols": 2, "pattern": [[1, 2]] }]"#;
        let levels = levels_from_json(json).expect("valid level json");
        assert_eq!(levels.len(), 1);
        assert!(levels[0].palette.is_empty());
        assert_eq!(levels[0].brick_count(), 2);
    }
}
