//! Placement of walls, traps, and prizes within a room.

use std::collections::HashSet;

use escape_room_core::Cell;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{to_signed, RoomConfig, RoomConfigError};

/// Barrier on the edge shared by two orthogonally adjacent cells.
///
/// The pair is stored in ascending order so that a segment compares equal
/// regardless of which side it was described from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallSegment {
    first: Cell,
    second: Cell,
}

impl WallSegment {
    /// Creates the segment separating `a` from `b`.
    #[must_use]
    pub fn between(a: Cell, b: Cell) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    fn is_adjacent(&self) -> bool {
        let columns = self.first.column().abs_diff(self.second.column());
        let rows = self.first.row().abs_diff(self.second.row());
        columns.checked_add(rows) == Some(1)
    }
}

/// Complete placement of everything a room contains besides the player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// Wall segments between adjacent cells.
    pub walls: Vec<WallSegment>,
    /// Cells holding hidden traps.
    pub traps: Vec<Cell>,
    /// Cells holding prizes.
    pub prizes: Vec<Cell>,
}

impl Layout {
    /// Randomly places the configured walls, traps, and prizes.
    ///
    /// The same configuration and seed always produce the same layout. Traps
    /// and prizes occupy distinct cells and never the start cell.
    #[must_use]
    pub fn generate(config: &RoomConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let start = config.start();

        let mut cells: Vec<Cell> = grid_cells(config)
            .filter(|cell| *cell != start)
            .collect();
        cells.shuffle(&mut rng);
        let mut cells = cells.into_iter();
        let traps: Vec<Cell> = cells.by_ref().take(count(config.traps)).collect();
        let prizes: Vec<Cell> = cells.take(count(config.prizes)).collect();

        let mut edges: Vec<WallSegment> = interior_edges(config).collect();
        edges.shuffle(&mut rng);
        edges.truncate(count(config.walls));
        edges.sort();

        Self {
            walls: edges,
            traps,
            prizes,
        }
    }

    /// Checks that every item sits on its own usable cell of `config`'s grid.
    pub fn validate(&self, config: &RoomConfig) -> Result<(), RoomConfigError> {
        let start = config.start();
        let mut occupied = HashSet::new();
        for (item, cells) in [("trap", &self.traps), ("prize", &self.prizes)] {
            if let Some(cell) = cells.iter().find(|cell| {
                !config.contains(**cell) || **cell == start || !occupied.insert(**cell)
            }) {
                return Err(RoomConfigError::UnusableCell { item, cell: *cell });
            }
        }

        if let Some(wall) = self.walls.iter().find(|wall| {
            !wall.is_adjacent() || !config.contains(wall.first) || !config.contains(wall.second)
        }) {
            return Err(RoomConfigError::DetachedWall {
                first: wall.first,
                second: wall.second,
            });
        }

        Ok(())
    }
}

fn count(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn grid_cells(config: &RoomConfig) -> impl Iterator<Item = Cell> {
    let columns = to_signed(config.columns);
    let rows = to_signed(config.rows);
    (0..rows).flat_map(move |row| (0..columns).map(move |column| Cell::new(column, row)))
}

fn interior_edges(config: &RoomConfig) -> impl Iterator<Item = WallSegment> + '_ {
    grid_cells(config).flat_map(move |cell| {
        let right = Cell::new(cell.column() + 1, cell.row());
        let below = Cell::new(cell.column(), cell.row() + 1);
        [right, below]
            .into_iter()
            .filter(move |neighbour| config.contains(*neighbour))
            .map(move |neighbour| WallSegment::between(cell, neighbour))
    })
}
