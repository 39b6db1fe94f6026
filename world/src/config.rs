//! Room geometry, population, and scoring configuration.

use std::{fs, io, path::Path};

use escape_room_core::Cell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_COLUMNS: u32 = 8;
const DEFAULT_ROWS: u32 = 5;
const DEFAULT_WALLS: u32 = 20;
const DEFAULT_TRAPS: u32 = 5;
const DEFAULT_PRIZES: u32 = 3;

/// Tunable description of a room, usually loaded from TOML.
///
/// Missing keys fall back to their defaults, so an empty document yields the
/// standard eight by five room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoomConfig {
    /// Number of columns in the grid. The rightmost column is the goal.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Column the player starts in.
    pub start_column: u32,
    /// Row the player starts in.
    pub start_row: u32,
    /// Number of wall segments placed between adjacent cells.
    pub walls: u32,
    /// Number of hidden traps.
    pub traps: u32,
    /// Number of prizes.
    pub prizes: u32,
    /// Reward and penalty magnitudes.
    pub scoring: Scoring,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            start_column: 0,
            start_row: 0,
            walls: DEFAULT_WALLS,
            traps: DEFAULT_TRAPS,
            prizes: DEFAULT_PRIZES,
            scoring: Scoring::default(),
        }
    }
}

/// Magnitudes applied by the board when resolving actions.
///
/// Each value is used as a reward when the action succeeds and as a penalty
/// when it does not, except for the move penalties which only ever subtract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scoring {
    /// Prize pickup reward, and penalty for picking up nothing.
    pub prize: u32,
    /// Trap springing reward, and penalty for springing nothing.
    pub trap: u32,
    /// Goal settlement reward, and penalty for quitting short of the goal.
    pub goal: u32,
    /// Penalty for a move that would leave the grid.
    pub off_grid: u32,
    /// Penalty for a move blocked by a wall.
    pub wall: u32,
    /// Penalty charged for resetting the board.
    pub replay: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            prize: 10,
            trap: 5,
            goal: 10,
            off_grid: 5,
            wall: 5,
            replay: 0,
        }
    }
}

/// Reasons a room configuration or layout may be rejected.
#[derive(Debug, Error)]
pub enum RoomConfigError {
    /// The configuration file could not be read.
    #[error("failed to read room configuration: {0}")]
    Io(#[from] io::Error),
    /// The configuration was not valid TOML for a room.
    #[error("failed to parse room configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The grid has no cells.
    #[error("room must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The start cell lies outside the grid.
    #[error("start cell {cell} lies outside the {columns}x{rows} grid")]
    StartOutOfBounds {
        /// Configured start cell.
        cell: Cell,
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// More items were requested than the grid can hold.
    #[error("requested {requested} {item} but only {available} slots are available")]
    TooManyItems {
        /// Kind of item being placed.
        item: &'static str,
        /// Number of items requested.
        requested: u32,
        /// Number of slots available.
        available: u32,
    },
    /// A layout referenced a cell outside the grid or the start cell.
    #[error("layout places {item} at {cell}, which is not a usable cell")]
    UnusableCell {
        /// Kind of item being placed.
        item: &'static str,
        /// Offending cell.
        cell: Cell,
    },
    /// A wall segment did not join two orthogonally adjacent grid cells.
    #[error("wall between {first} and {second} does not join adjacent grid cells")]
    DetachedWall {
        /// First cell of the segment.
        first: Cell,
        /// Second cell of the segment.
        second: Cell,
    },
}

impl RoomConfig {
    /// Loads and validates a configuration from the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RoomConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, RoomConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks geometry and population limits.
    pub fn validate(&self) -> Result<(), RoomConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(RoomConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }

        if self.start_column >= self.columns || self.start_row >= self.rows {
            return Err(RoomConfigError::StartOutOfBounds {
                cell: self.start(),
                columns: self.columns,
                rows: self.rows,
            });
        }

        let free_cells = self.cell_count().saturating_sub(1);
        let items = self.traps.saturating_add(self.prizes);
        if items > free_cells {
            return Err(RoomConfigError::TooManyItems {
                item: "traps and prizes",
                requested: items,
                available: free_cells,
            });
        }

        let edges = self.interior_edge_count();
        if self.walls > edges {
            return Err(RoomConfigError::TooManyItems {
                item: "walls",
                requested: self.walls,
                available: edges,
            });
        }

        Ok(())
    }

    /// Cell the player occupies when the board is created or replayed.
    #[must_use]
    pub fn start(&self) -> Cell {
        Cell::new(to_signed(self.start_column), to_signed(self.start_row))
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.column() >= 0
            && cell.row() >= 0
            && cell.column() < to_signed(self.columns)
            && cell.row() < to_signed(self.rows)
    }

    /// Column the player must reach to satisfy the goal condition.
    #[must_use]
    pub fn goal_column(&self) -> i32 {
        to_signed(self.columns).saturating_sub(1)
    }

    fn cell_count(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    fn interior_edge_count(&self) -> u32 {
        let horizontal = self.columns.saturating_sub(1).saturating_mul(self.rows);
        let vertical = self.rows.saturating_sub(1).saturating_mul(self.columns);
        horizontal.saturating_add(vertical)
    }
}

pub(crate) fn to_signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
