#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Escape Room engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative board, and the command engine. Adapters hand textual commands
//! to the engine, the engine resolves them into [`Action`] values through the
//! [`ActionTable`], drives a [`Board`] implementation, and broadcasts [`Event`]
//! values describing every observable outcome. Every board interaction yields a
//! [`Score`] delta; failure is expressed through the score economy rather than
//! through errors.

use std::{
    collections::HashMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg},
};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to EscapeRoom!";

/// Short briefing shown below the banner.
pub const WELCOME_BRIEFING: &str = "Get to the other side of the room, avoiding walls and invisible traps,\n\
     pick up all the prizes.";

/// Fixed command reference displayed in response to [`Action::Help`].
pub const HELP_LINES: [&str; 9] = [
    "Type any of the following commands to navigate the game.",
    "right, left, up, down: if you try to go off grid or bump into wall, score decreases",
    "jumpright, jumpleft, jumpup, jumpdown: jump over 1 space, you cannot jump over walls",
    "(J)ump: jump 2 spaces in the direction you moved last",
    "(P)ickup: score increases, if there is no prize, penalty",
    "(S)pring: attempts to spring a trap one space in the direction you moved last, if none exists, penalty",
    "(H)elp: display all possible commands",
    "(Q)uit: reach the far right wall and the score increases, quitting anywhere else is a penalty",
    "(Rep)lay: shows number of player steps and resets the board, you or another player can play the same board",
];

/// Returns the arithmetic sign of `value` as -1, 0, or 1.
#[must_use]
pub const fn sign(value: i32) -> i32 {
    if value > 0 {
        1
    } else if value < 0 {
        -1
    } else {
        0
    }
}

/// Signed score value used both for per-action deltas and running totals.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Score(i32);

impl Score {
    /// Neutral score that leaves totals unchanged.
    pub const ZERO: Self = Self(0);

    /// Wraps the provided raw score value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Creates a positive reward worth `amount` points.
    #[must_use]
    pub const fn reward(amount: u32) -> Self {
        Self(saturate(amount))
    }

    /// Creates a negative penalty worth `amount` points.
    #[must_use]
    pub const fn penalty(amount: u32) -> Self {
        Self(-saturate(amount))
    }

    /// Retrieves the raw score value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

const fn saturate(amount: u32) -> i32 {
    if amount > i32::MAX as u32 {
        i32::MAX
    } else {
        amount as i32
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Neg for Score {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relative displacement measured in whole grid units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    dx: i32,
    dy: i32,
}

impl Offset {
    /// Displacement that leaves the player in place.
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    /// Creates a new offset from column and row displacements.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Column displacement; positive values point right.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Row displacement; positive values point down.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Multiplies both axes by `factor`.
    #[must_use]
    pub const fn scaled(self, factor: i32) -> Self {
        Self {
            dx: self.dx.saturating_mul(factor),
            dy: self.dy.saturating_mul(factor),
        }
    }

    /// Reports whether the offset moves nowhere.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Sign-only memory of the most recent directional move.
///
/// Each axis holds -1, 0, or 1, so the facing is always one of the four unit
/// vectors or [`Facing::NONE`]. Magnitudes are never retained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facing {
    x: i32,
    y: i32,
}

impl Facing {
    /// Facing held before the player has moved.
    pub const NONE: Self = Self { x: 0, y: 0 };

    /// Derives the facing of a requested move from the sign of each axis.
    #[must_use]
    pub const fn from_offset(offset: Offset) -> Self {
        Self {
            x: sign(offset.dx),
            y: sign(offset.dy),
        }
    }

    /// Expresses the facing as a one-unit offset.
    #[must_use]
    pub const fn to_offset(self) -> Offset {
        Offset::new(self.x, self.y)
    }
}

/// Cardinal directions understood by the command vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing column indices.
    Right,
    /// Toward decreasing column indices.
    Left,
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
}

impl Direction {
    /// One-unit offset pointing in this direction.
    #[must_use]
    pub const fn unit(self) -> Offset {
        match self {
            Self::Right => Offset::new(1, 0),
            Self::Left => Offset::new(-1, 0),
            Self::Up => Offset::new(0, -1),
            Self::Down => Offset::new(0, 1),
        }
    }
}

/// Location of a grid cell. Coordinates are signed so that cells probed ahead
/// of the player may lie outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    column: i32,
    row: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Cell reached by applying `offset`.
    #[must_use]
    pub const fn offset_by(self, offset: Offset) -> Self {
        Self {
            column: self.column.saturating_add(offset.dx),
            row: self.row.saturating_add(offset.dy),
        }
    }

    /// Cell one unit ahead in the provided facing.
    #[must_use]
    pub const fn step(self, facing: Facing) -> Self {
        self.offset_by(facing.to_offset())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Closed set of actions the engine can dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move one unit in a direction.
    Move(Direction),
    /// Move two units in a direction.
    Jump(Direction),
    /// Move two units in the last recorded facing.
    JumpForward,
    /// Pick up a prize under the player.
    Pickup,
    /// Spring a trap one unit ahead of the player.
    Spring,
    /// Show the command reference.
    Help,
    /// Reset the board to its starting layout.
    Replay,
    /// Stop the session.
    Quit,
}

const ALIASES: [(&str, Action); 29] = [
    ("right", Action::Move(Direction::Right)),
    ("r", Action::Move(Direction::Right)),
    ("left", Action::Move(Direction::Left)),
    ("l", Action::Move(Direction::Left)),
    ("up", Action::Move(Direction::Up)),
    ("u", Action::Move(Direction::Up)),
    ("down", Action::Move(Direction::Down)),
    ("d", Action::Move(Direction::Down)),
    ("jumpright", Action::Jump(Direction::Right)),
    ("jr", Action::Jump(Direction::Right)),
    ("jumpleft", Action::Jump(Direction::Left)),
    ("jl", Action::Jump(Direction::Left)),
    ("jumpup", Action::Jump(Direction::Up)),
    ("ju", Action::Jump(Direction::Up)),
    ("jumpdown", Action::Jump(Direction::Down)),
    ("jd", Action::Jump(Direction::Down)),
    ("jump", Action::JumpForward),
    ("j", Action::JumpForward),
    ("pickup", Action::Pickup),
    ("p", Action::Pickup),
    ("spring", Action::Spring),
    ("s", Action::Spring),
    ("help", Action::Help),
    ("h", Action::Help),
    ("?", Action::Help),
    ("replay", Action::Replay),
    ("rep", Action::Replay),
    ("quit", Action::Quit),
    ("q", Action::Quit),
];

/// Static mapping from normalized command text to [`Action`] values.
#[derive(Clone, Debug)]
pub struct ActionTable {
    entries: HashMap<&'static str, Action>,
}

impl ActionTable {
    /// Builds the standard command vocabulary.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: ALIASES.iter().copied().collect(),
        }
    }

    /// Resolves normalized (trimmed, lower-case) command text.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<Action> {
        self.entries.get(text).copied()
    }

    /// Iterates over every accepted alias in declaration order.
    pub fn aliases(&self) -> impl Iterator<Item = &'static str> {
        ALIASES.iter().map(|(alias, _)| *alias)
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lower-cases and trims raw command text.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Board collaborator driven by the engine.
///
/// Every mutating operation returns the score delta it produced. Off-grid
/// moves, wall bumps, empty pickups, and missing traps resolve as penalties
/// rather than errors.
pub trait Board {
    /// Attempts to move the player by `offset`.
    fn move_player(&mut self, offset: Offset) -> Score;

    /// Reports whether `cell` holds an armed trap. Has no score effect.
    fn is_trap(&self, cell: Cell) -> bool;

    /// Collects the prize under the player, if any.
    fn pickup_prize(&mut self) -> Score;

    /// Springs the trap located at `cell`, if any.
    fn spring_trap(&mut self, cell: Cell) -> Score;

    /// Restores the starting layout, returning the player to the start cell.
    fn replay(&mut self) -> Score;

    /// Settles the session against the goal condition.
    fn end_game(&mut self) -> Score;

    /// Steps taken since the board was created or last replayed.
    fn steps(&self) -> u32;

    /// Cell currently occupied by the player.
    fn player_cell(&self) -> Cell;
}

/// Final settlement reported once the session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    /// Cumulative score including the end-of-game settlement.
    pub score: Score,
    /// Steps taken on the board when the session ended.
    pub steps: u32,
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "score={}", self.score)?;
        write!(f, "steps={}", self.steps)
    }
}

/// Events broadcast by the engine after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A board interaction produced a score delta.
    ScoreChanged {
        /// Action that triggered the board interaction.
        action: Action,
        /// Delta returned by the board.
        delta: Score,
        /// Cumulative score after applying the delta.
        total: Score,
    },
    /// The probe after a directional move found a trap ahead.
    TrapAhead {
        /// Cell holding the trap.
        cell: Cell,
    },
    /// The player asked for the command reference.
    HelpRequested,
    /// The board was restored to its starting layout.
    BoardReset {
        /// Steps taken in the discarded run.
        steps_discarded: u32,
    },
    /// Command text did not match the vocabulary.
    UnrecognizedCommand {
        /// Normalized text that failed to resolve.
        text: String,
    },
    /// The player asked to stop.
    QuitRequested,
    /// The session was settled.
    GameEnded {
        /// Final score and step count.
        report: FinalReport,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_matches_arithmetic_sign() {
        for value in [i32::MIN, -42, -1, 0, 1, 7, i32::MAX] {
            let expected = value.signum();
            assert_eq!(sign(value), expected);
            assert_eq!(sign(sign(value)), sign(value), "sign must be idempotent");
        }
    }

    #[test]
    fn facing_discards_magnitude() {
        let jump = Direction::Left.unit().scaled(2);
        assert_eq!(Facing::from_offset(jump), Facing::from_offset(Direction::Left.unit()));
        assert_eq!(Facing::from_offset(jump).to_offset(), Offset::new(-1, 0));
        assert_eq!(Facing::from_offset(Offset::ZERO), Facing::NONE);
    }

    #[test]
    fn every_alias_resolves() {
        let table = ActionTable::standard();
        for alias in table.aliases() {
            assert!(table.resolve(alias).is_some(), "alias `{alias}` did not resolve");
        }
        assert_eq!(table.resolve("jr"), Some(Action::Jump(Direction::Right)));
        assert_eq!(table.resolve("rep"), Some(Action::Replay));
        assert_eq!(table.resolve("?"), Some(Action::Help));
        assert_eq!(table.resolve("j"), Some(Action::JumpForward));
    }

    #[test]
    fn unknown_text_does_not_resolve() {
        let table = ActionTable::standard();
        assert_eq!(table.resolve("dance"), None);
        assert_eq!(table.resolve("RIGHT"), None, "resolution expects normalized text");
        assert_eq!(table.resolve(&normalize("  RIGHT ")), Some(Action::Move(Direction::Right)));
    }

    #[test]
    fn score_sums_and_saturates() {
        let total: Score = [Score::reward(10), Score::penalty(5), Score::ZERO]
            .into_iter()
            .sum();
        assert_eq!(total, Score::new(5));
        assert_eq!(Score::new(i32::MAX) + Score::reward(1), Score::new(i32::MAX));
        assert_eq!(-Score::reward(3), Score::penalty(3));
    }

    #[test]
    fn cell_step_follows_facing() {
        let origin = Cell::new(2, 3);
        let facing = Facing::from_offset(Direction::Up.unit());
        assert_eq!(origin.step(facing), Cell::new(2, 2));
        assert_eq!(origin.step(Facing::NONE), origin);
    }

    #[test]
    fn final_report_renders_key_value_lines() {
        let report = FinalReport {
            score: Score::new(-15),
            steps: 4,
        };
        assert_eq!(report.to_string(), "score=-15\nsteps=4");
    }

    #[test]
    fn cell_round_trips_through_bincode() {
        let cell = Cell::new(-1, 4);
        let bytes = bincode::serialize(&cell).expect("serialize");
        let restored: Cell = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, cell);
    }
}
