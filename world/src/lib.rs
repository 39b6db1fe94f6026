#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative room state management for Escape Room.
//!
//! [`Room`] owns the grid geometry, the player position, the hidden traps, the
//! prizes, and the step counter, and implements the [`Board`] contract the
//! command engine drives. Every outcome is a score delta; nothing in here
//! fails once the room has been built.

mod config;
mod layout;

use std::collections::{BTreeSet, HashSet};

use escape_room_core::{Board, Cell, Offset, Score};
use log::{debug, info};

pub use config::{RoomConfig, RoomConfigError, Scoring};
pub use layout::{Layout, WallSegment};

/// Represents the authoritative escape room.
#[derive(Clone, Debug)]
pub struct Room {
    config: RoomConfig,
    layout: Layout,
    walls: HashSet<WallSegment>,
    traps: BTreeSet<Cell>,
    prizes: BTreeSet<Cell>,
    player: Cell,
    steps: u32,
}

impl Room {
    /// Creates a room with a randomly generated layout.
    pub fn generate(config: RoomConfig, seed: u64) -> Result<Self, RoomConfigError> {
        config.validate()?;
        let layout = Layout::generate(&config, seed);
        debug!(
            "generated room {}x{} with seed {seed}: {} walls, {} traps, {} prizes",
            config.columns,
            config.rows,
            layout.walls.len(),
            layout.traps.len(),
            layout.prizes.len()
        );
        Self::with_layout(config, layout)
    }

    /// Creates a room from an explicit layout.
    pub fn with_layout(config: RoomConfig, layout: Layout) -> Result<Self, RoomConfigError> {
        config.validate()?;
        layout.validate(&config)?;
        let player = config.start();
        Ok(Self {
            walls: layout.walls.iter().copied().collect(),
            traps: layout.traps.iter().copied().collect(),
            prizes: layout.prizes.iter().copied().collect(),
            player,
            steps: 0,
            config,
            layout,
        })
    }

    fn restore_layout(&mut self) {
        self.traps = self.layout.traps.iter().copied().collect();
        self.prizes = self.layout.prizes.iter().copied().collect();
        self.player = self.config.start();
        self.steps = 0;
    }

    fn blocked_by_wall(&self, from: Cell, offset: Offset) -> bool {
        let mut cursor = from;
        let horizontal = Offset::new(offset.dx().signum(), 0);
        for _ in 0..offset.dx().unsigned_abs() {
            let next = cursor.offset_by(horizontal);
            if self.walls.contains(&WallSegment::between(cursor, next)) {
                return true;
            }
            cursor = next;
        }

        let vertical = Offset::new(0, offset.dy().signum());
        for _ in 0..offset.dy().unsigned_abs() {
            let next = cursor.offset_by(vertical);
            if self.walls.contains(&WallSegment::between(cursor, next)) {
                return true;
            }
            cursor = next;
        }

        false
    }
}

impl Board for Room {
    fn move_player(&mut self, offset: Offset) -> Score {
        if offset.is_zero() {
            debug!("ignoring zero-length move at {}", self.player);
            return Score::ZERO;
        }

        let destination = self.player.offset_by(offset);
        if !self.config.contains(destination) {
            debug!("move from {} to {destination} leaves the grid", self.player);
            return Score::penalty(self.config.scoring.off_grid);
        }

        if self.blocked_by_wall(self.player, offset) {
            debug!("move from {} to {destination} hits a wall", self.player);
            return Score::penalty(self.config.scoring.wall);
        }

        self.player = destination;
        self.steps = self.steps.saturating_add(1);
        Score::ZERO
    }

    fn is_trap(&self, cell: Cell) -> bool {
        self.traps.contains(&cell)
    }

    fn pickup_prize(&mut self) -> Score {
        if self.prizes.remove(&self.player) {
            debug!("picked up prize at {}", self.player);
            Score::reward(self.config.scoring.prize)
        } else {
            Score::penalty(self.config.scoring.prize)
        }
    }

    fn spring_trap(&mut self, cell: Cell) -> Score {
        if self.traps.remove(&cell) {
            debug!("sprang trap at {cell}");
            Score::reward(self.config.scoring.trap)
        } else {
            Score::penalty(self.config.scoring.trap)
        }
    }

    fn replay(&mut self) -> Score {
        info!("replaying room after {} steps", self.steps);
        self.restore_layout();
        Score::penalty(self.config.scoring.replay)
    }

    fn end_game(&mut self) -> Score {
        if self.player.column() >= self.config.goal_column() {
            Score::reward(self.config.scoring.goal)
        } else {
            Score::penalty(self.config.scoring.goal)
        }
    }

    fn steps(&self) -> u32 {
        self.steps
    }

    fn player_cell(&self) -> Cell {
        self.player
    }
}

/// Query functions that provide read-only access to the room state.
pub mod query {
    use escape_room_core::Cell;

    use super::{Room, RoomConfig, WallSegment};

    /// Provides read-only access to the configuration the room was built from.
    #[must_use]
    pub fn config(room: &Room) -> &RoomConfig {
        &room.config
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(room: &Room) -> Cell {
        room.player
    }

    /// Cell the player returns to on replay.
    #[must_use]
    pub fn start(room: &Room) -> Cell {
        room.config.start()
    }

    /// Wall segments in deterministic order.
    #[must_use]
    pub fn walls(room: &Room) -> &[WallSegment] {
        &room.layout.walls
    }

    /// Reports whether a wall separates the two cells.
    #[must_use]
    pub fn has_wall_between(room: &Room, a: Cell, b: Cell) -> bool {
        room.walls.contains(&WallSegment::between(a, b))
    }

    /// Armed traps in deterministic order.
    pub fn traps(room: &Room) -> impl Iterator<Item = Cell> + '_ {
        room.traps.iter().copied()
    }

    /// Uncollected prizes in deterministic order.
    pub fn prizes(room: &Room) -> impl Iterator<Item = Cell> + '_ {
        room.prizes.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room(columns: u32, rows: u32) -> RoomConfig {
        RoomConfig {
            columns,
            rows,
            walls: 0,
            traps: 0,
            prizes: 0,
            ..RoomConfig::default()
        }
    }

    fn room_with(config: RoomConfig, layout: Layout) -> Room {
        Room::with_layout(config, layout).expect("valid layout")
    }

    #[test]
    fn player_starts_at_configured_cell() {
        let config = RoomConfig {
            start_column: 1,
            start_row: 2,
            ..open_room(4, 4)
        };
        let room = room_with(config, Layout::default());
        assert_eq!(room.player_cell(), Cell::new(1, 2));
        assert_eq!(room.steps(), 0);
    }

    #[test]
    fn successful_move_counts_one_step() {
        let mut room = room_with(open_room(4, 3), Layout::default());

        assert_eq!(room.move_player(Offset::new(1, 0)), Score::ZERO);
        assert_eq!(room.move_player(Offset::new(2, 0)), Score::ZERO);

        assert_eq!(room.player_cell(), Cell::new(3, 0));
        assert_eq!(room.steps(), 2, "a jump counts as a single step");
    }

    #[test]
    fn off_grid_move_is_penalised_without_moving() {
        let mut room = room_with(open_room(4, 3), Layout::default());

        assert_eq!(room.move_player(Offset::new(-1, 0)), Score::penalty(5));
        assert_eq!(room.move_player(Offset::new(0, -2)), Score::penalty(5));

        assert_eq!(room.player_cell(), Cell::new(0, 0));
        assert_eq!(room.steps(), 0);
    }

    #[test]
    fn zero_move_is_free_and_uncounted() {
        let mut room = room_with(open_room(4, 3), Layout::default());
        assert_eq!(room.move_player(Offset::ZERO), Score::ZERO);
        assert_eq!(room.steps(), 0);
    }

    #[test]
    fn walls_block_moves_and_jumps() {
        let layout = Layout {
            walls: vec![WallSegment::between(Cell::new(1, 0), Cell::new(2, 0))],
            ..Layout::default()
        };
        let mut room = room_with(open_room(4, 3), layout);

        assert_eq!(room.move_player(Offset::new(1, 0)), Score::ZERO);
        assert_eq!(room.move_player(Offset::new(1, 0)), Score::penalty(5));
        assert_eq!(room.player_cell(), Cell::new(1, 0));

        room.restore_layout();
        assert_eq!(
            room.move_player(Offset::new(2, 0)),
            Score::penalty(5),
            "jumps cannot clear walls"
        );
        assert_eq!(room.player_cell(), Cell::new(0, 0));
        assert_eq!(room.move_player(Offset::new(0, 2)), Score::ZERO);
        assert_eq!(room.steps(), 1);
    }

    #[test]
    fn pickup_rewards_once_then_penalises() {
        let layout = Layout {
            prizes: vec![Cell::new(1, 0)],
            ..Layout::default()
        };
        let mut room = room_with(open_room(4, 3), layout);

        assert_eq!(room.pickup_prize(), Score::penalty(10));
        let _ = room.move_player(Offset::new(1, 0));
        assert_eq!(room.pickup_prize(), Score::reward(10));
        assert_eq!(room.pickup_prize(), Score::penalty(10));
        assert_eq!(query::prizes(&room).count(), 0);
    }

    #[test]
    fn spring_targets_absolute_cell() {
        let layout = Layout {
            traps: vec![Cell::new(0, 1)],
            ..Layout::default()
        };
        let mut room = room_with(open_room(4, 3), layout);

        assert!(room.is_trap(Cell::new(0, 1)));
        assert!(!room.is_trap(Cell::new(0, -1)));
        assert_eq!(room.spring_trap(Cell::new(1, 0)), Score::penalty(5));
        assert_eq!(room.spring_trap(Cell::new(0, 1)), Score::reward(5));
        assert!(!room.is_trap(Cell::new(0, 1)));
    }

    #[test]
    fn replay_restores_original_layout() {
        let layout = Layout {
            traps: vec![Cell::new(2, 0)],
            prizes: vec![Cell::new(1, 0)],
            ..Layout::default()
        };
        let mut room = room_with(open_room(4, 3), layout);

        let _ = room.move_player(Offset::new(1, 0));
        let _ = room.pickup_prize();
        let _ = room.spring_trap(Cell::new(2, 0));

        assert_eq!(room.replay(), Score::ZERO);
        assert_eq!(room.player_cell(), Cell::new(0, 0));
        assert_eq!(room.steps(), 0);
        assert_eq!(query::prizes(&room).collect::<Vec<_>>(), vec![Cell::new(1, 0)]);
        assert_eq!(query::traps(&room).collect::<Vec<_>>(), vec![Cell::new(2, 0)]);
    }

    #[test]
    fn replay_charges_configured_penalty() {
        let mut config = open_room(3, 3);
        config.scoring.replay = 2;
        let mut room = room_with(config, Layout::default());
        assert_eq!(room.replay(), Score::penalty(2));
    }

    #[test]
    fn end_game_rewards_reaching_far_column() {
        let mut room = room_with(open_room(3, 2), Layout::default());
        assert_eq!(room.end_game(), Score::penalty(10));

        let _ = room.move_player(Offset::new(2, 0));
        assert_eq!(room.end_game(), Score::reward(10));
    }

    #[test]
    fn generated_rooms_match_for_same_seed() {
        let first = Room::generate(RoomConfig::default(), 11).expect("default config is valid");
        let second = Room::generate(RoomConfig::default(), 11).expect("default config is valid");

        assert_eq!(query::walls(&first), query::walls(&second));
        assert_eq!(
            query::traps(&first).collect::<Vec<_>>(),
            query::traps(&second).collect::<Vec<_>>()
        );
        assert_eq!(query::player(&first), query::start(&first));
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let layout = Layout {
            traps: vec![Cell::new(9, 9)],
            ..Layout::default()
        };
        assert!(Room::with_layout(open_room(3, 3), layout).is_err());
    }
}
