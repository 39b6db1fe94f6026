//! Text presentation of engine events and the room layout.

use std::{
    fmt::Write as _,
    io::{self, Write},
};

use escape_room_core::{Action, Cell, Event, HELP_LINES};
use escape_room_world::{query, Room};

const UNRECOGNIZED_NOTICE: &str = "That is not a recognized command";
const TRAP_NOTICE: &str = "A TRAP IS AHEAD";

/// Writes event notices and, optionally, the room after each batch.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Presenter {
    show_board: bool,
    reveal_traps: bool,
}

impl Presenter {
    pub(crate) const fn new(show_board: bool, reveal_traps: bool) -> Self {
        Self {
            show_board,
            reveal_traps,
        }
    }

    /// Drains `events`, writing one notice per event that has one.
    pub(crate) fn present<W: Write>(
        &self,
        out: &mut W,
        room: &Room,
        events: &mut Vec<Event>,
    ) -> io::Result<()> {
        let mut ended = false;
        for event in events.drain(..) {
            ended |= matches!(event, Event::GameEnded { .. });
            if let Some(notice) = describe(&event) {
                writeln!(out, "{notice}")?;
            }
        }

        if self.show_board && !ended {
            write!(out, "{}", draw_room(room, self.reveal_traps))?;
        }
        Ok(())
    }
}

/// Player-facing text for a single event.
pub(crate) fn describe(event: &Event) -> Option<String> {
    match event {
        Event::ScoreChanged {
            action,
            delta,
            total,
        } => {
            if delta.get() == 0 {
                None
            } else {
                Some(format!(
                    "{} {:+} points, score is now {total}",
                    action_label(*action),
                    delta.get()
                ))
            }
        }
        Event::TrapAhead { .. } => Some(TRAP_NOTICE.to_owned()),
        Event::HelpRequested => Some(HELP_LINES.join("\n")),
        Event::BoardReset { steps_discarded } => Some(format!(
            "You took {steps_discarded} steps. The room has been reset."
        )),
        Event::UnrecognizedCommand { .. } => Some(UNRECOGNIZED_NOTICE.to_owned()),
        Event::QuitRequested => None,
        Event::GameEnded { report } => Some(report.to_string()),
    }
}

fn count(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn action_label(action: Action) -> &'static str {
    match action {
        Action::Move(_) => "Move:",
        Action::Jump(_) | Action::JumpForward => "Jump:",
        Action::Pickup => "Pickup:",
        Action::Spring => "Spring:",
        Action::Replay => "Replay:",
        Action::Help | Action::Quit => "Score:",
    }
}

/// Renders the room as a character grid.
///
/// `@` marks the player, `$` a prize, and `^` a trap when `reveal_traps` is
/// set. Wall segments between cells appear as `|` and `---`.
pub(crate) fn draw_room(room: &Room, reveal_traps: bool) -> String {
    let config = query::config(room);
    let columns = i32::try_from(config.columns).unwrap_or(i32::MAX);
    let rows = i32::try_from(config.rows).unwrap_or(i32::MAX);
    let player = query::player(room);
    let prizes: Vec<Cell> = query::prizes(room).collect();
    let traps: Vec<Cell> = if reveal_traps {
        query::traps(room).collect()
    } else {
        Vec::new()
    };

    let border = format!("+{}\n", "---+".repeat(count(config.columns)));
    let mut drawing = border.clone();
    for row in 0..rows {
        drawing.push('|');
        for column in 0..columns {
            let cell = Cell::new(column, row);
            let glyph = if cell == player {
                '@'
            } else if prizes.contains(&cell) {
                '$'
            } else if traps.contains(&cell) {
                '^'
            } else {
                '.'
            };
            let right = Cell::new(column + 1, row);
            let separator = if column + 1 == columns || query::has_wall_between(room, cell, right) {
                '|'
            } else {
                ' '
            };
            let _ = write!(drawing, " {glyph} {separator}");
        }
        drawing.push('\n');

        if row + 1 == rows {
            break;
        }
        drawing.push('+');
        for column in 0..columns {
            let cell = Cell::new(column, row);
            let below = Cell::new(column, row + 1);
            let segment = if query::has_wall_between(room, cell, below) {
                "---"
            } else {
                "   "
            };
            drawing.push_str(segment);
            drawing.push('+');
        }
        drawing.push('\n');
    }
    drawing.push_str(&border);
    drawing
}
