#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command engine that turns textual commands into board interactions.
//!
//! The engine is stateless apart from its alias table. All mutable game state
//! lives in a [`GameSession`] that callers pass by exclusive reference, next to
//! the [`Board`] being played. Every score delta the board returns is folded
//! into the session and broadcast as an [`Event`].

use escape_room_core::{
    normalize, Action, ActionTable, Board, Event, Facing, FinalReport, Offset, Score,
};
use log::{debug, info};

const JUMP_DISTANCE: i32 = 2;

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Commands are being accepted.
    Running,
    /// The player quit or input ran out; no further commands are processed.
    Ended,
}

/// Mutable state owned by a single play session.
#[derive(Clone, Debug)]
pub struct GameSession {
    score: Score,
    facing: Facing,
    state: SessionState,
    report: Option<FinalReport>,
}

impl GameSession {
    /// Creates a running session with zero score and no facing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: Score::ZERO,
            facing: Facing::NONE,
            state: SessionState::Running,
            report: None,
        }
    }

    /// Cumulative score so far. Persists across replays.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Direction of the most recent directional move or jump.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Reports whether commands are still accepted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Settlement produced by [`Engine::end`], once it has run.
    #[must_use]
    pub const fn report(&self) -> Option<FinalReport> {
        self.report
    }

    fn apply(&mut self, action: Action, delta: Score, out: &mut Vec<Event>) {
        self.score += delta;
        out.push(Event::ScoreChanged {
            action,
            delta,
            total: self.score,
        });
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatches commands against a board on behalf of a session.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    actions: ActionTable,
}

impl Engine {
    /// Creates an engine using the standard command vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: ActionTable::standard(),
        }
    }

    /// Vocabulary used to resolve command text.
    #[must_use]
    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Performs the action named by a normalized command.
    ///
    /// Text outside the vocabulary produces a single
    /// [`Event::UnrecognizedCommand`] and leaves the session untouched.
    /// Commands arriving after the session ended are ignored.
    pub fn handle<B>(
        &self,
        session: &mut GameSession,
        board: &mut B,
        command: &str,
        out: &mut Vec<Event>,
    ) where
        B: Board + ?Sized,
    {
        if !session.is_running() {
            debug!("ignoring `{command}` after the session ended");
            return;
        }

        match self.actions.resolve(command) {
            Some(action) => self.dispatch(session, board, action, out),
            None => out.push(Event::UnrecognizedCommand {
                text: command.to_owned(),
            }),
        }
    }

    /// Performs an already resolved action.
    pub fn dispatch<B>(
        &self,
        session: &mut GameSession,
        board: &mut B,
        action: Action,
        out: &mut Vec<Event>,
    ) where
        B: Board + ?Sized,
    {
        debug!("dispatching {action:?} facing {:?}", session.facing);
        match action {
            Action::Move(direction) => {
                attempt_move(session, board, action, direction.unit(), out);
            }
            Action::Jump(direction) => {
                attempt_move(
                    session,
                    board,
                    action,
                    direction.unit().scaled(JUMP_DISTANCE),
                    out,
                );
            }
            Action::JumpForward => {
                let offset = session.facing.to_offset().scaled(JUMP_DISTANCE);
                let delta = board.move_player(offset);
                session.apply(action, delta, out);
            }
            Action::Pickup => {
                let delta = board.pickup_prize();
                session.apply(action, delta, out);
            }
            Action::Spring => {
                let target = board.player_cell().step(session.facing);
                let delta = board.spring_trap(target);
                session.apply(action, delta, out);
            }
            Action::Help => out.push(Event::HelpRequested),
            Action::Replay => {
                let steps_discarded = board.steps();
                let delta = board.replay();
                out.push(Event::BoardReset { steps_discarded });
                session.apply(action, delta, out);
            }
            Action::Quit => {
                session.state = SessionState::Ended;
                out.push(Event::QuitRequested);
            }
        }
    }

    /// Feeds commands until the session ends or the source runs dry, then
    /// settles the session.
    pub fn run<B, I>(
        &self,
        session: &mut GameSession,
        board: &mut B,
        commands: I,
        out: &mut Vec<Event>,
    ) -> FinalReport
    where
        B: Board + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut commands = commands.into_iter();
        while session.is_running() {
            let Some(command) = commands.next() else {
                debug!("command source exhausted");
                break;
            };
            self.handle(session, board, &normalize(command.as_ref()), out);
        }

        self.end(session, board, out)
    }

    /// Settles the session against the goal condition and reports the result.
    ///
    /// Settlement happens once; later calls return the stored report without
    /// consulting the board again.
    pub fn end<B>(
        &self,
        session: &mut GameSession,
        board: &mut B,
        out: &mut Vec<Event>,
    ) -> FinalReport
    where
        B: Board + ?Sized,
    {
        if let Some(report) = session.report {
            return report;
        }

        session.state = SessionState::Ended;
        session.score += board.end_game();
        let report = FinalReport {
            score: session.score,
            steps: board.steps(),
        };
        info!("session settled with score {} after {} steps", report.score, report.steps);
        session.report = Some(report);
        out.push(Event::GameEnded { report });
        report
    }
}

fn attempt_move<B>(
    session: &mut GameSession,
    board: &mut B,
    action: Action,
    offset: Offset,
    out: &mut Vec<Event>,
) where
    B: Board + ?Sized,
{
    let delta = board.move_player(offset);
    session.apply(action, delta, out);
    session.facing = Facing::from_offset(offset);

    let ahead = board.player_cell().step(session.facing);
    if board.is_trap(ahead) {
        out.push(Event::TrapAhead { cell: ahead });
    }
}
