use escape_room_core::{Board, Cell, Event, Facing, Score};
use escape_room_system_engine::{Engine, GameSession};
use escape_room_world::{query, Layout, Room, RoomConfig, WallSegment};

fn open_config() -> RoomConfig {
    RoomConfig {
        walls: 0,
        traps: 0,
        prizes: 0,
        ..RoomConfig::default()
    }
}

fn build(config: RoomConfig, layout: Layout) -> Room {
    Room::with_layout(config, layout).expect("valid room")
}

#[test]
fn pickup_then_failed_spring_scores_every_delta() {
    let mut room = build(
        open_config(),
        Layout {
            prizes: vec![Cell::new(2, 0)],
            ..Layout::default()
        },
    );
    let engine = Engine::new();
    let mut session = GameSession::new();
    let mut events = Vec::new();

    let report = engine.run(
        &mut session,
        &mut room,
        ["right", "right", "pickup", "spring", "quit"],
        &mut events,
    );

    // two free moves, +10 prize, -5 empty spring, -10 short of the goal column
    assert_eq!(report.score, Score::new(-5));
    assert_eq!(report.steps, 2);
    assert_eq!(query::prizes(&room).count(), 0);
}

#[test]
fn opening_jump_is_a_zero_move() {
    let mut room = build(open_config(), Layout::default());
    let engine = Engine::new();
    let mut session = GameSession::new();
    let mut events = Vec::new();

    let report = engine.run(&mut session, &mut room, ["jump"], &mut events);

    assert_eq!(session.facing(), Facing::NONE);
    assert_eq!(query::player(&room), Cell::new(0, 0));
    assert_eq!(report.steps, 0);
    assert_eq!(report.score, Score::penalty(10));
}

#[test]
fn spring_hits_trap_above_when_move_is_walled_off() {
    let config = RoomConfig {
        start_row: 2,
        ..open_config()
    };
    let mut room = build(
        config,
        Layout {
            traps: vec![Cell::new(0, 1)],
            walls: vec![WallSegment::between(Cell::new(0, 2), Cell::new(0, 1))],
            ..Layout::default()
        },
    );
    let engine = Engine::new();
    let mut session = GameSession::new();
    let mut events = Vec::new();

    engine.handle(&mut session, &mut room, "up", &mut events);
    engine.handle(&mut session, &mut room, "spring", &mut events);

    assert_eq!(
        events.last(),
        Some(&Event::ScoreChanged {
            action: escape_room_core::Action::Spring,
            delta: Score::reward(5),
            total: Score::ZERO,
        })
    );
    assert!(events.contains(&Event::TrapAhead {
        cell: Cell::new(0, 1)
    }));
    assert_eq!(query::traps(&room).count(), 0);
}

#[test]
fn spring_hits_trap_ahead_after_moving_up() {
    let config = RoomConfig {
        start_row: 2,
        ..open_config()
    };
    let mut room = build(
        config,
        Layout {
            traps: vec![Cell::new(0, 0)],
            ..Layout::default()
        },
    );
    let engine = Engine::new();
    let mut session = GameSession::new();
    let mut events = Vec::new();

    engine.handle(&mut session, &mut room, "up", &mut events);
    engine.handle(&mut session, &mut room, "spring", &mut events);

    assert_eq!(session.score(), Score::reward(5));
    assert_eq!(room.player_cell(), Cell::new(0, 1));
}

#[test]
fn replay_keeps_score_and_restores_start() {
    let mut room = build(
        open_config(),
        Layout {
            prizes: vec![Cell::new(1, 0)],
            ..Layout::default()
        },
    );
    let engine = Engine::new();
    let mut session = GameSession::new();
    let mut events = Vec::new();

    for command in ["r", "p", "up", "d", "replay"] {
        engine.handle(&mut session, &mut room, command, &mut events);
    }

    // +10 prize, -5 off-grid move up
    assert_eq!(session.score(), Score::new(5));
    assert_eq!(room.steps(), 0);
    assert_eq!(query::player(&room), query::start(&room));
    assert!(events.contains(&Event::BoardReset { steps_discarded: 2 }));

    engine.handle(&mut session, &mut room, "r", &mut events);
    engine.handle(&mut session, &mut room, "p", &mut events);
    assert_eq!(session.score(), Score::new(15), "prize is back after replay");
}

#[test]
fn reaching_far_wall_rewards_quit() {
    let config = RoomConfig {
        columns: 5,
        ..open_config()
    };
    let mut room = build(config, Layout::default());
    let engine = Engine::new();
    let mut session = GameSession::new();
    let mut events = Vec::new();

    let report = engine.run(
        &mut session,
        &mut room,
        ["jr", "j", "quit"],
        &mut events,
    );

    assert_eq!(query::player(&room), Cell::new(4, 0));
    assert_eq!(report.steps, 2);
    assert_eq!(report.score, Score::reward(10));
}
