#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Escape Room in a terminal.

mod input;
mod render;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use escape_room_core::{normalize, FinalReport, WELCOME_BANNER, WELCOME_BRIEFING};
use escape_room_system_engine::{Engine, GameSession};
use escape_room_world::{Room, RoomConfig};
use log::{info, LevelFilter};

use crate::{input::ValidatedInput, render::Presenter};

#[derive(Debug, Parser)]
#[command(name = "escape-room", version)]
#[command(about = "Cross the room to the far wall, dodging walls and hidden traps")]
struct CliArgs {
    /// Room configuration file (TOML). Defaults to the standard 8x5 room.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for wall, trap, and prize placement. Random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Comma-separated commands to play instead of prompting.
    #[arg(long, value_delimiter = ',')]
    commands: Option<Vec<String>>,

    /// Print the room after every command.
    #[arg(short, long)]
    board: bool,

    /// Show hidden traps when printing the room.
    #[arg(long)]
    reveal: bool,

    /// Verbose logging (-v, -vv for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Escape Room command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => RoomConfig::load(path).with_context(|| {
            format!("failed to load room configuration from {}", path.display())
        })?,
        None => RoomConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("building room with seed {seed}");
    let mut room = Room::generate(config, seed).context("failed to build room")?;

    let mut out = io::stdout();
    writeln!(out, "{WELCOME_BANNER}")?;
    writeln!(out, "{WELCOME_BRIEFING}")?;
    writeln!(out)?;

    let engine = Engine::new();
    let mut session = GameSession::new();
    let presenter = Presenter::new(args.board, args.reveal);
    presenter.present(&mut out, &room, &mut Vec::new())?;

    let report = match args.commands {
        Some(commands) => play(
            &engine,
            &mut session,
            &mut room,
            &presenter,
            &mut out,
            commands.into_iter().map(io::Result::Ok),
        )?,
        None => {
            let stdin = io::stdin();
            let commands = ValidatedInput::new(stdin.lock(), io::stdout(), engine.actions());
            play(&engine, &mut session, &mut room, &presenter, &mut out, commands)?
        }
    };

    out.flush()?;
    info!("finished with score {} in {} steps", report.score, report.steps);
    Ok(())
}

/// Feeds commands one at a time, presenting the outcome of each, until the
/// player quits or the source runs dry, then settles the session.
fn play<W, I>(
    engine: &Engine,
    session: &mut GameSession,
    room: &mut Room,
    presenter: &Presenter,
    out: &mut W,
    commands: I,
) -> Result<FinalReport>
where
    W: Write,
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut events = Vec::new();
    for command in commands {
        let command = command.context("failed to read command")?;
        engine.handle(session, room, &normalize(&command), &mut events);
        presenter.present(out, room, &mut events)?;
        if !session.is_running() {
            break;
        }
    }

    let report = engine.end(session, room, &mut events);
    presenter.present(out, room, &mut events)?;
    Ok(report)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    let _ = builder
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}
