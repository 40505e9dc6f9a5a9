//! Terminal tic-tac-toe against the computer.

use std::io::{self, BufRead, Write};
use tictactoe_core::{GameController, GameError, GameEvent};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod terminal;

use config::Config;
use terminal::Command;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the board
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env()?;
    info!(?config, "starting tic-tac-toe");

    let mut game = GameController::with_difficulty(config.difficulty, config.seed)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", terminal::render(&game))?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let command = match terminal::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(stdout, "{}", terminal::HELP)?;
                continue;
            }
            Command::State => {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&game.snapshot())?)?;
                continue;
            }
            Command::Restart => game.restart(),
            Command::Input(input) => match game.handle(input) {
                Ok(events) => report(&mut stdout, &game, &events)?,
                Err(GameError::NoLegalMoves) => return Err(GameError::NoLegalMoves.into()),
                Err(e) => writeln!(stdout, "{}", terminal::describe_error(&e))?,
            },
        }

        writeln!(stdout, "\n{}", terminal::render(&game))?;
        stdout.flush()?;
    }

    println!("Thanks for playing tic-tac-toe!");
    Ok(())
}

/// Tell the user where the computer moved
fn report(out: &mut impl Write, game: &GameController, events: &[GameEvent]) -> io::Result<()> {
    let opponent = game.seats().map(|s| s.opponent);
    for event in events {
        debug!(?event, "engine event");
        if let GameEvent::CellMarked { index, player } = event {
            if Some(*player) == opponent {
                writeln!(out, "Computer plays {}", index + 1)?;
            }
        }
    }
    Ok(())
}
