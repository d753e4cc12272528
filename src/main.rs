//! Terminal Tetris runner (default binary).
//!
//! The grid runs on the engine's session task; this loop only reads keys, forwards
//! intents and redraws when the session reports a change.
//!
//! Set `TETRIS_LOG_PATH` to write logs to a file (filter with `RUST_LOG`).

use std::env;
use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing_subscriber::EnvFilter;

use tetris_grid::core::{BestScoreStore, GameConfig, Grid, JsonFileStore};
use tetris_grid::engine::GameRuntime;
use tetris_grid::input::{map_key, KeyIntent};
use tetris_grid::term::{BoardView, TerminalRenderer};
use tetris_grid::types::TICK_MS;

fn main() -> Result<()> {
    init_logging()?;

    let config = GameConfig::from_env().context("invalid game configuration")?;
    let store_path = config
        .best_score_path
        .clone()
        .unwrap_or_else(JsonFileStore::default_path);
    let store: Arc<dyn BestScoreStore> = Arc::new(JsonFileStore::new(store_path));

    let grid = Grid::with_store(&config, store.as_ref());
    tracing::info!(
        best = grid.best_score(),
        volume = grid.volume(),
        "starting game"
    );
    let mut game = GameRuntime::start(grid, store).context("failed to start game session")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run(&mut term, &mut game);
    // Always try to restore terminal state.
    let _ = term.exit();

    // Shut down even when the loop failed so the best score is saved.
    let final_state = game.shutdown()?;
    tracing::info!(
        score = final_state.score,
        best = final_state.best_score,
        "game closed"
    );
    result
}

fn run(term: &mut TerminalRenderer, game: &mut GameRuntime) -> Result<()> {
    let view = BoardView::new();
    let poll_interval = Duration::from_millis(u64::from(TICK_MS));
    let mut dirty = true;

    loop {
        while let Some(notification) = game.try_recv_notification() {
            if notification.is_terminal() {
                tracing::info!(score = game.snapshot().score, "game over");
            }
            dirty = true;
        }

        if dirty {
            term.draw(view.render(&game.snapshot()))?;
            dirty = false;
        }

        if !event::poll(poll_interval)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => match map_key(key, game.snapshot().state) {
                Some(KeyIntent::Quit) => return Ok(()),
                Some(KeyIntent::Action(action)) => game.apply(action)?,
                None => {}
            },
            Event::Resize(..) => {
                term.invalidate();
                dirty = true;
            }
            _ => {}
        }
    }
}

fn init_logging() -> Result<()> {
    // The terminal is in raw mode while playing, so logs only ever go to a file.
    let Ok(path) = env::var("TETRIS_LOG_PATH") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("cannot create log file {}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}
