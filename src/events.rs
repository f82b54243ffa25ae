//! Event handling functions for user input.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::debug;

use crate::{types::Direction, App};

/// Handles input events and updates the application state accordingly.
///
/// This function waits at most `timeout` for a keyboard event and dispatches it to
/// [`handle_key`]. The main loop passes the time left until the next frame is due.
pub(crate) fn handle_events(app: &mut App, timeout: Duration) -> Result<()> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code);
            }
        }
    }

    Ok(())
}

/// Maps a movement key to the direction it stands for.
pub(crate) const fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Direction::North),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Direction::South),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Direction::East),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Direction::West),
        _ => None,
    }
}

/// Applies a single key press to the application.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) {
    let feedback = match code {
        KeyCode::Char('q') => {
            app.exit = true;
            None
        }
        KeyCode::Char('h') => app.session.request_hint(),
        KeyCode::Char('p') | KeyCode::Esc => app.session.toggle_pause(),
        KeyCode::Char('r') => Some(app.session.restart()),
        other => direction_for(other).and_then(|direction| app.session.move_player(direction)),
    };

    if let Some(feedback) = feedback {
        debug!(?feedback, "input handled");
    }
}
