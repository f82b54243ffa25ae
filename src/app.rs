//! Core application state and main loop of the maze runner.

use std::time::Instant;

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::{config::Settings, events, session::Session, ui};

/// Application state container for the maze runner.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will write to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// The game being played.
    ///
    /// This field holds the maze, the player and every clock of the current game. The application
    /// only forwards input and frame ticks to it and draws what it reports.
    pub(crate) session: Session,
    /// Instant at which the last frame tick was due.
    ///
    /// The session clock only advances in whole frames measured from this instant, so slow draws
    /// and bursts of input neither stretch nor shrink the time limit.
    pub(crate) last_tick: Instant,
}

impl App {
    /// Creates the application and starts generating the first maze.
    ///
    /// # Errors
    ///
    /// This function returns an error if the settings describe an invalid maze.
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self {
            exit: false,
            session: Session::new(settings)?,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main loop of the application.
    ///
    /// Every iteration draws one frame, waits for input until the next frame is due and then
    /// advances the session by every frame that has elapsed. The loop continues until the exit
    /// condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.last_tick = Instant::now();

        while !self.exit {
            let _ = terminal
                .try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;

            let timeout = self
                .session
                .settings()
                .frame_duration()
                .saturating_sub(self.last_tick.elapsed());
            events::handle_events(self, timeout)?;

            let _ = self.catch_up(Instant::now());
        }

        Ok(())
    }

    /// Ticks the session once for every whole frame elapsed between the last tick and `now`.
    ///
    /// At most one second worth of frames is replayed; past that the clock is resynchronised to
    /// `now`, so a suspended terminal does not fast-forward the game. Returns the number of ticks.
    pub(crate) fn catch_up(&mut self, now: Instant) -> u32 {
        let frame_duration = self.session.settings().frame_duration();
        let limit = self.session.settings().fps.max(1);

        let mut ticks = 0;
        while ticks < limit && now.saturating_duration_since(self.last_tick) >= frame_duration {
            self.last_tick += frame_duration;
            ticks += 1;

            if let Some(feedback) = self.session.tick() {
                debug!(?feedback, frame = self.session.frame(), "tick");
            }
        }

        if ticks == limit {
            debug!(ticks, "frame clock resynchronised");
            self.last_tick = now;
        }

        ticks
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Creates an app on a small maze with the given frame rate.
    fn create_test_app(fps: u32) -> App {
        App::new(Settings {
            cols: 4,
            rows: 4,
            seed: 9,
            fps,
            ..Settings::default()
        })
        .expect("valid settings")
    }

    #[test]
    fn test_no_tick_before_a_frame_elapses() {
        let mut app = create_test_app(60);
        let start = app.last_tick;

        assert_eq!(app.catch_up(start), 0);
        assert_eq!(app.catch_up(start + Duration::from_millis(10)), 0);
        assert_eq!(app.session.frame(), 0, "no frame is due yet");
    }

    #[test]
    fn test_ticks_follow_elapsed_time() {
        let mut app = create_test_app(50);
        let start = app.last_tick;

        assert_eq!(app.catch_up(start + Duration::from_millis(70)), 3);
        assert_eq!(app.session.frame(), 3);
        assert_eq!(app.last_tick, start + Duration::from_millis(60), "partial frame carries over");

        assert_eq!(app.catch_up(start + Duration::from_millis(80)), 1);
        assert_eq!(app.session.frame(), 4);
    }

    #[test]
    fn test_repeated_polls_within_a_frame_tick_once() {
        let mut app = create_test_app(10);
        let start = app.last_tick;

        for millis in [5, 20, 45, 80, 99] {
            assert_eq!(app.catch_up(start + Duration::from_millis(millis)), 0);
        }
        assert_eq!(app.catch_up(start + Duration::from_millis(100)), 1);
        assert_eq!(app.session.frame(), 1, "bursts of input must not speed up the clock");
    }

    #[test]
    fn test_long_stall_resynchronises() {
        let mut app = create_test_app(20);
        let start = app.last_tick;
        let now = start + Duration::from_secs(30);

        assert_eq!(app.catch_up(now), 20, "at most one second is replayed");
        assert_eq!(app.last_tick, now);
        assert_eq!(app.session.frame(), 20);
    }
}
