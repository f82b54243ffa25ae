//! Play session module.
//!
//! A [`Session`] bundles everything one game needs: the settings it was started with, the grid,
//! the generator while the maze is being carved, the player, the hint and the clocks. The front
//! end owns the session and drives it one frame at a time through [`Session::tick`]; no state is
//! kept anywhere else.

use color_eyre::eyre::Result;
use rand::{rngs::StdRng, SeedableRng as _};
use tracing::{debug, info};

use crate::{
    config::Settings,
    generator::MazeGenerator,
    grid::Grid,
    movement::try_move,
    pathfinding::{path_length, shortest_path},
    types::{Coord, Direction},
    visibility::{Lighting, VisibilityMap, VisibilityTracker},
};

/// Stage of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The maze is being carved.
    Generating,
    /// The player is walking the maze.
    Playing,
    /// Play is suspended; the clock is stopped.
    Paused,
    /// The player reached the goal.
    Won,
    /// The time limit ran out.
    Lost,
}

impl Phase {
    /// Display name of the phase.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Generating => "Generating",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Won => "You win!",
            Self::Lost => "Time's up!",
        }
    }
}

/// Something the front end may want to react to, for instance with a sound or a flash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// Carving finished and play begins.
    GenerationFinished,
    /// The player moved one cell.
    Moved,
    /// The player walked into a wall.
    Bump,
    /// The player reached the goal.
    Won,
    /// A hint of the given number of steps is on screen.
    HintShown(usize),
    /// No route to the goal could be found.
    HintUnavailable,
    /// The hint went away.
    HintExpired,
    /// The time limit ran out.
    TimeUp,
    /// Play was suspended.
    Paused,
    /// Play resumed.
    Resumed,
    /// A new maze is being generated.
    Restarted,
}

/// Route to the goal shown to the player for a limited time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hint {
    /// Cells from the player's position to the goal.
    pub path: Vec<Coord>,
    /// Frame at which the hint disappears.
    pub expires_at: u64,
}

/// State of one game.
#[derive(Debug)]
pub struct Session {
    /// Configuration the session was started with.
    settings: Settings,
    /// The maze.
    grid: Grid,
    /// Generator of the maze, present only while carving.
    generator: Option<MazeGenerator<StdRng>>,
    /// Source from which each generation run draws its own random stream.
    rng: StdRng,
    /// Current stage.
    phase: Phase,
    /// Player position.
    player: Coord,
    /// Hint on screen, if any.
    hint: Option<Hint>,
    /// Fog-of-war memory.
    tracker: VisibilityTracker,
    /// Frames elapsed since the session was created.
    frame: u64,
    /// Frames spent playing the current maze, pauses excluded.
    play_frames: u64,
}

impl Session {
    /// Creates a session and starts generating the first maze.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configured maze dimensions are invalid.
    pub fn new(settings: Settings) -> Result<Self> {
        let grid = Grid::new(settings.cols, settings.rows)?;
        let tracker = VisibilityTracker::new(&grid);
        let rng = StdRng::seed_from_u64(settings.seed);

        info!(
            difficulty = settings.difficulty.label(),
            cols = settings.cols,
            rows = settings.rows,
            algorithm = settings.algorithm.label(),
            seed = settings.seed,
            "session created"
        );

        let mut session = Self {
            player: grid.start(),
            settings,
            grid,
            generator: None,
            rng,
            phase: Phase::Generating,
            hint: None,
            tracker,
            frame: 0,
            play_frames: 0,
        };
        session.begin_generation();

        Ok(session)
    }

    /// Resets the maze and hands a fresh generator its own random stream.
    fn begin_generation(&mut self) {
        let stream = StdRng::from_rng(&mut self.rng);
        self.generator = Some(MazeGenerator::start(
            &mut self.grid,
            self.settings.algorithm,
            stream,
        ));
        self.phase = Phase::Generating;
        self.player = self.grid.start();
        self.hint = None;
        self.play_frames = 0;
        self.tracker.reset();
    }

    /// Throws the current maze away and generates a new one.
    pub fn restart(&mut self) -> Feedback {
        info!("restarting with a new maze");
        self.begin_generation();
        Feedback::Restarted
    }

    /// Advances the session by one frame.
    ///
    /// While generating, up to the configured number of generator steps are performed; once the
    /// maze is complete play begins at the start cell. While playing, the play clock advances,
    /// hints expire, and the time limit is enforced. Other phases only advance the frame counter.
    pub fn tick(&mut self) -> Option<Feedback> {
        self.frame += 1;

        match self.phase {
            Phase::Generating => self.advance_generation(),
            Phase::Playing => self.advance_play(),
            Phase::Paused | Phase::Won | Phase::Lost => None,
        }
    }

    /// Runs this frame's share of generator steps.
    fn advance_generation(&mut self) -> Option<Feedback> {
        let generator = self.generator.as_mut()?;

        for _ in 0..self.settings.steps_per_frame {
            if !generator.step(&mut self.grid) {
                info!(
                    passages = generator.carved(),
                    frame = self.frame,
                    "maze ready"
                );
                self.generator = None;
                self.phase = Phase::Playing;
                self.player = self.grid.start();
                return Some(Feedback::GenerationFinished);
            }
        }

        None
    }

    /// Advances the play clock and the hint timer.
    fn advance_play(&mut self) -> Option<Feedback> {
        self.play_frames += 1;

        if let Some(limit) = self.settings.time_limit_frames {
            if self.play_frames >= limit {
                info!(frames = self.play_frames, "time is up");
                self.phase = Phase::Lost;
                self.hint = None;
                return Some(Feedback::TimeUp);
            }
        }

        if self
            .hint
            .as_ref()
            .is_some_and(|hint| self.frame >= hint.expires_at)
        {
            debug!("hint expired");
            self.hint = None;
            return Some(Feedback::HintExpired);
        }

        None
    }

    /// Attempts to move the player one cell. Ignored outside the playing phase.
    pub fn move_player(&mut self, direction: Direction) -> Option<Feedback> {
        if self.phase != Phase::Playing {
            return None;
        }

        let outcome = try_move(&self.grid, self.player, direction);
        if !outcome.allowed {
            debug!(player = ?self.player, ?direction, "bumped into a wall");
            return Some(Feedback::Bump);
        }

        self.player = outcome.cell;
        if self.player == self.grid.goal() {
            info!(frames = self.play_frames, "goal reached");
            self.phase = Phase::Won;
            self.hint = None;
            return Some(Feedback::Won);
        }

        Some(Feedback::Moved)
    }

    /// Shows the route from the player to the goal for a while.
    ///
    /// Ignored outside the playing phase, when hints are disabled, or while a hint is already on
    /// screen.
    pub fn request_hint(&mut self) -> Option<Feedback> {
        if self.phase != Phase::Playing || !self.settings.hints || self.hint.is_some() {
            return None;
        }

        let Some(path) = shortest_path(&self.grid, self.player, self.grid.goal()) else {
            debug!(player = ?self.player, "no route to the goal");
            return Some(Feedback::HintUnavailable);
        };

        let steps = path_length(&path);
        debug!(steps, "hint shown");
        self.hint = Some(Hint {
            path,
            expires_at: self.frame + self.settings.hint_frames,
        });

        Some(Feedback::HintShown(steps))
    }

    /// Pauses a running game or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Option<Feedback> {
        match self.phase {
            Phase::Playing => {
                info!("paused");
                self.phase = Phase::Paused;
                Some(Feedback::Paused)
            }
            Phase::Paused => {
                info!("resumed");
                self.phase = Phase::Playing;
                Some(Feedback::Resumed)
            }
            Phase::Generating | Phase::Won | Phase::Lost => None,
        }
    }

    /// Classifies every cell for drawing the current frame.
    ///
    /// The light follows the player, or sits on the start cell while the maze is being carved.
    pub fn visibility(&mut self) -> VisibilityMap {
        let focus = if self.phase == Phase::Generating {
            self.grid.start()
        } else {
            self.player
        };

        self.tracker.classify(
            &self.grid,
            Lighting {
                focus,
                fog: self.settings.fog,
                radius: self.settings.fog_radius,
                frame: self.frame,
            },
        )
    }

    /// Settings the session was started with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The maze.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current stage.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Player position.
    #[must_use]
    pub const fn player(&self) -> Coord {
        self.player
    }

    /// Hint on screen, if any.
    #[must_use]
    pub const fn hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }

    /// Frames elapsed since the session was created.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// The generator's carving head while generating.
    #[must_use]
    pub fn carving_head(&self) -> Option<Coord> {
        self.generator.as_ref().and_then(MazeGenerator::current)
    }

    /// Number of passages carved in the current maze.
    #[must_use]
    pub fn carved(&self) -> usize {
        self.generator
            .as_ref()
            .map_or_else(|| self.grid.open_passages(), MazeGenerator::carved)
    }

    /// Frames left before the time limit, `None` without a timer.
    #[must_use]
    pub fn remaining_frames(&self) -> Option<u64> {
        self.settings
            .time_limit_frames
            .map(|limit| limit.saturating_sub(self.play_frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Algorithm;

    /// Small settings with a fixed seed.
    fn settings(cols: usize, rows: usize) -> Settings {
        Settings {
            cols,
            rows,
            seed: 17,
            hint_frames: 5,
            ..Settings::default()
        }
    }

    /// Ticks the session until the maze is ready.
    fn ready(settings: Settings) -> Session {
        let mut session = Session::new(settings).expect("valid settings");
        let mut guard = 0;
        while session.phase() == Phase::Generating {
            let _ = session.tick();
            guard += 1;
            assert!(guard < 10_000, "generation should finish");
        }
        session
    }

    /// Walks the player along the shortest path to the goal and returns the final feedback.
    fn walk_to_goal(session: &mut Session) -> Option<Feedback> {
        let path = shortest_path(session.grid(), session.player(), session.grid().goal())
            .expect("maze is connected");
        let mut last = None;
        for pair in path.windows(2) {
            if let [here, there] = pair {
                let direction = here.direction_to(*there).expect("path steps are adjacent");
                last = session.move_player(direction);
            }
        }
        last
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(Session::new(settings(0, 4)).is_err());
    }

    #[test]
    fn test_generation_runs_frame_by_frame() {
        let mut session = Session::new(settings(5, 5)).expect("valid settings");

        assert_eq!(session.phase(), Phase::Generating);
        assert_eq!(session.tick(), None);
        assert_eq!(session.carved(), 1, "one step per frame carves one wall first");
        assert!(session.carving_head().is_some());

        let mut feedback = None;
        while feedback.is_none() {
            feedback = session.tick();
        }

        assert_eq!(feedback, Some(Feedback::GenerationFinished));
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.player(), session.grid().start());
        assert_eq!(session.carved(), 24);
        assert_eq!(session.carving_head(), None);
    }

    #[test]
    fn test_steps_per_frame_speeds_up_generation() {
        let slow = Settings {
            steps_per_frame: 1,
            ..settings(6, 6)
        };
        let fast = Settings {
            steps_per_frame: 10,
            ..settings(6, 6)
        };

        assert!(ready(fast).frame() < ready(slow).frame());
    }

    #[test]
    fn test_moves_are_ignored_while_generating() {
        let mut session = Session::new(settings(4, 4)).expect("valid settings");

        assert_eq!(session.move_player(Direction::East), None);
        assert_eq!(session.request_hint(), None);
        assert_eq!(session.toggle_pause(), None);
    }

    #[test]
    fn test_bump_keeps_player_in_place() {
        let mut session = ready(settings(4, 4));

        assert_eq!(session.move_player(Direction::North), Some(Feedback::Bump));
        assert_eq!(session.player(), session.grid().start());
    }

    #[test]
    fn test_reaching_goal_wins() {
        for algorithm in [Algorithm::Backtracker, Algorithm::Frontier] {
            let mut session = ready(Settings {
                algorithm,
                ..settings(6, 5)
            });

            assert_eq!(walk_to_goal(&mut session), Some(Feedback::Won));
            assert_eq!(session.phase(), Phase::Won);
            assert_eq!(session.move_player(Direction::North), None);
        }
    }

    #[test]
    fn test_hint_shows_then_expires() {
        let mut session = ready(settings(6, 6));

        let feedback = session.request_hint();
        let hint = session.hint().expect("hint should be active").clone();

        assert_eq!(feedback, Some(Feedback::HintShown(path_length(&hint.path))));
        assert_eq!(hint.path.first(), Some(&session.grid().start()));
        assert_eq!(hint.path.last(), Some(&session.grid().goal()));
        assert_eq!(session.request_hint(), None, "only one hint at a time");

        let mut expired = false;
        for _ in 0..5 {
            if session.tick() == Some(Feedback::HintExpired) {
                expired = true;
            }
        }
        assert!(expired, "hint should expire after its lifetime");
        assert!(session.hint().is_none());
    }

    #[test]
    fn test_hints_can_be_disabled() {
        let mut session = ready(Settings {
            hints: false,
            ..settings(4, 4)
        });

        assert_eq!(session.request_hint(), None);
    }

    #[test]
    fn test_time_limit_loses() {
        let mut session = ready(Settings {
            time_limit_frames: Some(3),
            ..settings(4, 4)
        });

        assert_eq!(session.remaining_frames(), Some(3));
        assert_eq!(session.tick(), None);
        assert_eq!(session.tick(), None);
        assert_eq!(session.tick(), Some(Feedback::TimeUp));
        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(session.remaining_frames(), Some(0));
    }

    #[test]
    fn test_pause_stops_the_clock() {
        let mut session = ready(Settings {
            time_limit_frames: Some(10),
            ..settings(4, 4)
        });

        let _ = session.tick();
        assert_eq!(session.toggle_pause(), Some(Feedback::Paused));
        for _ in 0..50 {
            assert_eq!(session.tick(), None);
        }
        assert_eq!(session.remaining_frames(), Some(9));
        assert_eq!(session.move_player(Direction::East), None);

        assert_eq!(session.toggle_pause(), Some(Feedback::Resumed));
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_restart_generates_a_new_maze() {
        let mut session = ready(settings(8, 8));
        let first = session.grid().clone();

        assert_eq!(session.restart(), Feedback::Restarted);
        assert_eq!(session.phase(), Phase::Generating);
        assert_eq!(session.grid().open_passages(), 0);

        while session.phase() == Phase::Generating {
            let _ = session.tick();
        }
        assert_eq!(session.grid().open_passages(), 63);
        assert_ne!(session.grid(), &first, "a restart draws a new random stream");
    }

    #[test]
    fn test_same_seed_same_session() {
        let first = ready(settings(7, 7));
        let second = ready(settings(7, 7));

        assert_eq!(first.grid(), second.grid());
    }

    #[test]
    fn test_visibility_follows_player() {
        let mut session = ready(Settings {
            fog: true,
            fog_radius: 1,
            ..settings(8, 8)
        });

        let map = session.visibility();

        assert!(map.is_drawn(session.grid().start()));
        assert!(!map.is_drawn(session.grid().goal()));
    }
}
