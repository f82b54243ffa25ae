//! Command-line configuration module.
//!
//! This module turns command-line arguments into the immutable [`Settings`] a session is started
//! with. Difficulty presets provide the defaults; individual flags override them.

use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{ensure, Result};

use crate::generator::Algorithm;

/// Difficulty level, selecting maze size, light radius, hint duration and time pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// Small maze, wide light, generous timer.
    Easy,
    /// Medium maze.
    #[default]
    Medium,
    /// Large maze, narrow light, tight timer.
    Hard,
}

/// Numbers behind a difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    /// Number of columns.
    pub cols: usize,
    /// Number of rows.
    pub rows: usize,
    /// Light radius in cells when fog of war is on.
    pub fog_radius: u32,
    /// How long a hint stays on screen, in milliseconds.
    pub hint_ms: u64,
    /// Time allowance multiplier, in percent.
    pub time_factor_pct: u64,
}

impl Difficulty {
    /// Returns the preset values for this level.
    #[must_use]
    pub const fn preset(self) -> Preset {
        match self {
            Self::Easy => Preset {
                cols: 20,
                rows: 15,
                fog_radius: 7,
                hint_ms: 3000,
                time_factor_pct: 200,
            },
            Self::Medium => Preset {
                cols: 40,
                rows: 30,
                fog_radius: 5,
                hint_ms: 2000,
                time_factor_pct: 100,
            },
            Self::Hard => Preset {
                cols: 80,
                rows: 60,
                fog_radius: 4,
                hint_ms: 1500,
                time_factor_pct: 60,
            },
        }
    }

    /// Display name of the level.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Time limit for a maze, in milliseconds.
///
/// Five seconds plus a tenth of a second per cell, scaled by the difficulty's time factor.
#[must_use]
pub const fn time_limit_ms(cols: usize, rows: usize, time_factor_pct: u64) -> u64 {
    let cells = (cols as u64).saturating_mul(rows as u64);
    5000_u64.saturating_add(cells.saturating_mul(time_factor_pct))
}

/// Command-line arguments.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Difficulty preset
    #[arg(short, long, value_enum, default_value_t)]
    pub difficulty: Difficulty,

    /// Override the preset's number of columns
    #[arg(long)]
    pub cols: Option<usize>,

    /// Override the preset's number of rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Maze generation algorithm
    #[arg(short, long, value_enum, default_value_t)]
    pub algorithm: Algorithm,

    /// Limit sight to a radius around the player
    #[arg(long)]
    pub fog: bool,

    /// Disable the path hint
    #[arg(long)]
    pub no_hints: bool,

    /// Play against the clock
    #[arg(long)]
    pub timer: bool,

    /// Seed for the maze generator, random when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generator steps performed per rendered frame
    #[arg(long, default_value_t = 1)]
    pub steps_per_frame: usize,

    /// Target frame rate
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Resolves the arguments into session settings.
    ///
    /// A missing seed is drawn from the thread random number generator.
    ///
    /// # Errors
    ///
    /// This function returns an error if the frame rate or the number of steps per frame is zero.
    /// Maze dimensions are checked later, when the grid is built.
    pub fn settings(&self) -> Result<Settings> {
        ensure!(self.fps > 0, "frame rate must be positive");
        ensure!(self.steps_per_frame > 0, "steps per frame must be positive");

        let preset = self.difficulty.preset();
        let cols = self.cols.unwrap_or(preset.cols);
        let rows = self.rows.unwrap_or(preset.rows);
        let fps = u64::from(self.fps);

        Ok(Settings {
            difficulty: self.difficulty,
            cols,
            rows,
            algorithm: self.algorithm,
            fog: self.fog,
            hints: !self.no_hints,
            fog_radius: preset.fog_radius,
            hint_frames: ms_to_frames(preset.hint_ms, fps),
            time_limit_frames: self
                .timer
                .then(|| ms_to_frames(time_limit_ms(cols, rows, preset.time_factor_pct), fps)),
            seed: self.seed.unwrap_or_else(rand::random),
            steps_per_frame: self.steps_per_frame,
            fps: self.fps,
        })
    }
}

/// Converts milliseconds into a whole number of frames, rounding up.
const fn ms_to_frames(ms: u64, fps: u64) -> u64 {
    ms.saturating_mul(fps).div_ceil(1000)
}

/// Immutable configuration of a play session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Difficulty the values were derived from.
    pub difficulty: Difficulty,
    /// Number of maze columns.
    pub cols: usize,
    /// Number of maze rows.
    pub rows: usize,
    /// Generation algorithm.
    pub algorithm: Algorithm,
    /// Whether fog of war is on.
    pub fog: bool,
    /// Whether hints may be requested.
    pub hints: bool,
    /// Light radius in cells.
    pub fog_radius: u32,
    /// Lifetime of a hint, in frames.
    pub hint_frames: u64,
    /// Time limit in frames, `None` when playing without a timer.
    pub time_limit_frames: Option<u64>,
    /// Seed of the session's random number generator.
    pub seed: u64,
    /// Generator steps performed per frame.
    pub steps_per_frame: usize,
    /// Target frame rate.
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let preset = Difficulty::Medium.preset();
        Self {
            difficulty: Difficulty::Medium,
            cols: preset.cols,
            rows: preset.rows,
            algorithm: Algorithm::Backtracker,
            fog: false,
            hints: true,
            fog_radius: preset.fog_radius,
            hint_frames: ms_to_frames(preset.hint_ms, 60),
            time_limit_frames: None,
            seed: 0,
            steps_per_frame: 1,
            fps: 60,
        }
    }
}

impl Settings {
    /// Wall-clock length of one frame.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses a command line made of the binary name followed by `args`.
    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("maze-runner").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_presets_match_difficulty() {
        assert_eq!(Difficulty::Easy.preset().cols, 20);
        assert_eq!(Difficulty::Easy.preset().rows, 15);
        assert_eq!(Difficulty::Medium.preset().fog_radius, 5);
        assert_eq!(Difficulty::Hard.preset().cols, 80);
        assert_eq!(Difficulty::Hard.preset().hint_ms, 1500);
    }

    #[test]
    fn test_time_limit() {
        assert_eq!(time_limit_ms(40, 30, 100), 125_000);
        assert_eq!(time_limit_ms(20, 15, 200), 65_000);
        assert_eq!(time_limit_ms(80, 60, 60), 293_000);
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&["--seed", "7"]).settings().expect("defaults are valid");

        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!((settings.cols, settings.rows), (40, 30));
        assert_eq!(settings.algorithm, Algorithm::Backtracker);
        assert!(!settings.fog);
        assert!(settings.hints);
        assert_eq!(settings.hint_frames, 120);
        assert_eq!(settings.time_limit_frames, None);
        assert_eq!(settings.seed, 7);
    }

    #[test]
    fn test_flags_override_preset() {
        let settings = parse(&[
            "--difficulty",
            "easy",
            "--cols",
            "7",
            "--rows",
            "3",
            "--algorithm",
            "frontier",
            "--fog",
            "--no-hints",
            "--timer",
            "--fps",
            "10",
        ])
        .settings()
        .expect("flags are valid");

        assert_eq!((settings.cols, settings.rows), (7, 3));
        assert_eq!(settings.algorithm, Algorithm::Frontier);
        assert_eq!(settings.fog_radius, 7);
        assert!(settings.fog);
        assert!(!settings.hints);
        assert_eq!(settings.hint_frames, 30);
        // 5000 ms + 21 cells * 200 = 9200 ms at 10 fps.
        assert_eq!(settings.time_limit_frames, Some(92));
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        assert!(parse(&["--fps", "0"]).settings().is_err());
        assert!(parse(&["--steps-per-frame", "0"]).settings().is_err());
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let result = Args::try_parse_from(["maze-runner", "--algorithm", "kruskal"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
    }

    #[test]
    fn test_frame_duration() {
        let settings = Settings {
            fps: 50,
            ..Settings::default()
        };

        assert_eq!(settings.frame_duration(), Duration::from_millis(20));
    }
}
