//! Procedural maze runner.
//!
//! Mazes are carved step by step on a rectangular grid, so the carving can be watched as it
//! happens, and then played from the top-left corner to the bottom-right one. The library exposes
//! the maze engine on its own:
//!
//! - [`grid`] holds the cells and their walls.
//! - [`generator`] carves perfect mazes with a recursive backtracker or a randomized frontier.
//! - [`pathfinding`] finds shortest routes for hints.
//! - [`visibility`] classifies cells under fog of war.
//! - [`movement`] validates player moves against the walls.
//! - [`session`] ties them together into a game driven one frame at a time.
//!
//! The terminal front end built on top of them is reached through [`App`].

#![expect(
    clippy::cargo_common_metadata,
    reason = "The package has no public repository or readme yet."
)]

mod app;
mod events;
mod ui;

pub mod config;
pub mod generator;
pub mod grid;
pub mod logging;
pub mod movement;
pub mod pathfinding;
pub mod session;
pub mod types;
pub mod visibility;

pub use app::App;
