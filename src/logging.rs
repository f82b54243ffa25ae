//! Log subscriber setup.
//!
//! The terminal belongs to the user interface, so logs are only collected when a file is given.

use std::{fs::File, path::Path, sync::Mutex};

use color_eyre::eyre::{eyre, Result, WrapErr as _};
use tracing::level_filters::LevelFilter;

/// Maps the number of `-v` flags to the most verbose level that gets recorded.
#[must_use]
pub const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber writing to `path`, if one is given.
///
/// Without a path no subscriber is installed and every event is discarded.
///
/// # Errors
///
/// This function returns an error if the log file cannot be created or if a global subscriber
/// was already installed.
pub fn init(path: Option<&Path>, verbosity: u8) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level_for(verbosity))
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(3), LevelFilter::TRACE);
        assert_eq!(level_for(200), LevelFilter::TRACE);
    }

    #[test]
    fn test_init_without_path_is_noop() {
        assert!(init(None, 3).is_ok());
    }
}
