//! User interface rendering functions.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    grid::Grid,
    session::{Phase, Session},
    types::{Coord, Direction},
    visibility::{Visibility, VisibilityMap},
    App,
};

/// Draws the whole screen for the current frame.
///
/// The maze fills the screen above the status bar; paused and finished games get a message
/// box on top.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversions.
pub(crate) fn draw(app: &mut App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let overall_layout = Layout::vertical([
        Constraint::Min(1),    // Maze area
        Constraint::Length(3), // Status bar
    ])
    .split(frame.area());

    let maze_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    maze(app, frame, maze_area)?;
    status_bar(&app.session, frame, status_area)?;

    match app.session.phase() {
        Phase::Paused => message_box(frame, "Paused", &["(p) resume", "(r) new maze", "(q) quit"])?,
        Phase::Won => message_box(frame, "You win!", &["(r) play again", "(q) quit"])?,
        Phase::Lost => message_box(frame, "Time's up!", &["(r) try again", "(q) quit"])?,
        Phase::Generating | Phase::Playing => {}
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Returns a rectangle of at most `width` by `height` centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Result<Rect> {
    let row = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area)
        .first()
        .copied()
        .ok_or_eyre("failed to center vertically")?;

    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(row)
        .first()
        .copied()
        .ok_or_eyre("failed to center horizontally")
}

/// Position of a cell's centre on the drawing lattice.
///
/// The lattice is twice as fine as the grid plus one: cell centres sit on odd coordinates and the
/// walls between them on the even ones.
pub(crate) const fn cell_center(coord: Coord) -> (usize, usize) {
    (2 * coord.x + 1, 2 * coord.y + 1)
}

/// Lattice points drawn for the walls around a cell.
///
/// Corners are always drawn; each wall side adds the point between its two corners.
pub(crate) fn wall_points(grid: &Grid, coord: Coord) -> Vec<(usize, usize)> {
    let (cx, cy) = cell_center(coord);
    let mut points = vec![
        (cx - 1, cy - 1),
        (cx + 1, cy - 1),
        (cx - 1, cy + 1),
        (cx + 1, cy + 1),
    ];

    for direction in Direction::ALL {
        if grid.has_wall(coord, direction) {
            let (dx, dy) = direction.offset();
            points.push((cx.saturating_add_signed(dx), cy.saturating_add_signed(dy)));
        }
    }

    points
}

/// Transforms lattice coordinates to canvas coordinates.
///
/// This function converts lattice coordinates (col, row) to canvas coordinates (x, y) centred on
/// the origin: coordinate[i] = i - (n - 1) / 2 for columns and coordinate[i] = (n - 1) / 2 - i for
/// rows, since canvas rows grow upwards.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn to_screen_coords(
    points: &[(usize, usize)],
    width: usize,
    height: usize,
) -> Result<Vec<(f64, f64)>> {
    let cols_n = f64::from(u32::try_from(width)?);
    let rows_n = f64::from(u32::try_from(height)?);

    points
        .iter()
        .map(|&(col, row)| {
            let screen_x = f64::from(u32::try_from(col)?) - (cols_n - 1.) / 2.;
            let screen_y = (rows_n - 1.) / 2. - f64::from(u32::try_from(row)?);

            Ok((screen_x, screen_y))
        })
        .collect()
}

/// Lattice points of every layer, bottom to top, each with the colour it is drawn in.
///
/// Walls of lit cells cover those of fading cells; generation progress, the hint, the start and
/// goal markers, the carving head and the player are stacked above them in that order.
fn layers(session: &Session, visibility: &VisibilityMap) -> [(Vec<(usize, usize)>, Color); 8] {
    let grid = session.grid();

    let mut lit = Vec::new();
    let mut faded = Vec::new();
    for coord in grid.coords() {
        match visibility.get(coord) {
            Visibility::Illuminated => lit.extend(wall_points(grid, coord)),
            Visibility::RecentlySeen => faded.extend(wall_points(grid, coord)),
            Visibility::Hidden => {}
        }
    }

    let generating = session.phase() == Phase::Generating;
    let visited: Vec<_> = if generating {
        grid.coords()
            .filter(|&coord| grid.is_visited(coord))
            .map(cell_center)
            .collect()
    } else {
        Vec::new()
    };
    let hint: Vec<_> = session
        .hint()
        .map(|hint| {
            hint.path
                .iter()
                .copied()
                .filter(|&coord| visibility.is_drawn(coord))
                .map(cell_center)
                .collect()
        })
        .unwrap_or_default();
    let lit_marker = |coord: Coord| -> Vec<(usize, usize)> {
        if visibility.get(coord) == Visibility::Illuminated {
            vec![cell_center(coord)]
        } else {
            Vec::new()
        }
    };
    let head: Vec<_> = session.carving_head().map(cell_center).into_iter().collect();
    let player = if generating {
        Vec::new()
    } else {
        vec![cell_center(session.player())]
    };

    [
        (faded, Color::DarkGray),
        (lit, Color::Green),
        (visited, Color::Blue),
        (hint, Color::Yellow),
        (lit_marker(grid.start()), Color::Magenta),
        (lit_marker(grid.goal()), Color::Red),
        (head, Color::LightGreen),
        (player, Color::Cyan),
    ]
}

/// Renders the maze, the fog and every marker on a [`Canvas`].
///
/// When the lattice fits the available area each lattice point maps to one terminal cell drawn
/// as a block; otherwise the canvas falls back to braille dots to squeeze the maze in.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversions.
pub(crate) fn maze(app: &mut App, frame: &mut Frame, area: Rect) -> Result<()> {
    let visibility = app.session.visibility();
    let grid = app.session.grid();

    let lattice_cols = 2 * grid.cols() + 1;
    let lattice_rows = 2 * grid.rows() + 1;
    let space = centered(
        area,
        u16::try_from(lattice_cols).unwrap_or(u16::MAX),
        u16::try_from(lattice_rows).unwrap_or(u16::MAX),
    )?;
    let fits =
        usize::from(space.width) >= lattice_cols && usize::from(space.height) >= lattice_rows;

    let screen_layers = layers(&app.session, &visibility)
        .into_iter()
        .map(|(points, color)| {
            Ok((to_screen_coords(&points, lattice_cols, lattice_rows)?, color))
        })
        .collect::<Result<Vec<_>>>()?;

    let x_extent = (f64::from(u32::try_from(lattice_cols)?) - 1.) / 2.;
    let y_extent = (f64::from(u32::try_from(lattice_rows)?) - 1.) / 2.;
    let canvas = Canvas::default()
        .x_bounds([-x_extent, x_extent])
        .y_bounds([-y_extent, y_extent])
        .marker(if fits { Marker::Block } else { Marker::Braille })
        .paint(|ctx| {
            for (coords, color) in &screen_layers {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
                ctx.layer();
            }
        });

    frame.render_widget(canvas, space);

    Ok(())
}

/// Formats a number of frames as seconds with one decimal, rounded to the nearest tenth.
///
/// # Errors
///
/// This function returns an error if the value does not fit the arithmetic used for rounding.
pub(crate) fn format_seconds(frames: u64, fps: u32) -> Result<String> {
    let tenths = rounded_div::i32(
        i32::try_from(frames.saturating_mul(10))?,
        i32::try_from(fps.max(1))?,
    );

    Ok(format!("{}.{}", tenths / 10, tenths % 10))
}

/// Renders the status bar with the phase, the clock and the key bindings.
///
/// # Errors
///
/// This function may return errors while formatting the remaining time.
pub(crate) fn status_bar(session: &Session, frame: &mut Frame, area: Rect) -> Result<()> {
    let settings = session.settings();
    let grid = session.grid();

    let mut parts = vec![match session.phase() {
        Phase::Generating => format!(
            "Generating ({}) {}/{}",
            settings.algorithm.label(),
            session.carved(),
            grid.len() - 1
        ),
        phase => format!(
            "{} - {} {}x{}",
            phase.label(),
            settings.difficulty.label(),
            grid.cols(),
            grid.rows()
        ),
    }];
    if let Some(frames) = session.remaining_frames() {
        parts.push(format!("Time: {}", format_seconds(frames, settings.fps)?));
    }
    if let Some(hint) = session.hint() {
        parts.push(format!("Hint: {} steps", hint.path.len().saturating_sub(1)));
    }

    let help = if settings.hints {
        "(arrows/wasd) move / (h) hint / (p) pause / (r) restart / (q) quit"
    } else {
        "(arrows/wasd) move / (p) pause / (r) restart / (q) quit"
    };

    let block = Block::bordered()
        .title(help)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let inner = block.inner(area);

    frame.render_widget(block, area);
    frame.render_widget(Line::raw(parts.join("  |  ")).centered(), inner);

    Ok(())
}

/// Renders a centred box with a title and one line per entry.
///
/// # Errors
///
/// This function may return errors if the box dimensions do not fit a terminal coordinate.
pub(crate) fn message_box(frame: &mut Frame, title: &str, lines: &[&str]) -> Result<()> {
    let longest = lines
        .iter()
        .copied()
        .map(str::len)
        .chain([title.len()])
        .max()
        .unwrap_or_default();
    let width = u16::try_from(longest + 4)?;
    let height = u16::try_from(lines.len() + 2)?;
    let space = centered(frame.area(), width, height)?;

    frame.render_widget(Clear, space);

    let block = Block::bordered()
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);
    let inner = block.inner(space);

    frame.render_widget(block, space);

    let rows = Layout::vertical(vec![Constraint::Max(1); lines.len()]).split(inner);
    for (line, row) in lines.iter().zip(rows.iter()) {
        frame.render_widget(Line::raw(*line).centered(), *row);
    }

    Ok(())
}
