use thiserror::Error;

use crate::command::Command;
use crate::engine::draw;
use crate::geometry::Point;
use crate::grid::Grid;

/// Why a command was refused.
///
/// Rejections are reported as data, never as panics or crate errors; a
/// rejected command leaves the engine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("line does not match any command")]
    MalformedSyntax,
    #[error("no active canvas")]
    NoActiveCanvas,
    #[error("canvas already active, quit it first")]
    RedefinitionAttempt,
    #[error("coordinates fall outside the canvas")]
    OutOfBounds,
    #[error("only horizontal or vertical lines are supported")]
    NonAxisAlignedLine,
}

/// Record of one applied command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// Short operation label for logs and the status line.
    pub op: &'static str,
    /// Number of cells the operation wrote.
    pub cells: usize,
}

/// Result of submitting one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied(Applied),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// The command engine.
///
/// Owns the canvas (when one exists) and applies the drawing grammar to it
/// one validated command at a time. The engine is an ordinary owned value so
/// independent instances can coexist.
#[derive(Debug, Default)]
pub struct CanvasEngine {
    grid: Option<Grid>,
}

impl CanvasEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the canvas for presentation. `None` while no
    /// canvas exists.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Pure validity probe over raw text: parse plus validation, no
    /// mutation. Safe to call on every keystroke.
    pub fn is_valid(&self, line: &str) -> bool {
        self.validate(&Command::parse(line)).is_ok()
    }

    /// Decide whether `command` would be accepted against the current
    /// canvas state, without applying anything.
    pub fn validate(&self, command: &Command) -> Result<(), Rejection> {
        match (command, self.grid.as_ref()) {
            (Command::Unrecognized, _) => Err(Rejection::MalformedSyntax),
            (Command::CreateCanvas { .. }, None) => Ok(()),
            (Command::CreateCanvas { .. }, Some(_)) => Err(Rejection::RedefinitionAttempt),
            (_, None) => Err(Rejection::NoActiveCanvas),
            (Command::DrawLine { from, to }, Some(grid)) => {
                // Axis alignment first: a diagonal is reported as such no
                // matter where its endpoints land.
                if from.x != to.x && from.y != to.y {
                    return Err(Rejection::NonAxisAlignedLine);
                }
                check_bounds(grid, &[*from, *to])
            }
            (
                Command::DrawRectangle { corner_a, corner_b },
                Some(grid),
            ) => check_bounds(grid, &[*corner_a, *corner_b]),
            (Command::Fill { seed, .. }, Some(grid)) => check_bounds(grid, &[*seed]),
            (Command::Quit, Some(_)) => Ok(()),
        }
    }

    /// Parse, validate, and apply one input line.
    pub fn submit(&mut self, line: &str) -> Outcome {
        let command = Command::parse(line);
        match self.validate(&command) {
            Err(rejection) => Outcome::Rejected(rejection),
            Ok(()) => Outcome::Applied(self.apply(command)),
        }
    }

    fn apply(&mut self, command: Command) -> Applied {
        match command {
            Command::CreateCanvas { width, height } => {
                let grid = Grid::new(width, height);
                let cells = grid.cell_count();
                self.grid = Some(grid);
                Applied { op: "create", cells }
            }
            Command::Quit => {
                self.grid = None;
                Applied { op: "quit", cells: 0 }
            }
            Command::DrawLine { from, to } => {
                self.with_grid("line", |grid| draw::stroke_line(grid, from, to))
            }
            Command::DrawRectangle { corner_a, corner_b } => {
                self.with_grid("rect", |grid| draw::outline_rect(grid, corner_a, corner_b))
            }
            Command::Fill { seed, glyph } => {
                self.with_grid("fill", |grid| draw::flood_fill(grid, seed, glyph))
            }
            Command::Unrecognized => Applied { op: "noop", cells: 0 },
        }
    }

    fn with_grid(&mut self, op: &'static str, draw: impl FnOnce(&mut Grid) -> usize) -> Applied {
        let cells = self.grid.as_mut().map(draw).unwrap_or(0);
        Applied { op, cells }
    }
}

fn check_bounds(grid: &Grid, points: &[Point]) -> Result<(), Rejection> {
    let inside = |p: &Point| p.x >= 1 && p.y >= 1 && p.x <= grid.width() && p.y <= grid.height();
    if points.iter().all(inside) {
        Ok(())
    } else {
        Err(Rejection::OutOfBounds)
    }
}
