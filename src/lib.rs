//! Easel: a terminal ASCII sketchpad.
//!
//! A command engine interprets single-line drawing commands (`C`, `L`, `R`,
//! `B`, `Q`) against an owned character grid. The runtime wraps the engine
//! in an interactive crossterm session that colors the echoed command by
//! the engine's pure validity probe before it is committed.

pub mod command;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod runtime;
pub mod width;

pub use command::Command;
pub use engine::{Applied, CanvasEngine, Outcome, Rejection, STROKE};
pub use error::{EaselError, Result};
pub use geometry::{Point, Rect, Size};
pub use grid::{BLANK, Grid};
pub use layout::{Constraint, split_rows};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
};
pub use metrics::{EngineMetrics, MetricSnapshot};
pub use render::{AnsiRenderer, NO_CANVAS, RendererSettings, canvas_text};
pub use runtime::driver::{CliDriver, DriverError, DriverResult};
pub use runtime::{
    CANVAS_ZONE, EaselRuntime, HINTS_ZONE, INPUT_ZONE, RuntimeConfig, RuntimeEvent, STATUS_ZONE,
};
pub use width::display_width;
