//! The command engine: validation, canvas lifecycle, and the drawing
//! algorithms behind `L`, `R`, and `B`.

mod core;
pub mod draw;

pub use core::{Applied, CanvasEngine, Outcome, Rejection};
pub use draw::STROKE;
