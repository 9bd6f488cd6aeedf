//! Canvas cell buffer.
//!
//! The grid knows nothing about commands; it stores characters and hands
//! out bounds-checked cell access. All drawing semantics live in `engine`.

mod core;

pub use core::{BLANK, Grid};
