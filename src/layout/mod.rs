//! Zone layout: splits the terminal into stacked rows for the session's
//! fixed zones.

mod core;

pub use core::{Constraint, split_rows};
