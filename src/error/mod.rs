mod types;

pub use types::{EaselError, Result};
