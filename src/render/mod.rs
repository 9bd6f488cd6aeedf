mod core;

pub use core::{AnsiRenderer, NO_CANVAS, RendererSettings, canvas_text};
