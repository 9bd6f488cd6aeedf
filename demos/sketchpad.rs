//! Interactive ASCII sketchpad.
//!
//! ```bash
//! cargo run --example sketchpad
//! ```
//!
//! Type commands in the input line (`C 20 6`, `L 1 1 20 1`, `R 1 1 20 6`,
//! `B 3 3 #`, `Q`); the echo turns green once the line would be accepted.
//! Esc ends the session. Structured logs land in `easel.log.jsonl`.

use std::time::Duration;

use crossterm::terminal;
use easel::{AnsiRenderer, CliDriver, EaselRuntime, FileSink, Logger, RuntimeConfig, Size};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = Logger::new(FileSink::new("easel.log.jsonl", 512 * 1024)?);

    let mut config = RuntimeConfig::default();
    config.logger = Some(logger);
    config.enable_metrics();
    config.metrics_interval = Duration::from_secs(10);

    let (width, height) = terminal::size().unwrap_or((80, 24));
    let runtime =
        EaselRuntime::with_config(AnsiRenderer::with_default(), Size::new(width, height), config);

    CliDriver::new(runtime).run()?;
    Ok(())
}
