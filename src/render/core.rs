use std::collections::HashMap;
use std::io::Write;

use blake3::Hash;

use crate::error::Result;
use crate::geometry::Rect;
use crate::grid::Grid;
use crate::width::display_width;

/// Text shown in place of a canvas while the engine is uninitialized. An
/// absent canvas is never rendered as an empty grid.
pub const NO_CANVAS: &str = "no canvas";

const TOP_BORDER: char = '-';
const SIDE_BORDER: char = '|';

/// Render the canvas (or the no-canvas sentinel) as displayable text.
///
/// An active canvas is framed with `-` above and below and `|` on the
/// sides. The frame is presentation only; it is not part of the grid.
pub fn canvas_text(grid: Option<&Grid>) -> String {
    let Some(grid) = grid else {
        return NO_CANVAS.to_string();
    };

    let border: String = std::iter::repeat(TOP_BORDER)
        .take(grid.width() as usize + 2)
        .collect();

    let mut lines = Vec::with_capacity(grid.height() as usize + 2);
    lines.push(border.clone());
    for row in grid.rows() {
        let mut line = String::with_capacity(row.len() + 2);
        line.push(SIDE_BORDER);
        line.extend(row.iter());
        line.push(SIDE_BORDER);
        lines.push(line);
    }
    lines.push(border);
    lines.join("\n")
}

/// Renderer runtime parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    pub restore_cursor: Option<(u16, u16)>,
}

/// ANSI escape renderer painting zone strings at absolute positions.
///
/// Content is hashed per zone, so repainting an unchanged zone writes
/// nothing to the terminal.
pub struct AnsiRenderer {
    settings: RendererSettings,
    painted: HashMap<String, Hash>,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            painted: HashMap::new(),
        }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// Forget paint history so every zone repaints on the next render.
    /// Call after a resize or screen clear.
    pub fn invalidate(&mut self) {
        self.painted.clear();
    }

    /// Paint changed zones and restore the cursor. Returns how many zones
    /// were actually written.
    pub fn render(
        &mut self,
        writer: &mut impl Write,
        zones: &[(&str, Rect, String)],
    ) -> Result<usize> {
        let mut painted = 0;
        for (id, rect, content) in zones {
            let hash = blake3::hash(content.as_bytes());
            if self.painted.get(*id) == Some(&hash) {
                continue;
            }
            paint_zone(writer, *rect, content)?;
            self.painted.insert((*id).to_string(), hash);
            painted += 1;
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "\x1b[{};{}H", row + 1, col + 1)?;
        }
        writer.flush()?;
        Ok(painted)
    }
}

fn paint_zone(writer: &mut impl Write, rect: Rect, content: &str) -> Result<()> {
    if rect.width == 0 || rect.height == 0 {
        return Ok(());
    }

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    lines.truncate(rect.height as usize);
    while lines.len() < rect.height as usize {
        lines.push(String::new());
    }

    for (offset, line) in lines.iter_mut().enumerate() {
        pad_line(line, rect.width);
        write!(writer, "\x1b[{};{}H", rect.y + offset as u16 + 1, rect.x + 1)?;
        write!(writer, "{}", line)?;
    }

    Ok(())
}

/// Pad or trim a line to exactly `width` terminal columns, measured after
/// ANSI stripping so colored content aligns with plain content.
fn pad_line(line: &mut String, width: u16) {
    let mut display = display_width(line) as u16;
    while display < width {
        line.push(' ');
        display += 1;
    }

    if display > width {
        while (display_width(line) as u16) > width {
            line.pop();
        }
        while (display_width(line) as u16) < width {
            line.push(' ');
        }
    }
}
