use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use serde_json::json;

use crate::engine::{CanvasEngine, Outcome};
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::layout::{Constraint, split_rows};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::EngineMetrics;
use crate::render::{AnsiRenderer, canvas_text};
use crate::width::display_width;

pub mod driver;

pub const CANVAS_ZONE: &str = "easel:canvas";
pub const INPUT_ZONE: &str = "easel:input";
pub const STATUS_ZONE: &str = "easel:status";
pub const HINTS_ZONE: &str = "easel:hints";

const PROMPT: &str = "> ";
const HINTS_TEXT: &str =
    "C w h · L x1 y1 x2 y2 · R x1 y1 x2 y2 · B x y c · Q · Enter submits · Esc exits";

/// Configuration knobs for the session loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick passes while idle.
    pub tick_interval: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Session counters shared with the embedding application.
    pub metrics: Option<Arc<Mutex<EngineMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "easel::runtime.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(EngineMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<EngineMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Events delivered to the session loop.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Paste(String),
    Resize(Size),
}

#[derive(Debug, Clone, Copy)]
struct ZoneRects {
    canvas: Rect,
    input: Rect,
    status: Rect,
    hints: Rect,
}

fn solve_zones(size: Size) -> ZoneRects {
    let rows = split_rows(
        Rect::new(0, 0, size.width, size.height),
        &[
            Constraint::Flex(1),
            Constraint::Fixed(1),
            Constraint::Fixed(1),
            Constraint::Fixed(1),
        ],
    );
    ZoneRects {
        canvas: rows[0],
        input: rows[1],
        status: rows[2],
        hints: rows[3],
    }
}

/// Interactive sketchpad session.
///
/// Owns the command engine, the zone layout, and the line buffer being
/// edited. Keystrokes edit the buffer; every edit re-probes the engine's
/// pure validity check so the echoed command can be colored green or red
/// before it is ever committed. Enter submits the buffer to the engine and
/// the outcome lands in the status zone.
pub struct EaselRuntime {
    engine: CanvasEngine,
    renderer: AnsiRenderer,
    rects: ZoneRects,
    buffer: String,
    status: String,
    config: RuntimeConfig,
    should_exit: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl EaselRuntime {
    pub fn new(renderer: AnsiRenderer, initial_size: Size) -> Self {
        Self::with_config(renderer, initial_size, RuntimeConfig::default())
    }

    pub fn with_config(renderer: AnsiRenderer, initial_size: Size, config: RuntimeConfig) -> Self {
        Self {
            engine: CanvasEngine::new(),
            renderer,
            rects: solve_zones(initial_size),
            buffer: String::new(),
            status: "ready".to_string(),
            config,
            should_exit: false,
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    /// Read-only access to the engine for embedding code and tests.
    pub fn engine(&self) -> &CanvasEngine {
        &self.engine
    }

    /// Re-solve the zone layout for a new terminal size.
    pub fn resize(&mut self, size: Size) {
        self.rects = solve_zones(size);
        self.renderer.invalidate();
        self.log_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
    }

    /// Drive a live terminal until exit is requested.
    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if event::poll(timeout)? {
                if let Some(runtime_event) = map_event(event::read()?) {
                    self.dispatch_event(runtime_event);
                    self.render(stdout)?;
                    if self.should_exit {
                        break;
                    }
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed });
                self.render(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Replay a batch of events without a terminal. Used by tests and
    /// benches, and usable as a headless script driver.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            self.dispatch_event(event);
            self.render(stdout)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.ensure_metrics_initialized();
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.renderer.invalidate();
        self.log_event(LogLevel::Info, "session_started", std::iter::empty());
        self.render(stdout)
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) {
        match &event {
            RuntimeEvent::Key(key) => self.handle_key(*key),
            RuntimeEvent::Paste(data) => {
                self.buffer.extend(data.chars().filter(|ch| !ch.is_control()));
            }
            RuntimeEvent::Resize(size) => self.resize(*size),
            RuntimeEvent::Tick { .. } => {}
        }
        self.log_event(
            LogLevel::Debug,
            "event_dispatched",
            [json_kv("event", json!(describe_event(&event)))],
        );
        self.maybe_emit_metrics();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Esc => self.request_exit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_exit()
            }
            KeyCode::Enter => self.submit_buffer(),
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.push(ch);
            }
            _ => {}
        }
    }

    fn request_exit(&mut self) {
        self.should_exit = true;
        self.log_event(LogLevel::Info, "exit_requested", std::iter::empty());
    }

    fn submit_buffer(&mut self) {
        let line = std::mem::take(&mut self.buffer);
        if line.is_empty() {
            return;
        }

        match self.engine.submit(&line) {
            Outcome::Applied(applied) => {
                self.status = format!("applied {} · {} cells", applied.op, applied.cells);
                self.record_applied(applied.cells);
                self.log_event(
                    LogLevel::Info,
                    "command_applied",
                    [
                        json_kv("op", json!(applied.op)),
                        json_kv("cells", json!(applied.cells)),
                    ],
                );
            }
            Outcome::Rejected(rejection) => {
                self.status = format!("rejected: {rejection}");
                self.record_rejected();
                self.log_event(
                    LogLevel::Info,
                    "command_rejected",
                    [json_kv("reason", json!(rejection.to_string()))],
                );
            }
        }
    }

    fn render(&mut self, stdout: &mut impl Write) -> Result<()> {
        let zones = [
            (CANVAS_ZONE, self.rects.canvas, canvas_text(self.engine.grid())),
            (INPUT_ZONE, self.rects.input, self.input_display()),
            (STATUS_ZONE, self.rects.status, self.status.clone()),
            (HINTS_ZONE, self.rects.hints, HINTS_TEXT.to_string()),
        ];

        let caret_base = self.rects.input.x
            + (display_width(PROMPT) + display_width(&self.buffer)) as u16;
        let caret_x = caret_base.min(self.rects.input.right().saturating_sub(1));
        self.renderer.settings_mut().restore_cursor = Some((self.rects.input.y, caret_x));

        let painted = self.renderer.render(stdout, &zones)?;
        if painted > 0 {
            self.record_render(painted);
            self.log_event(
                LogLevel::Debug,
                "render_completed",
                [json_kv("zones", json!(painted))],
            );
        }
        Ok(())
    }

    /// Echo of the line being edited, colored by the engine's pure validity
    /// probe so the verdict is visible before the command is committed.
    fn input_display(&self) -> String {
        let echoed = format!("{PROMPT}{}", self.buffer);
        if self.buffer.is_empty() {
            return echoed;
        }
        if self.engine.is_valid(&self.buffer) {
            format!("{}", echoed.green())
        } else {
            format!("{}", echoed.red())
        }
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_event(
            LogLevel::Info,
            "session_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && self.config.metrics_interval > Duration::from_millis(0)
        {
            self.config.metrics = Some(Arc::new(Mutex::new(EngineMetrics::new())));
        }
    }

    fn log_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, "easel::runtime", message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_applied(&mut self, cells: usize) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_applied(cells);
            }
        }
    }

    fn record_rejected(&mut self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_rejected();
            }
        }
    }

    fn record_render(&mut self, painted: usize) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_render(painted);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() {
            return;
        }
        if self.config.metrics_interval == Duration::from_millis(0) {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {
                return;
            }
            _ => {
                self.last_metrics_emit = Some(now);
            }
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let event = guard.snapshot(uptime).to_log_event(target);
                let _ = logger.log_event(event);
            }
        }
    }
}

fn map_event(event: CrosstermEvent) -> Option<RuntimeEvent> {
    match event {
        CrosstermEvent::Key(key) => Some(RuntimeEvent::Key(key)),
        CrosstermEvent::Paste(data) => Some(RuntimeEvent::Paste(data)),
        CrosstermEvent::Resize(width, height) => {
            Some(RuntimeEvent::Resize(Size::new(width, height)))
        }
        _ => None,
    }
}

fn describe_event(event: &RuntimeEvent) -> &'static str {
    match event {
        RuntimeEvent::Tick { .. } => "tick",
        RuntimeEvent::Key(_) => "key",
        RuntimeEvent::Paste(_) => "paste",
        RuntimeEvent::Resize(_) => "resize",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::STROKE;
    use crate::render::NO_CANVAS;

    fn scripted(lines: &[&str]) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        for line in lines {
            for ch in line.chars() {
                events.push(RuntimeEvent::Key(KeyEvent::new(
                    KeyCode::Char(ch),
                    KeyModifiers::NONE,
                )));
            }
            events.push(RuntimeEvent::Key(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::NONE,
            )));
        }
        events
    }

    fn runtime() -> EaselRuntime {
        let mut config = RuntimeConfig::default();
        config.metrics_interval = Duration::from_millis(0);
        EaselRuntime::with_config(AnsiRenderer::with_default(), Size::new(40, 12), config)
    }

    #[test]
    fn typed_commands_reach_the_engine() {
        let mut runtime = runtime();
        let mut sink = std::io::sink();
        runtime
            .run_scripted(&mut sink, scripted(&["C 5 3", "L 1 1 5 1"]))
            .unwrap();

        let grid = runtime.engine().grid().unwrap();
        assert_eq!((grid.width(), grid.height()), (5, 3));
        assert_eq!(grid.get(0, 0), Some(STROKE));
        assert_eq!(runtime.status, "applied line · 5 cells");
    }

    #[test]
    fn rejected_commands_report_without_mutating() {
        let mut runtime = runtime();
        let mut sink = std::io::sink();
        runtime
            .run_scripted(&mut sink, scripted(&["C 5 3", "L 1 1 5 5"]))
            .unwrap();

        assert_eq!(
            runtime.status,
            "rejected: only horizontal or vertical lines are supported"
        );
        let grid = runtime.engine().grid().unwrap();
        assert_eq!(grid.get(0, 0), Some(crate::grid::BLANK));
    }

    #[test]
    fn quit_command_returns_to_the_sentinel() {
        let mut runtime = runtime();
        let mut output = Vec::new();
        runtime
            .run_scripted(&mut output, scripted(&["C 4 2", "Q"]))
            .unwrap();

        assert!(runtime.engine().grid().is_none());
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains(NO_CANVAS));
    }

    #[test]
    fn escape_ends_the_session() {
        let mut runtime = runtime();
        let mut sink = std::io::sink();
        let mut events = scripted(&["C 4 2"]);
        events.push(RuntimeEvent::Key(KeyEvent::new(
            KeyCode::Esc,
            KeyModifiers::NONE,
        )));
        events.extend(scripted(&["L 1 1 4 1"]));
        runtime.run_scripted(&mut sink, events).unwrap();

        // Events after Esc were not processed.
        assert_eq!(runtime.engine().grid().unwrap().get(0, 0), Some(crate::grid::BLANK));
    }

    #[test]
    fn input_echo_is_colored_by_validity() {
        let mut runtime = runtime();
        let mut sink = std::io::sink();
        runtime.run_scripted(&mut sink, Vec::new()).unwrap();

        runtime.buffer = "C 5 3".to_string();
        let valid = runtime.input_display();
        assert!(valid.contains("\u{1b}["));

        runtime.buffer = "C 5".to_string();
        let invalid = runtime.input_display();
        assert!(invalid.contains("\u{1b}["));
        assert_ne!(valid, invalid);

        runtime.buffer.clear();
        assert_eq!(runtime.input_display(), "> ");
    }

    #[test]
    fn backspace_edits_the_buffer() {
        let mut runtime = runtime();
        runtime.handle_key(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::NONE));
        runtime.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        runtime.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(runtime.buffer, "Q");
    }

    #[test]
    fn paste_strips_control_characters() {
        let mut runtime = runtime();
        runtime.dispatch_event(RuntimeEvent::Paste("C 5\n 3".to_string()));
        assert_eq!(runtime.buffer, "C 5 3");
    }

    #[test]
    fn metrics_track_the_session() {
        let mut config = RuntimeConfig::default();
        config.enable_metrics();
        config.metrics_interval = Duration::from_millis(0);
        let handle = config.metrics_handle().unwrap();

        let mut runtime =
            EaselRuntime::with_config(AnsiRenderer::with_default(), Size::new(40, 12), config);
        let mut sink = std::io::sink();
        runtime
            .run_scripted(&mut sink, scripted(&["C 5 3", "bogus", "B 2 2 #"]))
            .unwrap();

        let snapshot = handle.lock().unwrap().snapshot(Duration::from_secs(1));
        assert_eq!(snapshot.commands, 3);
        assert_eq!(snapshot.applied, 2);
        assert_eq!(snapshot.rejected, 1);
        // 15 cells from the create, 15 from filling the open canvas.
        assert_eq!(snapshot.cells_touched, 30);
    }

    #[test]
    fn end_to_end_drawing_session() {
        let mut runtime = runtime();
        let mut output = Vec::new();
        runtime
            .run_scripted(
                &mut output,
                scripted(&["C 5 3", "L 1 1 5 1", "R 1 1 5 3", "B 3 2 #", "Q", "L 1 1 1 1"]),
            )
            .unwrap();

        assert!(runtime.engine().grid().is_none());
        assert_eq!(runtime.status, "rejected: no active canvas");
        let rendered = String::from_utf8(output).unwrap();
        // The filled interior row was painted before the quit.
        assert!(rendered.contains("|x###x|"));
        assert!(rendered.contains(NO_CANVAS));
    }
}
