use serde_json::json;
use std::time::Duration;

use crate::logging::{LogEvent, LogFields, LogLevel};

/// Session counters accumulated by the runtime.
#[derive(Debug, Default, Clone)]
pub struct EngineMetrics {
    commands: u64,
    applied: u64,
    rejected: u64,
    cells_touched: u64,
    renders: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_applied(&mut self, cells: usize) {
        self.commands = self.commands.saturating_add(1);
        self.applied = self.applied.saturating_add(1);
        self.cells_touched = self.cells_touched.saturating_add(cells as u64);
    }

    pub fn record_rejected(&mut self) {
        self.commands = self.commands.saturating_add(1);
        self.rejected = self.rejected.saturating_add(1);
    }

    pub fn record_render(&mut self, painted_zones: usize) {
        if painted_zones > 0 {
            self.renders = self.renders.saturating_add(1);
        }
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            commands: self.commands,
            applied: self.applied,
            rejected: self.rejected,
            cells_touched: self.cells_touched,
            renders: self.renders,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub commands: u64,
    pub applied: u64,
    pub rejected: u64,
    pub cells_touched: u64,
    pub renders: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        let mut fields = LogFields::new();
        fields.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        fields.insert("commands".to_string(), json!(self.commands));
        fields.insert("applied".to_string(), json!(self.applied));
        fields.insert("rejected".to_string(), json!(self.rejected));
        fields.insert("cells_touched".to_string(), json!(self.cells_touched));
        fields.insert("renders".to_string(), json!(self.renders));
        LogEvent::with_fields(LogLevel::Info, target, "session_metrics", fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut metrics = EngineMetrics::new();
        metrics.record_applied(15);
        metrics.record_applied(5);
        metrics.record_rejected();
        metrics.record_render(3);
        metrics.record_render(0);

        let snapshot = metrics.snapshot(Duration::from_millis(1200));
        assert_eq!(snapshot.commands, 3);
        assert_eq!(snapshot.applied, 2);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.cells_touched, 20);
        assert_eq!(snapshot.renders, 1);
        assert_eq!(snapshot.uptime_ms, 1200);
    }

    #[test]
    fn snapshot_event_carries_all_fields() {
        let mut metrics = EngineMetrics::new();
        metrics.record_applied(4);
        let event = metrics
            .snapshot(Duration::from_secs(1))
            .to_log_event("easel::runtime.metrics");
        assert_eq!(event.fields["applied"], 1);
        assert_eq!(event.fields["cells_touched"], 4);
    }
}
