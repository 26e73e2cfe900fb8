use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::command::domain::channel::Command;
use crate::command::domain::command_debouncer::Delivery;
use crate::command::domain::dispatch_router::DispatchError;
use crate::tracking::domain::lock_state::Transition;

/// Observer for follow-me loop events.
///
/// Keeps the frame loop free of output concerns; the CLI aggregates and
/// prints, tests usually discard.
pub trait SessionLogger: Send {
    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. candidate count).
    fn metric(&mut self, name: &str, value: f64);

    fn transition(&mut self, transition: &Transition);

    /// Record what happened to a command handed to the debouncer.
    fn command(&mut self, command: Command, result: &Result<Delivery, DispatchError>);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn transition(&mut self, _transition: &Transition) {}
    fn command(&mut self, _command: Command, _result: &Result<Delivery, DispatchError>) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CommandTally {
    sent: usize,
    suppressed: usize,
    failed: usize,
}

/// Aggregates per-stage timings, metrics and command outcomes and logs a
/// summary report when the run ends.
pub struct StdoutSessionLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    transitions: Vec<Transition>,
    commands: BTreeMap<String, CommandTally>,
    start_time: Instant,
}

impl StdoutSessionLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            transitions: Vec::new(),
            commands: BTreeMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Returns the formatted summary string, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() && self.commands.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Session summary ({} transitions, {elapsed_s:.1}s total):",
            self.transitions.len()
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:6.2}ms over {} frames",
                durations.len()
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let avg = values.iter().sum::<f64>() / values.len().max(1) as f64;
            lines.push(format!("  {name}: avg {avg:.1}"));
        }

        for (command, tally) in &self.commands {
            lines.push(format!(
                "  {command}: sent {} suppressed {} failed {}",
                tally.sent, tally.suppressed, tally.failed
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

impl Default for StdoutSessionLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLogger for StdoutSessionLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn transition(&mut self, transition: &Transition) {
        self.transitions.push(*transition);
    }

    fn command(&mut self, command: Command, result: &Result<Delivery, DispatchError>) {
        let tally = self.commands.entry(command.to_string()).or_default();
        match result {
            Ok(Delivery::Sent(_)) => tally.sent += 1,
            Ok(Delivery::Suppressed) => tally.suppressed += 1,
            Err(e) => {
                tally.failed += 1;
                log::warn!("Command {command} not delivered: {e}");
            }
        }
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
