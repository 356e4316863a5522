use std::fmt::Write as _;
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Wall-clock time spent in each pipeline stage, in execution order.
#[derive(Debug, Clone, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, timer: Timer) {
        let (name, duration) = timer.stop();
        self.steps.push(StepTiming { name, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Total time spent in steps called `name`.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        let mut matching = self.steps.iter().filter(|s| s.name == name).peekable();
        matching.peek()?;
        Some(matching.map(|s| s.duration).sum())
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn summary(&self) -> String {
        let total = self.total_duration();
        let mut out = String::new();
        let _ = writeln!(out, "Pipeline Timing Summary:");
        let _ = writeln!(out, "{:-<60}", "");
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            let _ = writeln!(
                out,
                "{:<30} {:>12.3}ms ({:>5.1}%)",
                step.name,
                step.duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        let _ = writeln!(out, "{:-<60}", "");
        let _ = write!(out, "{:<30} {:>12.3}ms", "Total", total.as_secs_f64() * 1000.0);
        out
    }

    pub fn log_summary(&self) {
        for step in &self.steps {
            debug!(step = step.name, ms = step.duration.as_secs_f64() * 1000.0, "stage timing");
        }
        debug!(ms = self.total_duration().as_secs_f64() * 1000.0, "pipeline total");
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
