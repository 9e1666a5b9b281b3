//! Page lifecycle and timing.

use std::time::{Duration, Instant};

/// Where a streamed page currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Nothing written yet.
    Start,
    /// Layout chrome and placeholders are out.
    ShellSent,
    /// The named region was the last one written.
    RegionSent(String),
    /// The closing shell is out and the body flushed.
    Complete,
}

/// When one region went out, relative to the start of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTiming {
    pub name: String,
    pub started: Duration,
    pub sent: Duration,
}

impl RegionTiming {
    /// Time spent writing the region.
    pub fn write_time(&self) -> Duration {
        self.sent.saturating_sub(self.started)
    }
}

/// Timing marks for one page, anchored at creation.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    shell_sent: Option<Duration>,
    regions: Vec<RegionTiming>,
    completed: Option<Duration>,
}

impl TimingContext {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            shell_sent: None,
            regions: Vec::new(),
            completed: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn mark_shell_sent(&mut self) {
        self.shell_sent = Some(self.elapsed());
    }

    /// Record a region written between `started` and now.
    pub fn mark_region(&mut self, name: &str, started: Instant) {
        self.regions.push(RegionTiming {
            name: name.to_string(),
            started: started.saturating_duration_since(self.start),
            sent: self.elapsed(),
        });
    }

    pub fn mark_complete(&mut self) {
        self.completed = Some(self.elapsed());
    }

    pub fn time_to_shell(&self) -> Option<Duration> {
        self.shell_sent
    }

    pub fn time_to_first_region(&self) -> Option<Duration> {
        self.regions.first().map(|r| r.sent)
    }

    pub fn total(&self) -> Option<Duration> {
        self.completed
    }

    /// Timing of a region by name. A region is only sent once per page.
    pub fn region(&self, name: &str) -> Option<&RegionTiming> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Every region in send order.
    pub fn regions(&self) -> &[RegionTiming] {
        &self.regions
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_recorded() {
        let timing = TimingContext::new();
        assert!(timing.time_to_shell().is_none());
        assert!(timing.time_to_first_region().is_none());
        assert!(timing.region("customers").is_none());
        assert!(timing.total().is_none());
    }

    #[test]
    fn test_marks_are_ordered() {
        let mut timing = TimingContext::new();
        timing.mark_shell_sent();
        let started = Instant::now();
        timing.mark_region("customers", started);
        timing.mark_region("orders", Instant::now());
        timing.mark_complete();

        let region = timing.region("customers").unwrap();
        assert!(region.sent >= region.started);
        assert!(timing.time_to_first_region().unwrap() >= timing.time_to_shell().unwrap());
        assert_eq!(timing.regions().len(), 2);
        assert_eq!(timing.regions()[1].name, "orders");
        assert!(timing.total().unwrap() >= timing.regions()[1].sent);
    }
}
