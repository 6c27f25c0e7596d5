/// Receives completion percentages (0..=100) during discovery
pub trait ProgressReporter {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressReporter for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Reporter that drops every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Converts processed-item counts into throttled percentage reports.
///
/// A report is emitted once the percentage has moved by at least `threshold`
/// since the previous one; `finish` always reports 100.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    done: usize,
    threshold: u8,
    last_reported: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total: usize, threshold: u8) -> Self {
        Self {
            total,
            done: 0,
            threshold: threshold.clamp(1, 100),
            last_reported: None,
        }
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.done.min(self.total) * 100) / self.total;
        pct as u8
    }

    /// Mark one more item as processed
    pub fn increment(&mut self, reporter: &mut dyn ProgressReporter) {
        self.done = self.done.saturating_add(1);
        let pct = self.percent();
        let due = match self.last_reported {
            None => pct >= self.threshold,
            Some(last) => pct.saturating_sub(last) >= self.threshold,
        };
        if due {
            self.emit(pct, reporter);
        }
    }

    pub fn finish(&mut self, reporter: &mut dyn ProgressReporter) {
        self.done = self.total;
        if self.last_reported != Some(100) {
            self.emit(100, reporter);
        }
    }

    fn emit(&mut self, pct: u8, reporter: &mut dyn ProgressReporter) {
        if self.last_reported.is_some_and(|last| pct < last) {
            return;
        }
        self.last_reported = Some(pct);
        reporter.report(pct);
    }
}
