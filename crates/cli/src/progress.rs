use classmap_graph::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar fed by discovery percentages
pub(crate) struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub(crate) fn new(quiet: bool) -> Self {
        if quiet {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(100);
        if let Ok(style) =
            ProgressStyle::with_template("{msg} [{bar:30}] {pos:>3}%").map(|s| s.progress_chars("=> "))
        {
            bar.set_style(style);
        }
        bar.set_message("Parsing documents");
        Self { bar }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarReporter {
    fn report(&mut self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }
}
