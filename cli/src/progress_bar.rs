use indicatif::{ProgressBar, ProgressStyle};
use resynthesizer::{FillProgress, ProgressStat};

/// Shows the overall fill progress, over every pass, in the terminal
pub struct FillProgressBar {
    bar: ProgressBar,
    total_len: usize,
}

impl FillProgressBar {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {percent}%")
                .progress_chars("##-"),
        );

        Self {
            bar,
            total_len: 100,
        }
    }
}

impl Drop for FillProgressBar {
    fn drop(&mut self) {
        self.bar.finish();
    }
}

impl FillProgress for FillProgressBar {
    fn update(&mut self, stat: ProgressStat) {
        if stat.total != self.total_len {
            self.total_len = stat.total;
            self.bar.set_length(self.total_len as u64);
        }

        self.bar.set_position(stat.current as u64);
    }
}
