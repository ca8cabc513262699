//! バッチ処理の進捗表示（CLI）

use crate::batch::{progress_message, BatchObserver, BatchReport, FileError};
use image_extract_common::ExtractionRecord;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// indicatifのプログレスバーで進捗を表示する
#[derive(Default)]
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    verbose: bool,
}

impl ProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { bar: None, verbose }
    }

    fn bar(&mut self, total: usize) -> &ProgressBar {
        self.bar.get_or_insert_with(|| {
            let style = ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            let bar = ProgressBar::new(total as u64);
            bar.set_style(style);
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            bar
        })
    }

    fn println(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }
}

impl BatchObserver for ProgressReporter {
    fn on_file_start(&mut self, index: usize, total: usize, file_name: &str) {
        self.bar(total).set_message(progress_message(index, total, file_name));
    }

    fn on_file_success(&mut self, record: &ExtractionRecord) {
        if self.verbose {
            self.println(format!(
                "  ✔ {} ({}項目, id={})",
                record.source_name,
                record.fields.len(),
                record.id
            ));
        }
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_file_failure(&mut self, error: &FileError) {
        self.println(format!("  ✖ {}", error));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_finish(&mut self, _report: &BatchReport) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
