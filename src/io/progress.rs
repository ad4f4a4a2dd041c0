//! Terminal progress for batches of tile sets
//!
//! Every tile set gets a bar counting decided cells. Only the most recent
//! bars stay on screen, and batches of more than one file add an overall bar
//! counting finished files.

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static CELL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix:>24}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} cells {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static FILES_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{bar:{PROGRESS_BAR_WIDTH}.green/white}} {{pos}}/{{len}} tile sets"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

struct FileBar {
    index: usize,
    bar: ProgressBar,
}

/// Progress display for one batch run
pub struct ProgressManager {
    multi_progress: MultiProgress,
    files_bar: Option<ProgressBar>,
    visible: VecDeque<FileBar>,
    decided: Vec<usize>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager with nothing on screen
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            files_bar: None,
            visible: VecDeque::new(),
            decided: Vec::new(),
            file_count: 0,
        }
    }

    /// Announce how many tile sets the batch holds
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;
        self.decided = vec![0; file_count];

        if file_count > 1 {
            let files_bar = ProgressBar::new(file_count as u64);
            files_bar.set_style(FILES_STYLE.clone());
            self.files_bar = Some(self.multi_progress.add(files_bar));
        }
    }

    /// Number of tile sets announced by [`ProgressManager::initialize`]
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Last reported decided-cell count of a file
    pub fn decided(&self, index: usize) -> Option<usize> {
        self.decided.get(index).copied()
    }

    /// Number of file bars currently on screen
    pub fn visible_bars(&self) -> usize {
        self.visible.len()
    }

    /// Open a bar for a tile set whose grid has `cells` cells
    ///
    /// The oldest bar is dropped once [`MAX_INDIVIDUAL_PROGRESS_BARS`] are shown.
    pub fn start_file(&mut self, index: usize, path: &Path, cells: usize) {
        if self.visible.len() >= MAX_INDIVIDUAL_PROGRESS_BARS {
            if let Some(oldest) = self.visible.pop_front() {
                self.multi_progress.remove(&oldest.bar);
            }
        }
        if index >= self.decided.len() {
            self.decided.resize(index + 1, 0);
        }
        if let Some(decided) = self.decided.get_mut(index) {
            *decided = 0;
        }

        let bar = ProgressBar::new(cells as u64);
        bar.set_style(CELL_STYLE.clone());
        bar.set_prefix(
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        );
        let bar = self.multi_progress.add(bar);
        self.visible.push_back(FileBar { index, bar });
    }

    /// Report how many cells of a file's grid are decided
    ///
    /// A restarted attempt moves the bar backwards.
    pub fn update_cells(&mut self, index: usize, decided: usize) {
        let Some(slot) = self.decided.get_mut(index) else {
            return;
        };
        *slot = decided;
        if let Some(bar) = self.bar(index) {
            bar.set_position(decided as u64);
        }
    }

    /// Close a file's bar, filled and ticked on success, crossed otherwise
    pub fn complete_file(&mut self, index: usize, success: bool, elapsed: Duration) {
        if let Some(files_bar) = &self.files_bar {
            files_bar.inc(1);
        }

        let seconds = elapsed.as_secs_f64();
        let filled = self.bar(index).map(|bar| {
            if success {
                let length = bar.length().unwrap_or(0);
                bar.set_position(length);
                bar.finish_with_message(format!("✓ {seconds:.1}s"));
                Some(length as usize)
            } else {
                bar.abandon_with_message(format!("✗ {seconds:.1}s"));
                None
            }
        });
        if let (Some(Some(length)), Some(decided)) = (filled, self.decided.get_mut(index)) {
            *decided = length;
        }
    }

    /// Close the overall bar and clear the display
    pub fn finish(&self) {
        if let Some(files_bar) = &self.files_bar {
            files_bar.finish_with_message("All tile sets processed");
        }
        let _ = self.multi_progress.clear();
    }

    fn bar(&self, index: usize) -> Option<&ProgressBar> {
        self.visible
            .iter()
            .rev()
            .find(|file| file.index == index)
            .map(|file| &file.bar)
    }
}
