//! Progress renderers
//!
//! The executor reports every step event to a [`StepRenderer`]. Two
//! interactive renderers exist: a line-per-event renderer for CI logs and a
//! live spinner renderer for terminals. Renderers never change what runs.

use crate::domain::SpacedumpError;
use chrono::Local;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Receives step lifecycle events from the executor
pub trait StepRenderer: Send + Sync {
    fn started(&self, title: &str, depth: usize);
    fn skipped(&self, title: &str, depth: usize);
    fn completed(&self, title: &str, depth: usize);
    fn failed(&self, title: &str, depth: usize, error: &SpacedumpError);
    fn output(&self, title: &str, depth: usize, message: &str);
}

/// Picks the renderer for a run
pub fn renderer_for(verbose: bool) -> Arc<dyn StepRenderer> {
    if verbose {
        Arc::new(VerboseRenderer)
    } else {
        Arc::new(UpdateRenderer::new())
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Prints one timestamped line per event
#[derive(Debug, Default, Clone, Copy)]
pub struct VerboseRenderer;

impl VerboseRenderer {
    fn line(&self, depth: usize, text: &str) {
        println!("[{}] {}{}", Local::now().format("%H:%M:%S"), indent(depth), text);
    }
}

impl StepRenderer for VerboseRenderer {
    fn started(&self, title: &str, depth: usize) {
        self.line(depth, &format!("{title} [started]"));
    }

    fn skipped(&self, title: &str, depth: usize) {
        self.line(depth, &format!("{title} [skipped]"));
    }

    fn completed(&self, title: &str, depth: usize) {
        self.line(depth, &format!("{title} [completed]"));
    }

    fn failed(&self, title: &str, depth: usize, error: &SpacedumpError) {
        self.line(depth, &format!("{title} [failed]"));
        self.line(depth, &format!("→ {error}"));
    }

    fn output(&self, _title: &str, depth: usize, message: &str) {
        self.line(depth, &format!("→ {message}"));
    }
}

/// Live spinner per running step, replaced by a status mark when it settles
pub struct UpdateRenderer {
    progress: MultiProgress,
    bars: Mutex<HashMap<(usize, String), ProgressBar>>,
}

impl UpdateRenderer {
    pub fn new() -> Self {
        Self {
            progress: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix}{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
    }

    fn settled_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix}{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn take(&self, title: &str, depth: usize) -> Option<ProgressBar> {
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(depth, title.to_string()))
    }

    fn settle(&self, title: &str, depth: usize, message: String) {
        let bar = self.take(title, depth).unwrap_or_else(|| {
            let bar = self.progress.add(ProgressBar::new_spinner());
            bar.set_prefix(indent(depth));
            bar
        });
        bar.set_style(Self::settled_style());
        bar.finish_with_message(message);
    }
}

impl Default for UpdateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepRenderer for UpdateRenderer {
    fn started(&self, title: &str, depth: usize) {
        let bar = self.progress.add(ProgressBar::new_spinner());
        bar.set_style(Self::spinner_style());
        bar.set_prefix(indent(depth));
        bar.set_message(title.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((depth, title.to_string()), bar);
    }

    fn skipped(&self, title: &str, depth: usize) {
        self.settle(title, depth, format!("↓ {title} [skipped]"));
    }

    fn completed(&self, title: &str, depth: usize) {
        self.settle(title, depth, format!("✔ {title}"));
    }

    fn failed(&self, title: &str, depth: usize, error: &SpacedumpError) {
        self.settle(title, depth, format!("✖ {title}\n{}  → {error}", indent(depth)));
    }

    fn output(&self, title: &str, depth: usize, message: &str) {
        let bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bar) = bars.get(&(depth, title.to_string())) {
            bar.set_message(format!("{title} → {message}"));
        }
    }
}

/// Discards every event; used by library callers and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentRenderer;

impl StepRenderer for SilentRenderer {
    fn started(&self, _title: &str, _depth: usize) {}
    fn skipped(&self, _title: &str, _depth: usize) {}
    fn completed(&self, _title: &str, _depth: usize) {}
    fn failed(&self, _title: &str, _depth: usize, _error: &SpacedumpError) {}
    fn output(&self, _title: &str, _depth: usize, _message: &str) {}
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "    ");
    }

    #[test]
    fn test_update_renderer_tracks_running_steps() {
        let renderer = UpdateRenderer::new();
        renderer.started("Fetching data from space", 0);
        renderer.output("Fetching data from space", 0, "page 2");
        assert_eq!(renderer.bars.lock().unwrap().len(), 1);

        renderer.completed("Fetching data from space", 0);
        assert!(renderer.bars.lock().unwrap().is_empty());

        // A skipped step never started; settling it must not leave a bar behind
        renderer.skipped("Download assets", 0);
        assert!(renderer.bars.lock().unwrap().is_empty());
    }
}
