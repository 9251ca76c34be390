//! Prompt history: an append-only log mirrored into the page's history list.

use crate::page::HistoryList;

/// Records successfully submitted prompts for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    entries: Vec<String>,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `prompt` to the log and add one visible entry after the others.
    pub fn record(&mut self, prompt: &str, list: &dyn HistoryList) {
        self.entries.push(prompt.to_string());
        list.append_entry(prompt);
    }

    /// Show or hide the whole list. Two calls cancel out.
    pub fn toggle_visibility(&self, list: &dyn HistoryList) -> bool {
        let hidden = list.toggle_hidden();
        log::debug!("history list hidden={}", hidden);
        hidden
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
