//! Page surface: the host elements the studio reads from and writes to
//!
//! These traits stand in for the DOM nodes of the studio page (prompt field,
//! diagram image, status text, history list, alert). Hosts implement
//! `PageSurface` to hand the session its element handles; `MemoryPage` keeps
//! everything in memory for the CLI and for tests.

use std::sync::Arc;

pub mod history_list;
pub mod image;
pub mod input;
pub mod status;

pub use history_list::{HistoryList, MemoryHistoryList};
pub use image::{DiagramImage, MemoryImage};
pub use input::{MemoryInput, PromptInput};
pub use status::{Alert, MemoryAlert, MemoryStatus, StatusLine};

/// Composite trait a host implements to expose its elements.
pub trait PageSurface: Send + Sync {
    fn prompt_input(&self) -> Arc<dyn PromptInput>;
    fn diagram_image(&self) -> Arc<dyn DiagramImage>;
    fn status_line(&self) -> Arc<dyn StatusLine>;
    fn history_list(&self) -> Arc<dyn HistoryList>;
    fn alert(&self) -> Arc<dyn Alert>;
}

/// Element handles resolved once when a session is created.
#[derive(Clone)]
pub struct Page {
    pub input: Arc<dyn PromptInput>,
    pub image: Arc<dyn DiagramImage>,
    pub status: Arc<dyn StatusLine>,
    pub history: Arc<dyn HistoryList>,
    pub alert: Arc<dyn Alert>,
}

impl Page {
    pub fn bind(surface: &dyn PageSurface) -> Self {
        Self {
            input: surface.prompt_input(),
            image: surface.diagram_image(),
            status: surface.status_line(),
            history: surface.history_list(),
            alert: surface.alert(),
        }
    }

    /// Capture what the page currently shows
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            input: self.input.value(),
            image_source: self.image.source(),
            image_transform: self.image.transform(),
            status: self.status.text(),
            history: self.history.entries(),
            history_hidden: self.history.is_hidden(),
        }
    }
}

/// Point-in-time view of the page, used by the CLI and by tests
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub input: String,
    pub image_source: Option<String>,
    pub image_transform: Option<String>,
    pub status: String,
    pub history: Vec<String>,
    pub history_hidden: bool,
}

/// Page whose elements all live in memory.
///
/// Handles returned through `PageSurface` share state with the typed
/// accessors, so a test can drive a session and then inspect the elements.
#[derive(Clone, Default)]
pub struct MemoryPage {
    input: Arc<MemoryInput>,
    image: Arc<MemoryImage>,
    status: Arc<MemoryStatus>,
    history: Arc<MemoryHistoryList>,
    alert: Arc<MemoryAlert>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &MemoryInput {
        &self.input
    }

    pub fn image(&self) -> &MemoryImage {
        &self.image
    }

    pub fn status(&self) -> &MemoryStatus {
        &self.status
    }

    pub fn history(&self) -> &MemoryHistoryList {
        &self.history
    }

    pub fn alerts(&self) -> &MemoryAlert {
        &self.alert
    }
}

impl PageSurface for MemoryPage {
    fn prompt_input(&self) -> Arc<dyn PromptInput> {
        self.input.clone()
    }

    fn diagram_image(&self) -> Arc<dyn DiagramImage> {
        self.image.clone()
    }

    fn status_line(&self) -> Arc<dyn StatusLine> {
        self.status.clone()
    }

    fn history_list(&self) -> Arc<dyn HistoryList> {
        self.history.clone()
    }

    fn alert(&self) -> Arc<dyn Alert> {
        self.alert.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_handles_share_state_with_memory_page() {
        let mem = MemoryPage::new();
        let page = Page::bind(&mem);

        page.input.set_value("hello");
        page.status.set_text("Loading...");
        page.history.append_entry("first");
        page.alert.alert("Please enter a prompt.");

        assert_eq!(mem.input().value(), "hello");
        assert_eq!(mem.status().text(), "Loading...");
        assert_eq!(mem.history().entries(), vec!["first"]);
        assert_eq!(mem.alerts().raised().len(), 1);

        let snap = page.snapshot();
        assert_eq!(snap.input, "hello");
        assert!(snap.image_source.is_none());
        assert!(!snap.history_hidden);
    }
}
