/// Image element that displays the generated diagram

pub trait DiagramImage: Send + Sync {
    /// Point the element at a new artifact
    fn set_source(&self, src: &str);
    fn source(&self) -> Option<String>;
    /// Apply a CSS transform such as `scale(1.2)`
    fn set_transform(&self, transform: &str);
    fn transform(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ImageState {
    source: Option<String>,
    transform: Option<String>,
}

/// In-memory image element
#[derive(Default)]
pub struct MemoryImage {
    state: std::sync::Mutex<ImageState>,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// An element that already shows `src`, like an `<img>` with a static source
    pub fn with_source(src: &str) -> Self {
        let img = Self::new();
        img.set_source(src);
        img
    }
}

impl DiagramImage for MemoryImage {
    fn set_source(&self, src: &str) {
        let mut s = self.state.lock().unwrap_or_else(|e| e.into_inner());
        s.source = Some(src.to_string());
    }

    fn source(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .source
            .clone()
    }

    fn set_transform(&self, transform: &str) {
        let mut s = self.state.lock().unwrap_or_else(|e| e.into_inner());
        s.transform = Some(transform.to_string());
    }

    fn transform(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .transform
            .clone()
    }
}
