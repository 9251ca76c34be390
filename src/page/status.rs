/// Status text and blocking user notices

/// Status line shown under the prompt (network outcomes go here)
pub trait StatusLine: Send + Sync {
    fn set_text(&self, text: &str);
    fn text(&self) -> String;
}

/// Blocking notice, the equivalent of `window.alert`
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

#[derive(Default)]
pub struct MemoryStatus {
    text: std::sync::Mutex<String>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusLine for MemoryStatus {
    fn set_text(&self, text: &str) {
        let mut t = self.text.lock().unwrap_or_else(|e| e.into_inner());
        *t = text.to_string();
    }

    fn text(&self) -> String {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Records every alert raised so tests and the CLI can inspect them
#[derive(Default)]
pub struct MemoryAlert {
    raised: std::sync::Mutex<Vec<String>>,
}

impl MemoryAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raised(&self) -> Vec<String> {
        self.raised.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Drain pending alerts (the CLI prints them once)
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.raised.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Alert for MemoryAlert {
    fn alert(&self, message: &str) {
        self.raised
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_accumulate_and_drain() {
        let a = MemoryAlert::new();
        a.alert("one");
        a.alert("two");
        assert_eq!(a.raised(), vec!["one", "two"]);
        assert_eq!(a.take().len(), 2);
        assert!(a.raised().is_empty());
    }
}
