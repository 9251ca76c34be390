/// Visible history list container

pub trait HistoryList: Send + Sync {
    /// Append one entry after the existing ones
    fn append_entry(&self, text: &str);
    fn entries(&self) -> Vec<String>;
    fn set_hidden(&self, hidden: bool);
    fn is_hidden(&self) -> bool;

    /// Flip the hidden flag of the whole list, returning the new value
    fn toggle_hidden(&self) -> bool {
        let hidden = !self.is_hidden();
        self.set_hidden(hidden);
        hidden
    }
}

#[derive(Debug, Default)]
struct ListState {
    entries: Vec<String>,
    hidden: bool,
}

#[derive(Default)]
pub struct MemoryHistoryList {
    state: std::sync::Mutex<ListState>,
}

impl MemoryHistoryList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryList for MemoryHistoryList {
    fn append_entry(&self, text: &str) {
        let mut s = self.state.lock().unwrap_or_else(|e| e.into_inner());
        s.entries.push(text.to_string());
    }

    fn entries(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .clone()
    }

    fn set_hidden(&self, hidden: bool) {
        let mut s = self.state.lock().unwrap_or_else(|e| e.into_inner());
        s.hidden = hidden;
    }

    fn is_hidden(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_hidden_flips_whole_list() {
        let list = MemoryHistoryList::new();
        list.append_entry("a");
        assert!(!list.is_hidden());
        assert!(list.toggle_hidden());
        assert!(!list.toggle_hidden());
        assert_eq!(list.entries(), vec!["a"]);
    }
}
