/// Prompt text field

pub trait PromptInput: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);

    fn clear(&self) {
        self.set_value("");
    }
}

/// In-memory text field
#[derive(Default)]
pub struct MemoryInput {
    value: std::sync::Mutex<String>,
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PromptInput for MemoryInput {
    fn value(&self) -> String {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_value(&self, value: &str) {
        let mut v = self.value.lock().unwrap_or_else(|e| e.into_inner());
        *v = value.to_string();
    }
}
