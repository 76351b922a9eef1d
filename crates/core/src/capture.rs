use chrono::NaiveDate;

/// Normalized input for capturing a task from any client (CLI, TUI).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub text: Vec<String>,
    pub date: Option<NaiveDate>,
}

pub type CaptureInput = TaskInput;

impl TaskInput {
    pub fn new(title: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            text: vec![title.into()],
            date,
        }
    }

    /// Words joined with single spaces and trimmed.
    pub fn title(&self) -> String {
        self.text
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Trimmed title, or `None` when nothing but whitespace was entered.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
