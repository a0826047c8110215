// Hover / click payloads coming back from the rendering surface.
// They are shown to the user verbatim; nothing here interprets them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Hover,
    Click,
}

impl InteractionKind {
    pub fn label(&self) -> &'static str {
        match self {
            InteractionKind::Hover => "Hover Data",
            InteractionKind::Click => "Click Data",
        }
    }
}

/// Pretty-print an event payload with two-space indent; no payload is `null`
pub fn render_event(payload: Option<&serde_json::Value>) -> Result<String> {
    serde_json::to_string_pretty(&payload).context("Failed to format event payload")
}

/// Same as `render_event` for raw JSON text
pub fn render_event_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return render_event(None);
    }
    let payload: serde_json::Value =
        serde_json::from_str(trimmed).context("Event payload is not valid JSON")?;
    render_event(Some(&payload))
}
