//! System clipboard access for the "copy groups" action.

use arboard::Clipboard;

/// Clipboard writer that connects on first use.
///
/// Connecting fails on machines without a display server; that failure
/// surfaces as an error from [`ClipboardHandler::set_text`], not at startup.
#[derive(Default)]
pub struct ClipboardHandler {
    clipboard: Option<Clipboard>,
}

impl ClipboardHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents with `text`.
    pub fn set_text(&mut self, text: &str) -> Result<(), String> {
        if self.clipboard.is_none() {
            let clipboard = Clipboard::new().map_err(|e| format!("Clipboard unavailable: {}", e))?;
            self.clipboard = Some(clipboard);
        }
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| format!("Failed to set clipboard text: {}", e)),
            None => Err("Clipboard unavailable".to_string()),
        }
    }
}
