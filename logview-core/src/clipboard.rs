use std::sync::Mutex;

use crate::host::ClipboardError;

/// System clipboard via arboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&self, contents: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ClipboardError::Backend("clipboard lock poisoned".into()))?;
        if guard.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError::Backend(e.to_string()))?;
            *guard = Some(clipboard);
        }
        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(contents.to_string())
                .map_err(|e| ClipboardError::Backend(e.to_string())),
            None => Err(ClipboardError::Backend("clipboard unavailable".into())),
        }
    }
}
