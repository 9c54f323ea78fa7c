//! Getting generated text into whatever application has focus.
//!
//! The default route copies the text to the clipboard and sends the platform
//! paste chord; the alternative types it out key by key with enigo. Also
//! reads the current selection for the rephrase panel.

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PasteConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasteMethod {
    /// Copy to the clipboard, then press Ctrl/Cmd+V.
    #[default]
    Clipboard,
    /// Type the text directly.
    Type,
}

#[derive(Debug, Error)]
pub enum InsertError {
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error("keyboard simulation error: {0}")]
    Keyboard(String),
}

pub struct Inserter {
    enigo: Enigo,
    clipboard: Option<Clipboard>,
    settings: PasteConfig,
}

impl Inserter {
    pub fn new(settings: PasteConfig) -> Result<Self, InsertError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| InsertError::Keyboard(format!("failed to initialize enigo: {}", e)))?;

        // Typing directly still works without a clipboard.
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) if settings.method == PasteMethod::Type => {
                debug!("clipboard unavailable: {}", e);
                None
            }
            Err(e) => return Err(InsertError::Clipboard(e.to_string())),
        };

        Ok(Inserter {
            enigo,
            clipboard,
            settings,
        })
    }

    /// Insert `text` at the cursor of the focused application. Blocks for the
    /// focus delay and the paste round trip.
    pub fn insert(&mut self, text: &str) -> Result<(), InsertError> {
        if text.is_empty() {
            return Ok(());
        }

        thread::sleep(Duration::from_millis(self.settings.focus_delay_ms));

        match self.settings.method {
            PasteMethod::Type => self.type_direct(text),
            PasteMethod::Clipboard => match self.paste_via_clipboard(text) {
                Ok(()) => Ok(()),
                Err(InsertError::Clipboard(e)) => {
                    warn!("clipboard paste failed ({}), typing instead", e);
                    self.type_direct(text)
                }
                Err(e) => Err(e),
            },
        }
    }

    fn paste_via_clipboard(&mut self, text: &str) -> Result<(), InsertError> {
        let restore = self.settings.restore_clipboard;
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| InsertError::Clipboard("no clipboard available".to_string()))?;

        let previous = if restore { clipboard.get_text().ok() } else { None };

        clipboard
            .set_text(text)
            .map_err(|e| InsertError::Clipboard(e.to_string()))?;

        thread::sleep(Duration::from_millis(50));
        let pasted = self.send_paste();
        thread::sleep(Duration::from_millis(100));

        if let (Some(previous), Some(clipboard)) = (previous, self.clipboard.as_mut()) {
            if let Err(e) = clipboard.set_text(previous) {
                debug!("could not restore clipboard: {}", e);
            }
        }

        pasted
    }

    fn send_paste(&mut self) -> Result<(), InsertError> {
        let modifier = paste_modifier();
        self.enigo
            .key(modifier, Direction::Press)
            .map_err(|e| InsertError::Keyboard(e.to_string()))?;
        thread::sleep(Duration::from_millis(10));

        let clicked = self.enigo.key(Key::Unicode('v'), Direction::Click);
        thread::sleep(Duration::from_millis(50));

        // Always release the modifier, even if the click failed.
        let released = self.enigo.key(modifier, Direction::Release);

        clicked.map_err(|e| InsertError::Keyboard(e.to_string()))?;
        released.map_err(|e| InsertError::Keyboard(e.to_string()))
    }

    fn type_direct(&mut self, text: &str) -> Result<(), InsertError> {
        self.enigo
            .text(text)
            .map_err(|e| InsertError::Keyboard(e.to_string()))
    }
}

pub fn paste_modifier() -> Key {
    #[cfg(target_os = "macos")]
    {
        Key::Meta
    }
    #[cfg(not(target_os = "macos"))]
    {
        Key::Control
    }
}

/// The text the user currently has selected. On Linux this is the primary
/// selection, falling back to the clipboard; elsewhere only the clipboard is
/// observable.
pub fn selected_text() -> Option<String> {
    let mut clipboard = match Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            debug!("clipboard unavailable: {}", e);
            return None;
        }
    };

    #[cfg(target_os = "linux")]
    {
        use arboard::{GetExtLinux, LinuxClipboardKind};
        if let Ok(text) = clipboard.get().clipboard(LinuxClipboardKind::Primary).text() {
            if !text.trim().is_empty() {
                return Some(text);
            }
        }
    }

    clipboard.get_text().ok().filter(|text| !text.trim().is_empty())
}

/// Tracks the last seen selection so that only changes are reported.
#[derive(Debug, Default)]
pub struct SelectionWatcher {
    last: Option<String>,
}

impl SelectionWatcher {
    /// Returns the selection when it differs from the previous observation
    /// and is not blank.
    pub fn observe(&mut self, current: Option<String>) -> Option<String> {
        let current = current.filter(|text| !text.trim().is_empty());
        if current == self.last {
            return None;
        }
        self.last = current.clone();
        current
    }

    /// Treat `text` as already seen, e.g. after it was handled manually.
    pub fn mark_seen(&mut self, text: Option<String>) {
        self.last = text;
    }
}
