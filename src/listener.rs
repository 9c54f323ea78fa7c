//! Global keyboard capture.
//!
//! An rdev hook runs on its own thread and feeds the shared [`TextBuffer`].
//! Pressing space flushes: the buffer snapshot is handed to the UI, which
//! decides whether to ask the model for a continuation.

use futures_util::stream::{self, Stream};
use rdev::{listen, Event, EventType, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::buffer::TextBuffer;

/// A position on screen as reported by the input hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    /// Space was pressed and the buffer holds some text.
    Flushed {
        text: String,
        pointer: Option<ScreenPoint>,
    },
    /// Escape was pressed anywhere.
    Dismiss,
}

/// Last known pointer position, updated from mouse move events.
#[derive(Debug, Default)]
pub struct PointerPosition(Mutex<Option<ScreenPoint>>);

impl PointerPosition {
    pub fn set(&self, point: ScreenPoint) {
        if let Ok(mut current) = self.0.lock() {
            *current = Some(point);
        }
    }

    pub fn get(&self) -> Option<ScreenPoint> {
        self.0.lock().ok().and_then(|current| *current)
    }
}

/// Flags the UI uses to steer the listener thread.
#[derive(Debug)]
pub struct CaptureControl {
    running: AtomicBool,
    paused: AtomicBool,
}

impl Default for CaptureControl {
    fn default() -> Self {
        CaptureControl {
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        }
    }
}

impl CaptureControl {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Turns raw hook events into buffer updates and [`ListenerEvent`]s.
pub struct KeyCapture {
    buffer: Arc<TextBuffer>,
    pointer: Arc<PointerPosition>,
    control: Arc<CaptureControl>,
    ctrl_held: bool,
    meta_held: bool,
    alt_gr_held: bool,
}

impl KeyCapture {
    pub fn new(
        buffer: Arc<TextBuffer>,
        pointer: Arc<PointerPosition>,
        control: Arc<CaptureControl>,
    ) -> Self {
        KeyCapture {
            buffer,
            pointer,
            control,
            ctrl_held: false,
            meta_held: false,
            alt_gr_held: false,
        }
    }

    pub fn handle(&mut self, event: &Event) -> Option<ListenerEvent> {
        if !self.control.is_running() {
            return None;
        }

        match event.event_type {
            EventType::MouseMove { x, y } => {
                self.pointer.set(ScreenPoint {
                    x: x as f32,
                    y: y as f32,
                });
                None
            }
            EventType::KeyRelease(key) => {
                self.track_modifier(key, false);
                None
            }
            EventType::KeyPress(key) => {
                if self.track_modifier(key, true) {
                    return None;
                }
                if key == Key::Escape {
                    return Some(ListenerEvent::Dismiss);
                }
                if self.control.is_paused() || self.shortcut_held() {
                    return None;
                }
                self.record(key, event.name.as_deref())
            }
            _ => None,
        }
    }

    fn record(&mut self, key: Key, name: Option<&str>) -> Option<ListenerEvent> {
        match key {
            Key::Space => {
                self.buffer.append(" ");
                self.flush()
            }
            Key::Return | Key::KpReturn => {
                self.buffer.append("\n");
                None
            }
            Key::Backspace => {
                self.buffer.pop();
                None
            }
            _ => {
                if let Some(text) = name.filter(|text| is_printable(text)) {
                    self.buffer.append(text);
                }
                None
            }
        }
    }

    fn flush(&self) -> Option<ListenerEvent> {
        let text = self.buffer.snapshot();
        if text.trim().is_empty() {
            return None;
        }
        Some(ListenerEvent::Flushed {
            text,
            pointer: self.pointer.get(),
        })
    }

    /// Windows reports AltGr as Ctrl plus AltGr, so Ctrl only marks a
    /// shortcut while AltGr is up.
    fn shortcut_held(&self) -> bool {
        self.meta_held || (self.ctrl_held && !self.alt_gr_held)
    }

    /// Returns true if `key` is a modifier.
    fn track_modifier(&mut self, key: Key, pressed: bool) -> bool {
        match key {
            Key::ControlLeft | Key::ControlRight => self.ctrl_held = pressed,
            Key::MetaLeft | Key::MetaRight => self.meta_held = pressed,
            Key::AltGr => self.alt_gr_held = pressed,
            Key::ShiftLeft | Key::ShiftRight | Key::Alt | Key::CapsLock => {}
            _ => return false,
        }
        true
    }
}

fn is_printable(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(char::is_control)
}

/// Start the hook thread. Events are forwarded on `tx` until the receiver is
/// dropped or capture is stopped.
pub fn spawn(capture: KeyCapture, tx: mpsc::UnboundedSender<ListenerEvent>) {
    thread::spawn(move || {
        let mut capture = capture;
        info!("keyboard listener started");

        let callback = move |event: Event| {
            if let Some(out) = capture.handle(&event) {
                debug!(?out, "listener event");
                let _ = tx.send(out);
            }
        };

        // Blocks for the lifetime of the process unless the hook fails.
        if let Err(e) = listen(callback) {
            error!("keyboard listener failed: {:?}", e);
        }
    });
}

enum WatchState {
    Idle(KeyCapture),
    Running(mpsc::UnboundedReceiver<ListenerEvent>),
}

/// Stream of listener events for an iced subscription. The hook thread is
/// only started once the stream is first polled.
pub fn watch(capture: KeyCapture) -> impl Stream<Item = ListenerEvent> {
    stream::unfold(WatchState::Idle(capture), |state| async move {
        let mut rx = match state {
            WatchState::Idle(capture) => {
                let (tx, rx) = mpsc::unbounded_channel();
                spawn(capture, tx);
                rx
            }
            WatchState::Running(rx) => rx,
        };

        let event = rx.recv().await?;
        Some((event, WatchState::Running(rx)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn press(key: Key, name: Option<&str>) -> Event {
        Event {
            time: SystemTime::now(),
            name: name.map(str::to_string),
            event_type: EventType::KeyPress(key),
        }
    }

    fn release(key: Key) -> Event {
        Event {
            time: SystemTime::now(),
            name: None,
            event_type: EventType::KeyRelease(key),
        }
    }

    fn capture() -> (KeyCapture, Arc<TextBuffer>, Arc<CaptureControl>) {
        let buffer = Arc::new(TextBuffer::new(100));
        let control = Arc::new(CaptureControl::default());
        let capture = KeyCapture::new(
            buffer.clone(),
            Arc::new(PointerPosition::default()),
            control.clone(),
        );
        (capture, buffer, control)
    }

    fn type_word(capture: &mut KeyCapture, word: &str) {
        for ch in word.chars() {
            let name = ch.to_string();
            assert_eq!(capture.handle(&press(Key::Unknown(0), Some(&name))), None);
        }
    }

    #[test]
    fn test_printable_keys_are_buffered() {
        let (mut capture, buffer, _) = capture();
        type_word(&mut capture, "Hi!");
        assert_eq!(buffer.snapshot(), "Hi!");
    }

    #[test]
    fn test_space_flushes_snapshot() {
        let (mut capture, buffer, _) = capture();
        type_word(&mut capture, "hello");
        let event = capture.handle(&press(Key::Space, Some(" ")));
        assert_eq!(
            event,
            Some(ListenerEvent::Flushed {
                text: "hello ".to_string(),
                pointer: None,
            })
        );
        // Flushing does not consume the buffer.
        assert_eq!(buffer.snapshot(), "hello ");
    }

    #[test]
    fn test_space_on_blank_buffer_does_not_flush() {
        let (mut capture, buffer, _) = capture();
        assert_eq!(capture.handle(&press(Key::Space, Some(" "))), None);
        assert_eq!(buffer.snapshot(), " ");
    }

    #[test]
    fn test_flush_carries_pointer() {
        let (mut capture, _, _) = capture();
        capture.handle(&Event {
            time: SystemTime::now(),
            name: None,
            event_type: EventType::MouseMove { x: 120.0, y: 48.5 },
        });
        type_word(&mut capture, "a");
        match capture.handle(&press(Key::Space, None)) {
            Some(ListenerEvent::Flushed { pointer, .. }) => {
                assert_eq!(pointer, Some(ScreenPoint { x: 120.0, y: 48.5 }));
            }
            other => panic!("expected flush, got {:?}", other),
        }
    }

    #[test]
    fn test_shortcuts_are_ignored() {
        let (mut capture, buffer, _) = capture();
        capture.handle(&press(Key::ControlLeft, None));
        capture.handle(&press(Key::KeyV, Some("\u{16}")));
        capture.handle(&press(Key::KeyC, Some("c")));
        capture.handle(&release(Key::ControlLeft));
        type_word(&mut capture, "x");
        assert_eq!(buffer.snapshot(), "x");
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let (mut capture, buffer, _) = capture();
        capture.handle(&press(Key::Tab, Some("\t")));
        capture.handle(&press(Key::Unknown(1), Some("\u{1b}")));
        capture.handle(&press(Key::UpArrow, None));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_backspace_and_return() {
        let (mut capture, buffer, _) = capture();
        type_word(&mut capture, "abc");
        capture.handle(&press(Key::Backspace, Some("\u{8}")));
        capture.handle(&press(Key::Return, Some("\r")));
        type_word(&mut capture, "d");
        assert_eq!(buffer.snapshot(), "ab\nd");
    }

    #[test]
    fn test_paused_capture_records_nothing() {
        let (mut capture, buffer, control) = capture();
        control.set_paused(true);
        type_word(&mut capture, "secret");
        assert_eq!(capture.handle(&press(Key::Space, Some(" "))), None);
        assert!(buffer.is_empty());

        control.set_paused(false);
        type_word(&mut capture, "ok");
        assert_eq!(buffer.snapshot(), "ok");
    }

    #[test]
    fn test_alt_gr_characters_are_recorded() {
        let (mut capture, buffer, _) = capture();
        capture.handle(&press(Key::ControlLeft, None));
        capture.handle(&press(Key::AltGr, None));
        capture.handle(&press(Key::KeyQ, Some("@")));
        capture.handle(&release(Key::AltGr));
        capture.handle(&release(Key::ControlLeft));
        assert_eq!(buffer.snapshot(), "@");

        capture.handle(&press(Key::ControlLeft, None));
        capture.handle(&press(Key::KeyV, Some("v")));
        capture.handle(&release(Key::ControlLeft));
        capture.handle(&press(Key::KeyX, Some("x")));
        assert_eq!(buffer.snapshot(), "@x");
    }

    #[test]
    fn test_escape_dismisses_even_when_paused() {
        let (mut capture, _, control) = capture();
        control.set_paused(true);
        assert_eq!(
            capture.handle(&press(Key::Escape, None)),
            Some(ListenerEvent::Dismiss)
        );
    }

    #[test]
    fn test_stopped_capture_ignores_everything() {
        let (mut capture, buffer, control) = capture();
        control.stop();
        type_word(&mut capture, "late");
        assert_eq!(capture.handle(&press(Key::Escape, None)), None);
        assert!(buffer.is_empty());
    }
}
