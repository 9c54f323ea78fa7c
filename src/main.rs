mod buffer;
mod clipboard;
mod config;
mod generation;
mod listener;
mod logging;
mod notify;
mod ollama;
mod progress;
mod prompts;
mod theme;
mod ui;

use iced::{
    widget::{text_editor, Space},
    Element, Length, Point, Size, Subscription, Task, Theme,
    time,
    keyboard::{self, Key},
    event::{self, Event as IcedEvent},
    window::{self, Level},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use buffer::TextBuffer;
use clipboard::{Inserter, SelectionWatcher};
use config::{Config, PasteConfig};
use generation::{Outcome, RequestKind, Tracker};
use listener::{CaptureControl, KeyCapture, ListenerEvent, PointerPosition, ScreenPoint};
use ollama::OllamaClient;
use progress::Kind;

const PANEL_OFFSET: f32 = 10.0;
const SUGGESTION_WIDTH: f32 = 380.0;
const REPHRASE_SIZE: Size = Size::new(360.0, 280.0);
const AUTO_WRITE_SIZE: Size = Size::new(500.0, 320.0);

fn main() -> iced::Result {
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    logging::init(&config.logging);
    if let Some(e) = load_error {
        warn!("{:#}. Using defaults.", e);
    }

    iced::daemon(App::title, App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .run_with(move || App::new(config))
}

#[derive(Debug, Clone)]
pub enum Message {
    WindowOpened(window::Id),
    WindowClosed(window::Id),
    WindowMoved(window::Id, Point),
    WindowResized(window::Id, Size),
    DragWindow(window::Id),
    CloseWindow(window::Id),
    Escape(window::Id),
    Listener(ListenerEvent),
    BackendChecked(Result<Vec<String>, String>),
    Tick,
    PollSelection,
    ToggleAutoSuggest(bool),
    Complete,
    OpenRephrase,
    OpenAutoWrite,
    UseSuggestion(usize),
    RephraseEdited(text_editor::Action),
    SubmitRephrase,
    AutoWriteEdited(text_editor::Action),
    SubmitAutoWrite,
    Generated(RequestKind, u64, Outcome),
    Inserted(Result<(), String>),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Main,
    Suggestions,
    Rephrase,
    AutoWrite,
}

#[derive(Default)]
struct Suggestions {
    window: Option<window::Id>,
    items: Vec<String>,
    anchor: Option<ScreenPoint>,
    requested: bool,
}

struct Rephrase {
    window: Option<window::Id>,
    source: String,
    instructions: text_editor::Content,
    error: Option<String>,
}

struct AutoWrite {
    window: Option<window::Id>,
    request: text_editor::Content,
    error: Option<String>,
}

struct App {
    config: Config,
    client: Option<Arc<OllamaClient>>,
    buffer: Arc<TextBuffer>,
    pointer: Arc<PointerPosition>,
    control: Arc<CaptureControl>,
    tracker: Tracker,
    windows: HashMap<window::Id, Panel>,
    main_window: window::Id,
    main_position: Option<Point>,
    main_size: Size,
    suggestions: Suggestions,
    rephrase: Rephrase,
    auto_write: AutoWrite,
    selection: SelectionWatcher,
    status: String,
    auto_suggest: bool,
    pending_inserts: usize,
    loading_frame: usize,
}

impl App {
    fn new(config: Config) -> (Self, Task<Message>) {
        let main_size = Size::new(config.window.width as f32, config.window.height as f32);
        let (main_window, open_main) = window::open(window::Settings {
            size: main_size,
            min_size: Some(Size::new(
                config.window.min_width as f32,
                config.window.min_height as f32,
            )),
            position: window::Position::Centered,
            decorations: false,
            level: Level::AlwaysOnTop,
            ..window::Settings::default()
        });

        let (client, status) = match OllamaClient::with_config(&config.ollama) {
            Ok(client) => {
                let status = format!("Connecting to {}...", client.get_model());
                (Some(Arc::new(client)), status)
            }
            Err(e) => {
                warn!("could not build model client: {:#}", e);
                (None, format!("Model client unavailable: {}", e))
            }
        };

        let mut selection = SelectionWatcher::default();
        if config.rephrase.watch_selection {
            selection.mark_seen(clipboard::selected_text());
        }

        let check_backend = match client.clone() {
            Some(client) => Task::perform(
                async move { client.list_models().await.map_err(|e| format!("{:#}", e)) },
                Message::BackendChecked,
            ),
            None => Task::none(),
        };

        info!(model = %config.ollama.model, host = %config.ollama.host, "starting");

        let buffer = Arc::new(TextBuffer::new(config.buffer.max_chars));
        progress::log_with(Kind::Info, format!("Keeping the last {} typed characters", buffer.max_chars()));

        let app = App {
            buffer,
            pointer: Arc::new(PointerPosition::default()),
            control: Arc::new(CaptureControl::default()),
            tracker: Tracker::default(),
            windows: HashMap::from([(main_window, Panel::Main)]),
            main_window,
            main_position: None,
            main_size,
            suggestions: Suggestions::default(),
            rephrase: Rephrase {
                window: None,
                source: String::new(),
                instructions: text_editor::Content::new(),
                error: None,
            },
            auto_write: AutoWrite {
                window: None,
                request: text_editor::Content::new(),
                error: None,
            },
            selection,
            status,
            auto_suggest: config.suggestions.auto,
            pending_inserts: 0,
            loading_frame: 0,
            client,
            config,
        };

        (app, Task::batch([open_main.map(Message::WindowOpened), check_backend]))
    }

    fn title(&self, window: window::Id) -> String {
        match self.windows.get(&window) {
            Some(Panel::Suggestions) => "Suggestions".to_string(),
            Some(Panel::Rephrase) => "Rephrase Text".to_string(),
            Some(Panel::AutoWrite) => "Auto Write".to_string(),
            _ => "Writing Assistant".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::WindowOpened(id) => {
                debug!(?id, "window opened");
                Task::none()
            }
            Message::WindowClosed(id) => self.window_closed(id),
            Message::WindowMoved(id, position) => {
                if id == self.main_window {
                    self.main_position = Some(position);
                }
                Task::none()
            }
            Message::WindowResized(id, size) => {
                if id == self.main_window {
                    self.main_size = size;
                }
                Task::none()
            }
            Message::DragWindow(id) => window::drag(id),
            Message::CloseWindow(id) => self.close_window(id),
            Message::Escape(id) => {
                if id == self.main_window {
                    Task::none()
                } else {
                    self.close_window(id)
                }
            }
            Message::Listener(ListenerEvent::Flushed { text, pointer }) => {
                if !self.auto_suggest || self.is_inserting() {
                    return Task::none();
                }
                if text.trim().chars().count() < self.config.suggestions.min_chars {
                    return Task::none();
                }
                self.request_suggestions(text, pointer, false)
            }
            Message::Listener(ListenerEvent::Dismiss) => {
                let panels: Vec<window::Id> = [
                    self.suggestions.window,
                    self.rephrase.window,
                    self.auto_write.window,
                ]
                .into_iter()
                .flatten()
                .collect();
                self.tracker.cancel(RequestKind::Suggest);
                Task::batch(panels.into_iter().map(window::close))
            }
            Message::BackendChecked(result) => {
                match result {
                    Ok(models) => {
                        let model = self
                            .client
                            .as_ref()
                            .map(|c| c.get_model().to_string())
                            .unwrap_or_default();
                        if ollama::has_model(&models, &model) {
                            self.set_status(Kind::Info, format!("Ready ({})", model));
                        } else {
                            warn!(model = %model, "model is not installed on the server");
                            self.set_status(
                                Kind::Error,
                                format!("Model {} not found; run `ollama pull {}`", model, model),
                            );
                        }
                    }
                    Err(e) => {
                        warn!("model server unreachable: {}", e);
                        self.set_status(Kind::Error, format!("Ollama unreachable: {}", e));
                    }
                }
                Task::none()
            }
            Message::Tick => {
                if self.tracker.any_busy() {
                    self.loading_frame = (self.loading_frame + 1) % 80;
                }
                Task::none()
            }
            Message::PollSelection => {
                if self.is_inserting() || self.rephrase.window.is_some() {
                    return Task::none();
                }
                match self.selection.observe(clipboard::selected_text()) {
                    Some(text) => self.open_rephrase(text),
                    None => Task::none(),
                }
            }
            Message::ToggleAutoSuggest(enabled) => {
                self.auto_suggest = enabled;
                if !enabled {
                    self.tracker.cancel(RequestKind::Suggest);
                }
                Task::none()
            }
            Message::Complete => {
                let text = self.buffer.snapshot();
                if text.trim().is_empty() {
                    self.set_status(Kind::Info, "Nothing typed yet");
                    return Task::none();
                }
                let pointer = self.pointer.get();
                self.request_suggestions(text, pointer, true)
            }
            Message::OpenRephrase => match clipboard::selected_text() {
                Some(text) => {
                    self.selection.mark_seen(Some(text.clone()));
                    self.open_rephrase(text)
                }
                None => {
                    self.set_status(Kind::Info, "Select some text to rephrase");
                    Task::none()
                }
            },
            Message::OpenAutoWrite => self.open_auto_write(),
            Message::UseSuggestion(index) => {
                let Some(text) = self.suggestions.items.get(index).cloned() else {
                    return Task::none();
                };
                let close = self.suggestions.window.map(window::close).unwrap_or_else(Task::none);
                Task::batch([close, self.insert(text)])
            }
            Message::RephraseEdited(action) => {
                self.rephrase.instructions.perform(action);
                Task::none()
            }
            Message::SubmitRephrase => {
                if self.tracker.is_busy(RequestKind::Rephrase) || self.rephrase.source.is_empty() {
                    return Task::none();
                }
                self.rephrase.error = None;
                let instructions = self.rephrase.instructions.text();
                let prompt = prompts::rephrase(&self.rephrase.source, &instructions);
                self.start_generation(RequestKind::Rephrase, prompt, 1)
            }
            Message::AutoWriteEdited(action) => {
                self.auto_write.request.perform(action);
                Task::none()
            }
            Message::SubmitAutoWrite => {
                let prompt = prompts::auto_write(&self.auto_write.request.text());
                if prompt.is_empty() || self.tracker.is_busy(RequestKind::AutoWrite) {
                    return Task::none();
                }
                self.auto_write.error = None;
                self.start_generation(RequestKind::AutoWrite, prompt, 1)
            }
            Message::Generated(kind, id, outcome) => {
                if !self.tracker.finish(kind, id) {
                    debug!(kind = kind.label(), id, "dropping stale result");
                    return Task::none();
                }
                self.generated(kind, outcome)
            }
            Message::Inserted(result) => {
                self.pending_inserts = self.pending_inserts.saturating_sub(1);
                self.sync_capture();
                match result {
                    Ok(()) => {
                        self.buffer.clear();
                        self.set_status(Kind::Insert, "Inserted");
                    }
                    Err(e) => {
                        warn!("insertion failed: {}", e);
                        self.set_status(Kind::Error, format!("Could not insert text: {}", e));
                    }
                }
                if self.config.rephrase.watch_selection {
                    self.selection.mark_seen(clipboard::selected_text());
                }
                Task::none()
            }
            Message::Exit => {
                info!("shutting down");
                self.control.stop();
                self.tracker.cancel_all();
                iced::exit()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let capture =
            KeyCapture::new(self.buffer.clone(), self.pointer.clone(), self.control.clone());
        let keys = Subscription::run_with_id("keyboard-listener", listener::watch(capture))
            .map(Message::Listener);

        let timer = if self.tracker.any_busy() {
            time::every(Duration::from_millis(80)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let selection = if self.config.rephrase.watch_selection
            && self.rephrase.window.is_none()
            && !self.is_inserting()
        {
            time::every(Duration::from_millis(self.config.rephrase.poll_ms))
                .map(|_| Message::PollSelection)
        } else {
            Subscription::none()
        };

        let events = event::listen_with(|event, _status, id| match event {
            IcedEvent::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(keyboard::key::Named::Escape),
                ..
            }) => Some(Message::Escape(id)),
            IcedEvent::Window(window::Event::Moved(position)) => {
                Some(Message::WindowMoved(id, position))
            }
            IcedEvent::Window(window::Event::Resized(size)) => {
                Some(Message::WindowResized(id, size))
            }
            _ => None,
        });

        Subscription::batch([
            keys,
            timer,
            selection,
            events,
            window::close_events().map(Message::WindowClosed),
        ])
    }

    fn view(&self, window: window::Id) -> Element<Message> {
        let frame = self.loading_frame;
        match self.windows.get(&window) {
            Some(Panel::Main) => ui::main_panel(ui::MainView {
                window,
                status: &self.status,
                auto_suggest: self.auto_suggest,
                activity: progress::recent(3),
            }),
            Some(Panel::Suggestions) => ui::suggestions_panel(window, &self.suggestions.items),
            Some(Panel::Rephrase) => ui::rephrase_panel(
                ui::EditorView {
                    window,
                    content: &self.rephrase.instructions,
                    loading: self.tracker.is_busy(RequestKind::Rephrase),
                    frame,
                    error: self.rephrase.error.as_deref(),
                },
                &self.rephrase.source,
            ),
            Some(Panel::AutoWrite) => ui::auto_write_panel(ui::EditorView {
                window,
                content: &self.auto_write.request,
                loading: self.tracker.is_busy(RequestKind::AutoWrite),
                frame,
                error: self.auto_write.error.as_deref(),
            }),
            None => Space::new(Length::Shrink, Length::Shrink).into(),
        }
    }

    fn theme(&self, _window: window::Id) -> Theme {
        Theme::TokyoNight
    }

    fn set_status(&mut self, kind: Kind, status: impl Into<String>) {
        let status = status.into();
        progress::log_with(kind, status.clone());
        self.status = status;
    }

    fn is_inserting(&self) -> bool {
        self.pending_inserts > 0
    }

    /// Keystrokes are not recorded while any paste is in flight or while a
    /// panel that takes text input is open.
    fn sync_capture(&self) {
        let paused = self.is_inserting()
            || self.rephrase.window.is_some()
            || self.auto_write.window.is_some();
        self.control.set_paused(paused);
    }

    /// `requested` is true when the user asked for a completion rather than
    /// it being triggered by typing.
    fn request_suggestions(
        &mut self,
        text: String,
        pointer: Option<ScreenPoint>,
        requested: bool,
    ) -> Task<Message> {
        self.suggestions.anchor = pointer;
        self.suggestions.requested = requested;
        let count = self.config.suggestions.count;
        self.start_generation(RequestKind::Suggest, prompts::completion(&text), count)
    }

    fn start_generation(
        &mut self,
        kind: RequestKind,
        prompt: String,
        count: usize,
    ) -> Task<Message> {
        let Some(client) = self.client.clone() else {
            self.set_status(Kind::Error, "No model client available");
            return Task::none();
        };

        let ticket = self.tracker.begin(kind);
        let id = ticket.id;
        debug!(kind = kind.label(), id, "starting generation");
        self.status = format!("Generating {}...", kind.label());

        Task::perform(
            generation::run(client, prompt, count, ticket.token),
            move |outcome| Message::Generated(kind, id, outcome),
        )
    }

    fn generated(&mut self, kind: RequestKind, outcome: Outcome) -> Task<Message> {
        let replies = match outcome {
            Outcome::Completed(replies) => replies,
            Outcome::Cancelled => return Task::none(),
            Outcome::Failed(error) => {
                self.report_failure(kind, &error);
                return Task::none();
            }
        };

        if replies.is_empty() {
            let message = "The model returned an empty response";
            match kind {
                RequestKind::Suggest => {}
                RequestKind::Rephrase => self.rephrase.error = Some(message.to_string()),
                RequestKind::AutoWrite => self.auto_write.error = Some(message.to_string()),
            }
            self.set_status(Kind::Info, message);
            return Task::none();
        }

        self.set_status(Kind::Request, format!("Received {}", kind.label()));

        match kind {
            RequestKind::Suggest => self.show_suggestions(replies),
            RequestKind::Rephrase => self.finish_panel(self.rephrase.window, replies),
            RequestKind::AutoWrite => self.finish_panel(self.auto_write.window, replies),
        }
    }

    /// Close the panel that asked for `replies` and insert the first one.
    fn finish_panel(&mut self, window: Option<window::Id>, replies: Vec<String>) -> Task<Message> {
        let Some(text) = replies.into_iter().next() else {
            return Task::none();
        };
        let close = window.map(window::close).unwrap_or_else(Task::none);
        Task::batch([close, self.insert(text)])
    }

    fn report_failure(&mut self, kind: RequestKind, error: &str) {
        warn!(kind = kind.label(), "generation failed: {}", error);
        let message = format!("Generation failed: {}", prompts::preview(error, 80));
        match kind {
            RequestKind::Suggest => {}
            RequestKind::Rephrase => self.rephrase.error = Some(message.clone()),
            RequestKind::AutoWrite => self.auto_write.error = Some(message.clone()),
        }
        self.set_status(Kind::Error, message);
        if self.notifies_failure(kind) {
            notify::error("Generation failed", error);
        }
    }

    /// Suggestions fired by typing fail silently apart from the status line,
    /// otherwise an unreachable server raises a notification per word.
    fn notifies_failure(&self, kind: RequestKind) -> bool {
        if !self.config.notifications.enabled {
            return false;
        }
        match kind {
            RequestKind::Suggest => self.suggestions.requested,
            RequestKind::Rephrase | RequestKind::AutoWrite => true,
        }
    }

    fn show_suggestions(&mut self, items: Vec<String>) -> Task<Message> {
        let size = Size::new(SUGGESTION_WIDTH, 60.0 + 56.0 * items.len() as f32);
        let position = panel_position(self.suggestions.anchor);
        self.suggestions.items = items;

        if let Some(id) = self.suggestions.window {
            let resize = window::resize(id, size);
            return match position {
                window::Position::Specific(point) => {
                    Task::batch([resize, window::move_to(id, point)])
                }
                _ => resize,
            };
        }

        let (id, open) = window::open(suggestion_settings(size, position));
        self.windows.insert(id, Panel::Suggestions);
        self.suggestions.window = Some(id);
        open.map(Message::WindowOpened)
    }

    fn open_rephrase(&mut self, source: String) -> Task<Message> {
        self.rephrase.source = source;
        self.rephrase.error = None;

        if self.rephrase.window.is_some() {
            return Task::none();
        }

        let position = panel_position(self.pointer.get());
        let (id, open) = window::open(popup_settings(REPHRASE_SIZE, position));
        self.windows.insert(id, Panel::Rephrase);
        self.rephrase.window = Some(id);
        self.sync_capture();
        open.map(Message::WindowOpened)
    }

    fn open_auto_write(&mut self) -> Task<Message> {
        if let Some(id) = self.auto_write.window {
            return window::gain_focus(id);
        }

        let position = match self.main_position {
            Some(origin) => {
                window::Position::Specific(centered_in(origin, self.main_size, AUTO_WRITE_SIZE))
            }
            None => window::Position::Centered,
        };
        let (id, open) = window::open(popup_settings(AUTO_WRITE_SIZE, position));
        self.windows.insert(id, Panel::AutoWrite);
        self.auto_write.window = Some(id);
        self.auto_write.error = None;
        self.sync_capture();
        open.map(Message::WindowOpened)
    }

    fn close_window(&mut self, id: window::Id) -> Task<Message> {
        if id == self.main_window {
            return Task::done(Message::Exit);
        }
        window::close(id)
    }

    fn window_closed(&mut self, id: window::Id) -> Task<Message> {
        match self.windows.remove(&id) {
            Some(Panel::Main) => return Task::done(Message::Exit),
            Some(Panel::Suggestions) => {
                self.suggestions.window = None;
                self.tracker.cancel(RequestKind::Suggest);
            }
            Some(Panel::Rephrase) => {
                self.rephrase.window = None;
                self.rephrase.source.clear();
                self.rephrase.instructions = text_editor::Content::new();
                self.rephrase.error = None;
                self.tracker.cancel(RequestKind::Rephrase);
            }
            Some(Panel::AutoWrite) => {
                self.auto_write.window = None;
                self.auto_write.request = text_editor::Content::new();
                self.auto_write.error = None;
                self.tracker.cancel(RequestKind::AutoWrite);
            }
            None => {}
        }
        self.sync_capture();
        Task::none()
    }

    fn insert(&mut self, text: String) -> Task<Message> {
        self.pending_inserts += 1;
        self.sync_capture();
        progress::log_with(Kind::Insert, format!("Inserting {} chars", text.chars().count()));

        let settings = self.config.paste.clone();
        Task::perform(
            async move {
                match tokio::task::spawn_blocking(move || insert_blocking(settings, &text)).await {
                    Ok(result) => result,
                    Err(e) => Err(e.to_string()),
                }
            },
            Message::Inserted,
        )
    }
}

fn insert_blocking(settings: PasteConfig, text: &str) -> Result<(), String> {
    let mut inserter = Inserter::new(settings).map_err(|e| e.to_string())?;
    inserter.insert(text).map_err(|e| e.to_string())
}

fn popup_settings(size: Size, position: window::Position) -> window::Settings {
    window::Settings {
        size,
        position,
        resizable: false,
        decorations: false,
        level: Level::AlwaysOnTop,
        exit_on_close_request: true,
        ..window::Settings::default()
    }
}

/// The suggestion popup appears while the user is typing elsewhere, so it
/// must not take keyboard focus. On X11 it bypasses the window manager, which
/// never focuses override-redirect windows. Other platforms fall back to
/// `paste.focus_delay_ms` after the popup closes.
fn suggestion_settings(size: Size, position: window::Position) -> window::Settings {
    let mut settings = popup_settings(size, position);
    #[cfg(target_os = "linux")]
    {
        settings.platform_specific.override_redirect = true;
    }
    #[cfg(target_os = "windows")]
    {
        settings.platform_specific.skip_taskbar = true;
    }
    settings
}

/// Place a panel just below and to the right of the pointer.
fn panel_position(pointer: Option<ScreenPoint>) -> window::Position {
    match pointer {
        Some(p) => window::Position::Specific(Point::new(p.x + PANEL_OFFSET, p.y + PANEL_OFFSET)),
        None => window::Position::Centered,
    }
}

/// Top-left corner that centres `inner` over a window at `origin` of `outer` size.
fn centered_in(origin: Point, outer: Size, inner: Size) -> Point {
    Point::new(
        origin.x + ((outer.width - inner.width) / 2.0).round(),
        origin.y + ((outer.height - inner.height) / 2.0).round(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_position_offsets_pointer() {
        match panel_position(Some(ScreenPoint { x: 100.0, y: 40.0 })) {
            window::Position::Specific(point) => assert_eq!(point, Point::new(110.0, 50.0)),
            _ => panic!("expected a specific position"),
        }
        assert!(matches!(panel_position(None), window::Position::Centered));
    }

    fn app() -> App {
        let (app, _) = App::new(Config::default());
        app
    }

    #[test]
    fn test_capture_stays_paused_until_every_insert_finishes() {
        let mut app = app();
        let _ = app.insert("first".to_string());
        let _ = app.insert("second".to_string());
        assert!(app.control.is_paused());

        let _ = app.update(Message::Inserted(Ok(())));
        assert!(app.control.is_paused());
        assert!(app.is_inserting());

        let _ = app.update(Message::Inserted(Err("no display".to_string())));
        assert!(!app.control.is_paused());
        assert!(!app.is_inserting());
    }

    #[test]
    fn test_stray_insert_result_does_not_underflow() {
        let mut app = app();
        let _ = app.update(Message::Inserted(Ok(())));
        assert_eq!(app.pending_inserts, 0);
        assert!(!app.control.is_paused());
    }

    #[test]
    fn test_typed_suggestion_failures_do_not_notify() {
        let mut app = app();
        let _ = app.request_suggestions("hello ".to_string(), None, false);
        assert!(!app.notifies_failure(RequestKind::Suggest));
        assert!(app.notifies_failure(RequestKind::Rephrase));
        assert!(app.notifies_failure(RequestKind::AutoWrite));

        let _ = app.request_suggestions("hello ".to_string(), None, true);
        assert!(app.notifies_failure(RequestKind::Suggest));

        app.config.notifications.enabled = false;
        assert!(!app.notifies_failure(RequestKind::Suggest));
        assert!(!app.notifies_failure(RequestKind::AutoWrite));
    }

    #[test]
    fn test_suggestion_popup_does_not_take_focus() {
        let settings = suggestion_settings(Size::new(380.0, 116.0), window::Position::Centered);
        assert!(!settings.decorations);
        assert_eq!(settings.level, Level::AlwaysOnTop);
        #[cfg(target_os = "linux")]
        assert!(settings.platform_specific.override_redirect);
        #[cfg(target_os = "windows")]
        assert!(settings.platform_specific.skip_taskbar);
    }

    #[test]
    fn test_centered_in() {
        let origin = Point::new(200.0, 100.0);
        let point = centered_in(origin, Size::new(400.0, 340.0), Size::new(500.0, 320.0));
        assert_eq!(point, Point::new(150.0, 110.0));
    }
}
