use notify_rust::Notification;
use std::thread;
use tracing::debug;

const APP_NAME: &str = "Quillbar";

/// Raise a desktop notification without blocking the caller.
pub fn error(summary: &str, body: &str) {
    let summary = summary.to_string();
    let body = body.to_string();

    thread::spawn(move || {
        if let Err(e) = Notification::new()
            .appname(APP_NAME)
            .summary(&summary)
            .body(&body)
            .show()
        {
            debug!("notification failed: {}", e);
        }
    });
}
