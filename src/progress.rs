//! Short in-memory activity log shown at the bottom of the main panel.

use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::Mutex;

const MAX_LOG_LINES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Info,
    Request,
    Insert,
    Error,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub text: String,
    pub kind: Kind,
}

static ACTIVITY_LOG: Lazy<Mutex<VecDeque<Entry>>> =
    Lazy::new(|| Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)));

pub fn log_with<T: Into<String>>(kind: Kind, line: T) {
    if let Ok(mut buf) = ACTIVITY_LOG.lock() {
        let s = line.into();
        if buf.len() >= MAX_LOG_LINES { buf.pop_front(); }
        buf.push_back(Entry { text: s, kind });
    }
}

pub fn recent(n: usize) -> Vec<Entry> {
    if let Ok(buf) = ACTIVITY_LOG.lock() {
        let len = buf.len();
        let take = n.min(len);
        buf.iter().skip(len - take).cloned().collect()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The log is process-wide, so everything is checked in one test.
    #[test]
    fn test_log_is_bounded_and_ordered() {
        for i in 0..(MAX_LOG_LINES + 10) {
            log_with(Kind::Info, format!("line {}", i));
        }
        log_with(Kind::Error, "last");

        let recent_two = recent(2);
        assert_eq!(recent_two.len(), 2);
        assert_eq!(recent_two[1].text, "last");
        assert_eq!(recent_two[1].kind, Kind::Error);

        assert_eq!(recent(1000).len(), MAX_LOG_LINES);
    }
}
