//! Bounded text buffer shared between the keyboard listener and the UI.
//!
//! Holds the most recently typed characters. Once the cap is exceeded the
//! oldest characters are dropped from the front, so the buffer always holds
//! the tail of everything appended since the last clear.

use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    text: String,
    chars: usize,
}

#[derive(Debug)]
pub struct TextBuffer {
    inner: Mutex<Inner>,
    max_chars: usize,
}

impl TextBuffer {
    pub fn new(max_chars: usize) -> Self {
        TextBuffer {
            inner: Mutex::new(Inner::default()),
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn append(&self, text: &str) {
        if text.is_empty() {
            return;
        }

        let mut inner = self.lock();
        inner.text.push_str(text);
        inner.chars += text.chars().count();

        if inner.chars > self.max_chars {
            let excess = inner.chars - self.max_chars;
            let cut = inner
                .text
                .char_indices()
                .nth(excess)
                .map(|(idx, _)| idx)
                .unwrap_or(inner.text.len());
            inner.text.drain(..cut);
            inner.chars = self.max_chars;
        }
    }

    /// Remove the last character, if any.
    pub fn pop(&self) -> Option<char> {
        let mut inner = self.lock();
        let ch = inner.text.pop();
        if ch.is_some() {
            inner.chars -= 1;
        }
        ch
    }

    pub fn snapshot(&self) -> String {
        self.lock().text.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.text.clear();
        inner.chars = 0;
    }

    pub fn len(&self) -> usize {
        self.lock().chars
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave `Inner` half-updated in a
    // way readers would notice, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn suffix(all: &str, max: usize) -> String {
        let count = all.chars().count();
        all.chars().skip(count.saturating_sub(max)).collect()
    }

    #[test]
    fn test_append_keeps_everything_under_cap() {
        let buffer = TextBuffer::new(16);
        buffer.append("hello");
        buffer.append(" world");
        assert_eq!(buffer.snapshot(), "hello world");
        assert_eq!(buffer.len(), 11);
    }

    #[test]
    fn test_truncates_from_front() {
        let buffer = TextBuffer::new(5);
        buffer.append("abc");
        buffer.append("defg");
        assert_eq!(buffer.snapshot(), "cdefg");
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_retained_content_is_suffix_of_all_appends() {
        let pieces = ["The ", "quick", " ", "brown fox ", "jumps", " over ", "the lazy dog", "!", ""];
        for max in [1, 3, 7, 10, 25, 100] {
            let buffer = TextBuffer::new(max);
            let mut all = String::new();
            for piece in pieces.iter().cycle().take(40) {
                buffer.append(piece);
                all.push_str(piece);
                assert_eq!(buffer.snapshot(), suffix(&all, max), "max = {}", max);
            }
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let buffer = TextBuffer::new(4);
        buffer.append("héllo wörld");
        assert_eq!(buffer.snapshot(), "örld");
        buffer.append("✏️");
        assert_eq!(buffer.snapshot(), suffix("örld✏️", 4));
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_clear_always_empties() {
        let buffer = TextBuffer::new(8);
        buffer.clear();
        assert!(buffer.is_empty());

        buffer.append("something long enough to truncate");
        buffer.clear();
        assert_eq!(buffer.snapshot(), "");
        assert_eq!(buffer.len(), 0);

        buffer.append("ab");
        assert_eq!(buffer.snapshot(), "ab");
    }

    #[test]
    fn test_pop_removes_last_char() {
        let buffer = TextBuffer::new(8);
        buffer.append("naïve");
        assert_eq!(buffer.pop(), Some('e'));
        assert_eq!(buffer.pop(), Some('v'));
        assert_eq!(buffer.pop(), Some('ï'));
        assert_eq!(buffer.snapshot(), "na");
        assert_eq!(buffer.len(), 2);

        buffer.clear();
        assert_eq!(buffer.pop(), None);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_zero_cap_is_clamped() {
        let buffer = TextBuffer::new(0);
        assert_eq!(buffer.max_chars(), 1);
        buffer.append("xyz");
        assert_eq!(buffer.snapshot(), "z");
    }

    #[test]
    fn test_concurrent_appends_never_interleave() {
        // Every token is two chars and the cap is even, so any suffix of the
        // concatenation starts on a token boundary.
        let tokens = ["ab", "cd", "ef", "gh"];
        let buffer = Arc::new(TextBuffer::new(200));

        let writers: Vec<_> = tokens
            .iter()
            .map(|token| {
                let buffer = buffer.clone();
                let token = token.to_string();
                thread::spawn(move || {
                    for _ in 0..500 {
                        buffer.append(&token);
                    }
                })
            })
            .collect();

        let reader = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = buffer.snapshot();
                    assert_eq!(snapshot.chars().count() % 2, 0);
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.chars().count(), 200);
        let chars: Vec<char> = snapshot.chars().collect();
        for pair in chars.chunks(2) {
            let token: String = pair.iter().collect();
            assert!(tokens.contains(&token.as_str()), "torn write: {:?}", token);
        }
    }
}
