//! Prompt templates and cleanup of model output.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::UnicodeWidthChar;

const DEFAULT_REPHRASE_INSTRUCTIONS: &str = "Improve clarity";

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?(</think>|$)").expect("valid regex"));

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?```$").expect("valid regex"));

pub fn completion(text: &str) -> String {
    format!(
        "Instructions: You are an autocomplete AI. You will be given text and you need to suggest a natural continuation. Consider the entire context provided. Note: DO NOT PROVIDE ANY TEXT EXCEPT THE CONTINUATION.\nPrevious text: {}\nProvide a natural continuation:",
        text.trim_end()
    )
}

pub fn rephrase(selected: &str, instructions: &str) -> String {
    let instructions = match instructions.trim() {
        "" => DEFAULT_REPHRASE_INSTRUCTIONS,
        given => given,
    };
    format!(
        "Rephrase the following text: {}\nInstructions: {}",
        selected, instructions
    )
}

pub fn auto_write(request: &str) -> String {
    request.trim().to_string()
}

/// Strip reasoning blocks, a wrapping code fence and a wrapping pair of
/// quotes from a model reply.
pub fn clean_response(raw: &str) -> String {
    let without_thinking = THINK_BLOCK.replace_all(raw, "");
    let mut text = without_thinking.trim();

    if let Some(inner) = CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        text = inner.as_str().trim();
    }

    for (open, close) in [('"', '"'), ('“', '”'), ('\'', '\'')] {
        if text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close) {
            let inner = &text[open.len_utf8()..text.len() - close.len_utf8()];
            // Leave replies alone that merely start and end with a quotation.
            if !inner.contains(close) {
                text = inner.trim();
            }
            break;
        }
    }

    text.to_string()
}

/// One-line preview of `text` at most `max_width` terminal columns wide.
pub fn preview(text: &str, max_width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut width = 0;
    let mut out = String::new();

    for ch in flat.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            // Make room for the ellipsis.
            while width + 1 > max_width {
                match out.pop() {
                    Some(removed) => width -= removed.width().unwrap_or(0),
                    None => break,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push(ch);
    }

    out
}
