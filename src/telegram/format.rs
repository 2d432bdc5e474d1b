//! Text helpers for Telegram: message splitting and Markdown escaping.

/// Characters with meaning in Telegram's legacy Markdown.
const MARKDOWN_SPECIAL: &[char] = &['_', '*', '`', '['];

/// Characters that must be escaped everywhere in MarkdownV2.
const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Escape user-provided text for legacy `Markdown` messages.
pub fn escape_markdown(text: &str) -> String {
    escape_with(text, MARKDOWN_SPECIAL)
}

/// Escape user-provided text for `MarkdownV2` messages.
pub fn escape_markdown_v2(text: &str) -> String {
    escape_with(text, MARKDOWN_V2_SPECIAL)
}

fn escape_with(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Split a message into chunks that fit Telegram's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts.
///
/// `max_len` is in bytes; cuts always land on a char boundary.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let limit = floor_char_boundary(remaining, max_len);
        let chunk = &remaining[..limit];
        let split_at = chunk
            .rfind('\n')
            .or_else(|| chunk.rfind(' '))
            .unwrap_or(limit);

        // Don't split at position 0 (infinite loop guard)
        let split_at = if split_at == 0 { limit } else { split_at };

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    if i == 0 {
        // A single char wider than the limit; take it whole.
        s.chars().next().map(char::len_utf8).unwrap_or(0)
    } else {
        i
    }
}
