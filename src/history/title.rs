/// Placeholder title a conversation starts with. While the title still
/// equals this sentinel, the first user message replaces it.
pub const DEFAULT_TITLE: &str = "New chat";

const MAX_TITLE_CHARS: usize = 40;

/// Derive a title from message text: collapse runs of whitespace to a
/// single space and keep the first 40 characters. Returns `None` when
/// nothing printable remains, in which case the sentinel stays.
pub(crate) fn derive_title(text: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = 0usize;
    'words: for word in text.split_whitespace() {
        if chars > 0 {
            out.push(' ');
            chars += 1;
            if chars >= MAX_TITLE_CHARS {
                break;
            }
        }
        for c in word.chars() {
            out.push(c);
            chars += 1;
            if chars >= MAX_TITLE_CHARS {
                break 'words;
            }
        }
    }
    if out.is_empty() { None } else { Some(out) }
}
