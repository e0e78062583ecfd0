// src/core/sanitize.rs

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// File-name-safe form of a row name: alphanumerics kept, whitespace runs
/// become `_`, `-`/`_` kept, everything else dropped.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch=='-' || ch=='_' { if !(last_us && ch=='_') { out.push(ch); } last_us = ch=='_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}

/// Fit a progress label into a fixed-width column: cut with `...` past
/// `limit` chars, then pad with spaces to `pad_to`.
pub fn shorten(text: &str, limit: usize, pad_to: usize) -> String {
    const ELLIPSIS: &str = "...";
    let mut out: String = if text.chars().count() > limit {
        let keep = limit.saturating_sub(1 + ELLIPSIS.len());
        join!(&text.chars().take(keep).collect::<String>(), ELLIPSIS)
    } else {
        s!(text)
    };
    let len = out.chars().count();
    if len < pad_to {
        out.extend(std::iter::repeat_n(' ', pad_to - len));
    }
    out
}
