use lazy_static::lazy_static;
use regex::Regex;

/// Longest piece of text the speech endpoint accepts in one call.
pub const MAX_CHUNK_CHARS: usize = 100;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Sentence and clause boundaries. Periods and commas only count when
    // followed by whitespace so "3.5" and "1,000" stay whole.
    static ref BOUNDARY: Regex = Regex::new(
        r"[?!？！;:。，、：…‥¡¿()\[\]\x{2014}،\n]|[.,](?:\s|$)"
    )
    .unwrap();
}

/// Split `text` into speakable chunks of at most [`MAX_CHUNK_CHARS`] characters.
///
/// Chunks without any alphanumeric character are dropped, so the result is
/// empty when there is nothing to say.
pub fn chunk(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut last_end = 0;

    for m in BOUNDARY.find_iter(text) {
        push_minimized(&mut chunks, &text[last_end..m.end()]);
        last_end = m.end();
    }
    push_minimized(&mut chunks, &text[last_end..]);

    chunks
}

fn push_minimized(chunks: &mut Vec<String>, raw: &str) {
    let mut rest = WHITESPACE.replace_all(raw.trim(), " ").into_owned();

    while rest.chars().count() > MAX_CHUNK_CHARS {
        let limit = rest
            .char_indices()
            .nth(MAX_CHUNK_CHARS)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        // Prefer the last space inside the limit, hard split otherwise.
        let split = if rest[limit..].starts_with(' ') {
            limit
        } else {
            rest[..limit]
                .rfind(' ')
                .filter(|&i| i > 0)
                .unwrap_or(limit)
        };

        push_clean(chunks, &rest[..split]);
        rest = rest[split..].trim_start().to_string();
    }

    push_clean(chunks, &rest);
}

fn push_clean(chunks: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if piece.chars().any(char::is_alphanumeric) {
        chunks.push(piece.to_string());
    }
}
