//! Hashtag grammar shared by the server extractor and the feed highlighter.
//!
//! A tag is `#` followed by one or more ASCII word characters
//! (`[A-Za-z0-9_]`). Tags are stored without the leading `#` and keep
//! their case.

use serde::{Deserialize, Serialize};

const MARKER: u8 = b'#';

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// A piece of post text, either plain or a tag (stored form, no `#`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    Text(String),
    Tag(String),
}

impl Segment {
    /// Text as it appears in the original body.
    pub fn display(&self) -> String {
        match self {
            Segment::Text(t) => t.clone(),
            Segment::Tag(t) => format!("#{t}"),
        }
    }
}

/// Byte ranges `(start, end)` of every tag body, `start` pointing past the `#`.
fn tag_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != MARKER {
            i += 1;
            continue;
        }
        let start = i + 1;
        let mut end = start;
        while end < bytes.len() && is_word(bytes[end]) {
            end += 1;
        }
        if end > start {
            spans.push((start, end));
            i = end;
        } else {
            i += 1;
        }
    }
    spans
}

/// Every tag in `text`, in order of appearance, duplicates included.
pub fn extract(text: &str) -> Vec<String> {
    tag_spans(text)
        .into_iter()
        .map(|(s, e)| text[s..e].to_owned())
        .collect()
}

/// Split `text` into plain and tag segments. Empty plain runs are skipped.
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for (start, end) in tag_spans(text) {
        // `start - 1` is the `#`, which is ASCII so the slice stays on a char boundary
        let hash = start - 1;
        if hash > cursor {
            out.push(Segment::Text(text[cursor..hash].to_owned()));
        }
        out.push(Segment::Tag(text[start..end].to_owned()));
        cursor = end;
    }
    if cursor < text.len() {
        out.push(Segment::Text(text[cursor..].to_owned()));
    }
    out
}

/// True if `s` is a stored tag: non-empty, word characters only.
pub fn is_tag(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_word)
}
