//! Substring highlighting for result labels

use log::debug;
use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            highlighted: false,
        }
    }

    fn marked(text: &'a str) -> Self {
        Self {
            text,
            highlighted: true,
        }
    }
}

/// Case-insensitive literal matcher for one highlight term.
///
/// Build once per render and reuse it for every label.
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    pub fn new(term: &str) -> Self {
        let term = term.trim();
        let pattern = if term.is_empty() {
            None
        } else {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .inspect_err(|e| debug!("highlighting disabled: {}", e))
                .ok()
        };
        Self { pattern }
    }

    /// Split `text` into plain and highlighted segments, in order.
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(pattern) = &self.pattern else {
            return vec![Segment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for m in pattern.find_iter(text) {
            if m.start() > last {
                segments.push(Segment::plain(&text[last..m.start()]));
            }
            segments.push(Segment::marked(m.as_str()));
            last = m.end();
        }
        if last < text.len() {
            segments.push(Segment::plain(&text[last..]));
        }
        segments
    }

    /// Render `text` with every highlighted segment wrapped in `open`/`close`.
    pub fn mark(&self, text: &str, open: &str, close: &str) -> String {
        self.segments(text)
            .into_iter()
            .map(|s| {
                if s.highlighted {
                    format!("{open}{}{close}", s.text)
                } else {
                    s.text.to_string()
                }
            })
            .collect()
    }
}

pub fn highlight<'a>(text: &'a str, term: &str) -> Vec<Segment<'a>> {
    Highlighter::new(term).segments(text)
}
