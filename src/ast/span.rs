use std::fmt::{self, Display};
use std::sync::Arc;

/// A [`Span`] contains the source file and a pair of byte offsets
/// representing the start and the end of a proof fragment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span(Arc<SrcFile>, usize, usize);

lazy_static::lazy_static! {
    pub static ref DUMMY_SPAN: Span = Span(Arc::new(SrcFile { name: None, contents: String::new() }), 0, 0);
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SrcFile {
    pub name: Option<String>,
    pub contents: String,
}

struct Location {
    line: usize,
    col: usize,
}

impl SrcFile {
    pub fn new(name: Option<String>, contents: impl Into<String>) -> Arc<Self> {
        Arc::new(SrcFile {
            name,
            contents: contents.into(),
        })
    }

    fn get_location(&self, offset: usize) -> Location {
        let mut line = 1;
        let mut col = 1;
        for (i, c) in self.contents.char_indices() {
            if i == offset {
                break;
            }
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        Location { line, col }
    }
}

impl Span {
    /// Offsets are clamped to the file contents.
    pub fn new(file: Arc<SrcFile>, start: usize, end: usize) -> Self {
        let len = file.contents.len();
        let end = end.min(len);
        Span(file, start.min(end), end)
    }

    pub fn string(&self) -> &str {
        self.0.contents.get(self.1..self.2).unwrap_or("")
    }

    pub fn is_dummy(&self) -> bool {
        self.0.contents.is_empty()
    }
}

impl Default for Span {
    fn default() -> Self {
        DUMMY_SPAN.clone()
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            return match &self.0.name {
                Some(filename) => write!(f, "In {filename}"),
                None => write!(f, "In <unknown location>"),
            };
        }
        let start = self.0.get_location(self.1);
        let end = self.0.get_location(self.2.saturating_sub(1).max(self.1));
        let quote = self.string();
        match (&self.0.name, start.line == end.line) {
            (Some(filename), true) => write!(
                f,
                "In {}:{}-{} of {filename}: {quote}",
                start.line, start.col, end.col
            ),
            (Some(filename), false) => write!(
                f,
                "In {}:{}-{}:{} of {filename}: {quote}",
                start.line, start.col, end.line, end.col
            ),
            (None, false) => write!(
                f,
                "In {}:{}-{}:{}: {quote}",
                start.line, start.col, end.line, end.col
            ),
            (None, true) => write!(f, "In {}:{}-{}: {quote}", start.line, start.col, end.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_display_resolves_lines() {
        let file = SrcFile::new(Some("proof.mt".into()), "L1: P;\nL2: Q by L1;");
        let span = Span::new(file, 7, 11);
        assert_eq!(span.string(), "L2: ");
        assert_eq!(span.to_string(), "In 2:1-4 of proof.mt: L2: ");
    }

    #[test]
    fn dummy_span_is_printable() {
        assert_eq!(DUMMY_SPAN.to_string(), "In <unknown location>");
    }
}
