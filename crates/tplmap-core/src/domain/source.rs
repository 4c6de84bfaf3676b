//! Loaded template source.

use serde::{Deserialize, Serialize};

/// Raw template text together with its canonical filename.
///
/// Returned by a [`Loader`](crate::application::ports::Loader); the filename
/// is what ends up in a source map's path table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    filename: String,
    content: String,
}

impl Source {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 1-based line of `offset` within this source.
    pub fn line_at(&self, offset: usize) -> usize {
        Self::resolve_line(&self.content, offset)
    }

    /// 1-based line number of byte `offset` within `content`.
    ///
    /// Counts `\n` bytes strictly before `offset`, so a newline belongs to the
    /// line it terminates. Offsets past the end saturate at the last line.
    pub fn resolve_line(content: &str, offset: usize) -> usize {
        let end = offset.min(content.len());
        content.as_bytes()[..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_byte_is_line_one() {
        assert_eq!(Source::resolve_line("abc\ndef", 0), 1);
    }

    #[test]
    fn start_of_second_line() {
        // "line1\n" is 6 bytes, offset 6 is the 'l' of "line2"
        assert_eq!(Source::resolve_line("line1\nline2\nline3\n", 6), 2);
    }

    #[test]
    fn newline_belongs_to_the_line_it_ends() {
        assert_eq!(Source::resolve_line("line1\nline2\n", 5), 1);
    }

    #[test]
    fn out_of_range_saturates() {
        let content = "a\nb\nc\n";
        assert_eq!(Source::resolve_line(content, 1_000), 4);
        assert_eq!(Source::resolve_line("", 12), 1);
    }

    #[test]
    fn line_at_uses_own_content() {
        let src = Source::new("/views/base.tpl", "<html>\n  <body>\n");
        assert_eq!(src.line_at(10), 2);
        assert_eq!(src.filename(), "/views/base.tpl");
    }
}
