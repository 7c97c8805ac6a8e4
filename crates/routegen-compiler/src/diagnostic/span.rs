//! Source location tracking.

/// One raw line of a route file, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// The line exactly as written, without its terminator.
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    /// Iterates the lines of `source` with 1-based numbers.
    pub fn enumerate(source: &'a str) -> impl Iterator<Item = SourceLine<'a>> {
        source
            .lines()
            .enumerate()
            .map(|(i, text)| SourceLine::new(i + 1, text))
    }
}
