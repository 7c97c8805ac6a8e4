//! Indentation-aware line buffer for generated source.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Writes `header` and indents what follows.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.depth += 1;
    }

    /// Dedents and writes `footer`.
    pub fn close(&mut self, footer: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(footer);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
