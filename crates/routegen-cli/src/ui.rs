//! Routegen CLI UI primitives.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Terminal color palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const VIOLET: Color = Color::Color256(135);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const AMBER: Color = Color::Color256(214);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}"; // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}"; // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}"; // ◉
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const DOT: &str = "\u{00B7}"; // ·
    pub const ARROW: &str = "\u{2500}\u{25B8}"; // ─▸
}

/// Create a clickable file link (OSC 8 hyperlink) pointing at a line.
pub fn file_link(path: &str, line: usize) -> String {
    let abs_path = std::fs::canonicalize(path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.to_string());
    let uri = format!("file://{}#{}", abs_path, line);
    let display = format!("{}:{}", path, line);
    format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", uri, display)
}

/// Print a success message
pub fn success(msg: &str) {
    println!("  {} {}", style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(msg).fg(colors::MAGENTA)
    );
}

pub fn warn(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND_OUTLINE).fg(colors::AMBER),
        style(msg).fg(colors::AMBER)
    );
}

/// Print an info message
pub fn info(msg: &str) {
    println!("  {} {}", style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN), msg);
}

/// Print a dim/secondary message
pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // The template is a constant; fall back to the default style if it is ever rejected.
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}") // ◎◉◎◉
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(150));
    pb
}

/// Print a box header
pub fn box_header(title: &str) {
    let title_padded = format!(" {} ", title);
    let dashes = header_fill(&title_padded);

    println!(
        "  {}{}{}{}",
        style("\u{256D}\u{2500}").fg(colors::CYAN), // ╭─
        style(title_padded).fg(colors::CYAN).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::CYAN),
        style("\u{256E}").fg(colors::CYAN) // ╮
    );
}

/// Dashes after a padded header title so it lines up with `box_line`.
fn header_fill(title_padded: &str) -> usize {
    let width: usize = 55;
    width.saturating_sub(title_padded.chars().count() + 4)
}

/// Print a box line
pub fn box_line(content: &str) {
    let width: usize = 53;
    let content_len = console::measure_text_width(content);
    let padding = width.saturating_sub(content_len);
    println!(
        "  {} {}{}{}",
        style("\u{2502}").fg(colors::CYAN), // │
        content,
        " ".repeat(padding),
        style("\u{2502}").fg(colors::CYAN)
    );
}

/// Print a box footer
pub fn box_footer() {
    let width = 55;
    println!(
        "  {}{}{}",
        style("\u{2570}").fg(colors::CYAN), // ╰
        style("\u{2500}".repeat(width - 2)).fg(colors::CYAN),
        style("\u{256F}").fg(colors::CYAN) // ╯
    );
}

/// Print one route: line, method, path, handler and route name.
pub fn route_line(line: usize, method: &str, path: &str, handler: &str, name: &str) {
    println!(
        "  {:>4}  {:7} {:32} {} {}  {}",
        style(line).fg(colors::DIM),
        style(method).bold(),
        path,
        style(symbols::ARROW).fg(colors::DIM),
        style(handler).fg(colors::VIOLET),
        style(name).fg(colors::DIM)
    );
}

/// Print timing information
pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}

/// Print "Nope" error header (for check failures)
pub fn nope_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA).bold(),
        style("Nope.").fg(colors::MAGENTA).bold()
    );
    println!();
}

/// Print "Looking good" success for check
pub fn looking_good() {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        style("Looking good.").bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fill() {
        assert_eq!(header_fill(" Routes "), 43);
        assert_eq!(header_fill(&"x".repeat(80)), 0);
    }

    #[test]
    fn test_file_link_format() {
        let link = file_link("app.routes", 42);
        assert!(link.contains("app.routes:42"));
        assert!(link.contains("\x1b]8;;"));
    }
}
