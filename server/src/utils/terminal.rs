//! Terminal output helpers

/// Wrap a URL in an OSC 8 hyperlink escape when the terminal supports it
pub fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::supports_hyperlinks() {
        format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, url)
    } else {
        url.to_string()
    }
}
