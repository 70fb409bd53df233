/// Zero-width characters wedged between backticks so Discord stops pairing them.
const BACKTICK_BREAK: &str = "`\u{200C}\u{FEFF}`";

fn is_markdown_control(c: char) -> bool {
    matches!(c, '*' | '_' | '~' | '>' | '`' | '(' | '|' | ')' | '\\')
}

/// Backslash-escape every character Discord treats as markdown.
pub fn escape_markdown(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if is_markdown_control(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Break up every pair of adjacent backticks.
///
/// A single pass leaves a new pair behind for odd-length runs, so the
/// replacement is applied twice; even-length runs are fully handled by the first.
pub fn escape_backtick_pair(input: &str) -> String {
    input
        .replace("``", BACKTICK_BREAK)
        .replace("``", BACKTICK_BREAK)
}
