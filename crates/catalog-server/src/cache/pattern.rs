//! Glob patterns as understood by Redis `SCAN MATCH`, restricted to `*`, `?`
//! and backslash escapes.

use regex::Regex;

/// Compiles a glob into an anchored regex.
///
/// `*` matches any run of characters, `?` exactly one, and `\x` matches `x`
/// literally. Every other character matches itself.
pub fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    let mut chars = glob.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => out.push_str(&regex::escape(&escaped.to_string())),
                None => out.push_str(r"\\"),
            },
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');
    Regex::new(&out)
}
