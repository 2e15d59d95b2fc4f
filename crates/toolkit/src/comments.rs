//! Line comments in JSON documents.
//!
//! Config files and templates handled by this workspace are JSON with `#` or
//! `//` line comments. Comments are removed line by line before the text is
//! handed to `serde_json`. A marker that appears inside a string literal (for
//! example `"color": "#fff"` or `"url": "https://..."`) is part of the data and
//! is kept.

use serde_json::Value;

use crate::errors::{Result, ToolkitError};

/// Symbols that start a line comment when none are given explicitly.
pub const DEFAULT_COMMENT_SYMBOLS: &[&str] = &["#", "//"];

/// Strips `#` and `//` line comments from JSON text.
///
/// Every line is right-trimmed and lines are re-joined with `\n`; a trailing
/// newline in the input is not preserved.
pub fn strip_comments(text: &str) -> String {
    strip_comments_with(text, DEFAULT_COMMENT_SYMBOLS)
}

/// Strips line comments started by any of `symbols`.
pub fn strip_comments_with(text: &str, symbols: &[&str]) -> String {
    text.lines()
        .map(|line| strip_line(line, symbols))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cuts `line` at the earliest comment symbol found outside a string literal.
fn strip_line<'a>(line: &'a str, symbols: &[&str]) -> &'a str {
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            continue;
        }

        let rest = &line[idx..];
        if symbols.iter().any(|s| !s.is_empty() && rest.starts_with(s)) {
            return line[..idx].trim_end();
        }
    }

    line.trim_end()
}

/// Parses JSON text that may contain line comments.
///
/// `source_name` labels the text in error messages (usually the file path).
pub fn parse_jsonc(text: &str, source_name: &str) -> Result<Value> {
    serde_json::from_str(&strip_comments(text))
        .map_err(|e| ToolkitError::invalid_json(source_name, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_strips_trailing_comments() {
        let text = "{\n    \"a\": 1, # first\n    \"b\": 2 // second\n}";
        assert_eq!(strip_comments(text), "{\n    \"a\": 1,\n    \"b\": 2\n}");
    }

    #[test]
    fn test_whole_line_comments_become_blank_lines() {
        let text = "# header\n{\"a\": 1}\n   // note";
        assert_eq!(strip_comments(text), "\n{\"a\": 1}\n");
    }

    #[test]
    fn test_markers_inside_strings_are_kept() {
        let line = r##""color": "#fff", "url": "https://example.com" # done"##;
        assert_eq!(
            strip_comments(line),
            r##""color": "#fff", "url": "https://example.com""##
        );
    }

    #[test]
    fn test_escaped_quotes_do_not_end_strings() {
        let line = r##""say": "he said \"# not a comment\"" // comment"##;
        assert_eq!(strip_comments(line), r##""say": "he said \"# not a comment\"""##);

        let line = r##""path": "C:\\" # comment"##;
        assert_eq!(strip_comments(line), r##""path": "C:\\""##);
    }

    #[test]
    fn test_empty_strings_before_a_comment() {
        let line = r##""key": "" # empty"##;
        assert_eq!(strip_comments(line), r##""key": """##);
    }

    #[test]
    fn test_earliest_symbol_wins() {
        assert_eq!(strip_comments("1 // a # b"), "1");
        assert_eq!(strip_comments("1 # a // b"), "1");
    }

    #[test]
    fn test_custom_symbols() {
        assert_eq!(strip_comments_with("1 ; x # y", &[";"]), "1");
        assert_eq!(strip_comments_with("1 # y", &[";"]), "1 # y");
    }

    #[test]
    fn test_unterminated_string_is_left_alone() {
        assert_eq!(strip_comments(r##""open # x"##), r##""open # x"##);
    }

    #[test]
    fn test_parse_jsonc() {
        let text = "{\n  // the name\n  \"name\": \"alice\", # trailing\n  \"n\": 1\n}\n";
        assert_eq!(parse_jsonc(text, "inline").unwrap(), json!({"name": "alice", "n": 1}));

        let err = parse_jsonc("{\"a\": }", "broken.json").unwrap_err();
        assert!(matches!(
            err,
            ToolkitError::InvalidJson { ref source_name, .. } if source_name == "broken.json"
        ));
    }
}
