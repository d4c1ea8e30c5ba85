use once_cell::sync::Lazy;
use regex::Regex;

/// `@@ -a,b +c,d @@`; only the post-image start matters here.
static HUNK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@@ -\d+(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("valid regex"));

/// A line introduced by the PR, addressed in the post-image of its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AddedLine {
    pub(crate) line_number: u32,
    pub(crate) content: String,
}

/// Walk a unified diff and recover the added lines with their post-image
/// line numbers. The cursor rules:
///
/// - a hunk header resets the cursor to the post-image start; a malformed
///   header leaves it untouched
/// - `+` lines (except the `+++` file header) are emitted and advance
/// - `-` lines (except the `---` file header) do not advance
/// - everything else (context, metadata) advances
pub(crate) fn parse_added_lines(patch: &str) -> Vec<AddedLine> {
    let mut added = Vec::new();
    let mut current_line: u32 = 0;

    for line in patch.lines() {
        if line.starts_with("@@") {
            if let Some(caps) = HUNK_HEADER.captures(line)
                && let Ok(start) = caps[1].parse::<u32>()
            {
                current_line = start;
            }
            continue;
        }

        if let Some(text) = line.strip_prefix('+') {
            if !line.starts_with("+++") {
                added.push(AddedLine {
                    line_number: current_line,
                    content: text.to_string(),
                });
            }
            current_line = current_line.saturating_add(1);
            continue;
        }

        if line.starts_with('-') && !line.starts_with("---") {
            continue;
        }

        current_line = current_line.saturating_add(1);
    }

    added
}

#[cfg(test)]
mod tests {
    use super::{AddedLine, parse_added_lines};

    #[test]
    fn empty_patch_yields_no_lines() {
        assert!(parse_added_lines("").is_empty());
    }

    #[test]
    fn hunk_header_anchors_the_cursor() {
        let patch = "@@ -1,2 +10,3 @@\n context\n+added one\n+added two\n";
        let added = parse_added_lines(patch);
        assert_eq!(
            added,
            vec![
                AddedLine {
                    line_number: 11,
                    content: "added one".to_string(),
                },
                AddedLine {
                    line_number: 12,
                    content: "added two".to_string(),
                },
            ]
        );
    }

    #[test]
    fn deletions_do_not_advance_the_cursor() {
        let patch = "@@ -5,3 +5,2 @@\n keep\n-dropped\n+replacement\n";
        let added = parse_added_lines(patch);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].line_number, 6);
        assert_eq!(added[0].content, "replacement");
    }

    #[test]
    fn file_headers_are_not_added_lines() {
        let patch = "--- a/src/app.ts\n+++ b/src/app.ts\n@@ -1 +1,2 @@\n old\n+new\n";
        let added = parse_added_lines(patch);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].content, "new");
        assert_eq!(added[0].line_number, 2);
    }

    #[test]
    fn later_hunks_reset_the_cursor() {
        let patch = "@@ -1 +1,2 @@\n a\n+b\n@@ -40 +41,2 @@\n c\n+d\n";
        let added = parse_added_lines(patch);
        assert_eq!(added[0].line_number, 2);
        assert_eq!(added[1].line_number, 42);
    }

    #[test]
    fn malformed_hunk_header_leaves_the_cursor_unchanged() {
        let patch = "@@ -1 +3,2 @@\n+first\n@@ broken header\n+second\n";
        let added = parse_added_lines(patch);
        assert_eq!(added[0].line_number, 3);
        assert_eq!(added[1].line_number, 4);
    }

    #[test]
    fn leading_plus_is_stripped_from_content() {
        let added = parse_added_lines("@@ -0,0 +1 @@\n++double plus\n");
        assert_eq!(added[0].content, "+double plus");
    }
}
