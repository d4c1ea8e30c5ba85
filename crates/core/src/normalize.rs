use std::collections::HashSet;

use md5::{Digest, Md5};
use once_cell::sync::Lazy;
use regex::Regex;

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").expect("valid regex"));
static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));
static DOUBLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"(?:[^"\\]|\\.)*""#).expect("valid regex"));
static SINGLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)'(?:[^'\\]|\\.)*'").expect("valid regex"));
static BACKTICK_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)`(?:[^`\\]|\\.)*`").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Canonical form of a block: comments gone, string literals emptied (quote
/// style preserved), whitespace runs collapsed, trimmed, case-folded. Two
/// blocks differing only in those dimensions normalize identically.
pub(crate) fn normalize_block(raw: &str) -> String {
    let stripped = LINE_COMMENT.replace_all(raw, "");
    let stripped = BLOCK_COMMENT.replace_all(&stripped, "");
    let stripped = DOUBLE_QUOTED.replace_all(&stripped, "\"\"");
    let stripped = SINGLE_QUOTED.replace_all(&stripped, "''");
    let stripped = BACKTICK_QUOTED.replace_all(&stripped, "``");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.trim().to_lowercase()
}

/// Lowercase hex MD5 digest of a block's text.
pub(crate) fn fingerprint(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Split on whitespace runs the way a `split(/\s+/)` regex split does: a
/// leading or trailing run contributes an empty token, and the empty string
/// yields a single empty token.
pub(crate) fn whitespace_token_set(text: &str) -> HashSet<&str> {
    WHITESPACE_RUN.split(text).collect()
}

#[cfg(test)]
mod tests {
    use super::{fingerprint, normalize_block, whitespace_token_set};

    #[test]
    fn strips_line_comments_to_end_of_line() {
        assert_eq!(
            normalize_block("let a = 1; // counter\nlet b = 2;"),
            "let a = 1; let b = 2;"
        );
    }

    #[test]
    fn strips_block_comments_across_lines() {
        assert_eq!(
            normalize_block("let a = 1; /* multi\nline\nnote */ let b = 2;"),
            "let a = 1; let b = 2;"
        );
    }

    #[test]
    fn elides_string_literals_preserving_quote_style() {
        assert_eq!(
            normalize_block(r#"x("a\"b"); y('c'); z(`d ${e}`);"#),
            r#"x(""); y(''); z(``);"#
        );
    }

    #[test]
    fn collapses_whitespace_and_folds_case() {
        assert_eq!(
            normalize_block("  IF (Ready)\t{\n    Go();\n  }  "),
            "if (ready) { go(); }"
        );
    }

    #[test]
    fn comment_string_whitespace_and_case_variants_share_a_fingerprint() {
        let a = normalize_block("const greeting = \"hello\"; // say hi");
        let b = normalize_block("const  GREETING  = \"HELLO WORLD\";");
        let c = normalize_block("/* lead */ const\tgreeting =\n\"x\";");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(fingerprint(&a), fingerprint(&c));
    }

    #[test]
    fn fingerprint_is_md5_hex() {
        assert_eq!(fingerprint(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(fingerprint("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn token_split_mirrors_a_regex_split() {
        let tokens = whitespace_token_set("a b  c");
        assert_eq!(tokens.len(), 3);

        let leading = whitespace_token_set(" a");
        assert!(leading.contains(""));
        assert!(leading.contains("a"));

        let empty = whitespace_token_set("");
        assert_eq!(empty.len(), 1);
        assert!(empty.contains(""));
    }
}
