use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filter::should_skip;
use crate::normalize::{fingerprint, normalize_block};
use crate::patch::parse_added_lines;
use crate::types::{AnalyzeStats, AnalyzerOptions, FileDescriptor};

use super::AnalyzeError;

/// A sliding window of added lines from one file, ready for matching.
#[derive(Debug, Clone)]
pub(super) struct Block {
    pub(super) file: Arc<str>,
    pub(super) start_line: u32,
    pub(super) end_line: u32,
    pub(super) raw_code: String,
    pub(super) normalized_code: String,
    pub(super) fingerprint: String,
}

static MARKUP_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"classname|class=").expect("valid regex"));
static REQUIRE_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^const\s+[a-z_$][a-z0-9_$]*\s*=\s*require").expect("valid regex"));

/// Windows not worth matching: too short, markup-heavy, module plumbing, or
/// a bare bracket. Runs on the normalized (lowercased) form.
pub(super) fn is_trivial(normalized: &str) -> bool {
    let char_len = normalized.chars().count();
    if char_len < 30 {
        return true;
    }
    if char_len < 100 && MARKUP_CLASS.find_iter(normalized).count() > 2 {
        return true;
    }
    if normalized.starts_with("import ")
        || normalized.starts_with("export ")
        || REQUIRE_BINDING.is_match(normalized)
    {
        return true;
    }
    matches!(normalized.trim(), "{" | "}" | "(" | ")")
}

/// Stage 2: slide a `min_block_size` window over each file's added lines.
/// Window bounds come straight from the parsed line numbers; a cursor that
/// ran backwards (hunk headers out of order) is an input we refuse to build
/// ranges from.
pub(super) fn extract_blocks(
    files: &[FileDescriptor],
    options: &AnalyzerOptions,
    stats: &mut AnalyzeStats,
) -> Result<Vec<Block>, AnalyzeError> {
    let window = options.min_block_size.max(1);
    let mut blocks = Vec::new();

    for file in files {
        stats.files_seen += 1;
        if should_skip(&file.filename) {
            stats.files_skipped_by_path += 1;
            continue;
        }
        let Some(patch) = file.patch.as_deref() else {
            stats.files_without_patch += 1;
            continue;
        };
        let lines = parse_added_lines(patch);
        if lines.len() < window {
            stats.files_below_window += 1;
            continue;
        }

        let file_name: Arc<str> = Arc::from(file.filename.as_str());
        for chunk in lines.windows(window) {
            let start_line = chunk[0].line_number;
            let end_line = chunk[window - 1].line_number;
            if start_line > end_line {
                return Err(AnalyzeError::InvertedRange {
                    file: file.filename.clone(),
                    start: start_line,
                    end: end_line,
                });
            }

            let raw_code = chunk
                .iter()
                .map(|line| line.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let normalized_code = normalize_block(&raw_code);
            if is_trivial(&normalized_code) {
                stats.blocks_trivial += 1;
                continue;
            }

            let fingerprint = fingerprint(&normalized_code);
            stats.blocks_extracted += 1;
            blocks.push(Block {
                file: Arc::clone(&file_name),
                start_line,
                end_line,
                raw_code,
                normalized_code,
                fingerprint,
            });
        }
    }

    Ok(blocks)
}
