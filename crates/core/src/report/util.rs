use std::cmp::Ordering;

use crate::normalize::whitespace_token_set;
use crate::types::{ClusteredFinding, LineRange};

/// Windows separated by at most one intervening line are close enough to
/// coalesce.
pub(super) const MERGE_SLACK: u32 = 2;

/// Unordered dedup key for a pair of block endpoints: both endpoint strings,
/// lexicographically sorted, joined with `|`.
pub(super) fn dedup_key(file1: &str, lines1: LineRange, file2: &str, lines2: LineRange) -> String {
    let a = format!("{file1}:{}-{}", lines1.start, lines1.end);
    let b = format!("{file2}:{}-{}", lines2.start, lines2.end);
    if a <= b { format!("{a}|{b}") } else { format!("{b}|{a}") }
}

/// Jaccard similarity over whitespace-delimited token sets. The union size
/// falls out of `|A| + |B| - |A ∩ B|`, so only the intersection is counted.
pub(super) fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = whitespace_token_set(a);
    let tokens_b = whitespace_token_set(b);

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.len() + tokens_b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Sort ranges by start, then merge any that overlap or sit within
/// `MERGE_SLACK` of the previous end.
pub(super) fn merge_ranges(mut ranges: Vec<LineRange>) -> Vec<LineRange> {
    ranges.sort_by_key(|range| range.start);

    let mut merged: Vec<LineRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end.saturating_add(MERGE_SLACK) => {
                last.start = last.start.min(range.start);
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Final report order: widest clusters first, then strongest similarity.
pub(super) fn sort_findings_for_report(findings: &mut [ClusteredFinding]) {
    findings.sort_by(|a, b| {
        b.cluster_size
            .unwrap_or(1)
            .cmp(&a.cluster_size.unwrap_or(1))
            .then_with(|| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(Ordering::Equal)
            })
    });
}
