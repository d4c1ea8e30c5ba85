use std::collections::{HashMap, HashSet};

use crate::types::{AnalyzeStats, AnalyzerOptions, DuplicatePair, LineRange};

use super::blocks::Block;
use super::util::{dedup_key, jaccard_similarity};

/// Stage 4: pairwise duplicates in two passes. Pass 1 buckets blocks by
/// fingerprint for exact matches; pass 2 runs all-pairs Jaccard over the
/// normalized token sets for near matches. A shared dedup-key set keeps each
/// unordered pair of endpoints to a single record, and blocks from the same
/// file never pair with each other.
pub(super) fn detect_duplicate_pairs(
    blocks: &[Block],
    options: &AnalyzerOptions,
    stats: &mut AnalyzeStats,
) -> Vec<DuplicatePair> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut pairs = Vec::new();

    // Buckets iterate in first-insertion order so identical inputs always
    // produce the same report.
    let mut bucket_ids: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (idx, block) in blocks.iter().enumerate() {
        let slot = *bucket_ids
            .entry(block.fingerprint.as_str())
            .or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
        buckets[slot].push(idx);
    }

    for bucket in &buckets {
        if bucket.len() < 2 {
            continue;
        }
        for (pos, &first) in bucket.iter().enumerate() {
            for &second in &bucket[pos + 1..] {
                let a = &blocks[first];
                let b = &blocks[second];
                if a.file == b.file {
                    continue;
                }
                let key = dedup_key(&a.file, range_of(a), &b.file, range_of(b));
                if !seen.insert(key) {
                    continue;
                }
                stats.exact_pairs += 1;
                pairs.push(pair_from(a, b, 1.0));
            }
        }
    }

    for (idx, a) in blocks.iter().enumerate() {
        for b in &blocks[idx + 1..] {
            if a.file == b.file {
                continue;
            }
            let similarity = jaccard_similarity(&a.normalized_code, &b.normalized_code);
            if similarity < options.similarity_threshold || similarity >= 1.0 {
                continue;
            }
            let key = dedup_key(&a.file, range_of(a), &b.file, range_of(b));
            if !seen.insert(key) {
                continue;
            }
            stats.fuzzy_pairs += 1;
            pairs.push(pair_from(a, b, similarity));
        }
    }

    pairs
}

fn range_of(block: &Block) -> LineRange {
    LineRange {
        start: block.start_line,
        end: block.end_line,
    }
}

fn pair_from(a: &Block, b: &Block, similarity: f64) -> DuplicatePair {
    DuplicatePair {
        file1: a.file.to_string(),
        file2: b.file.to_string(),
        lines1: range_of(a),
        lines2: range_of(b),
        code: a.raw_code.clone(),
        similarity,
    }
}
