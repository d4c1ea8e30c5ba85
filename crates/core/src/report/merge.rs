use std::collections::HashMap;

use crate::types::DuplicatePair;

use super::util::MERGE_SLACK;

/// Stage 5: within each unordered file pair, coalesce records whose ranges
/// overlap or nearly abut on both sides. This absorbs the natural overlap of
/// the sliding-window extractor: consecutive windows differ by one line and
/// would otherwise each survive as their own record.
pub(super) fn merge_overlapping_pairs(pairs: Vec<DuplicatePair>) -> Vec<DuplicatePair> {
    let mut partition_ids: HashMap<(String, String), usize> = HashMap::new();
    let mut partitions: Vec<Vec<DuplicatePair>> = Vec::new();

    for pair in pairs {
        let key = if pair.file1 <= pair.file2 {
            (pair.file1.clone(), pair.file2.clone())
        } else {
            (pair.file2.clone(), pair.file1.clone())
        };
        let slot = *partition_ids.entry(key).or_insert_with(|| {
            partitions.push(Vec::new());
            partitions.len() - 1
        });
        partitions[slot].push(pair);
    }

    let mut merged = Vec::new();
    for mut partition in partitions {
        partition.sort_by_key(|pair| pair.lines1.start);

        let mut rest = partition.into_iter();
        let Some(mut current) = rest.next() else {
            continue;
        };
        for next in rest {
            let near1 = next.lines1.start <= current.lines1.end.saturating_add(MERGE_SLACK);
            let near2 = next.lines2.start <= current.lines2.end.saturating_add(MERGE_SLACK);
            if near1 && near2 {
                current.lines1.start = current.lines1.start.min(next.lines1.start);
                current.lines1.end = current.lines1.end.max(next.lines1.end);
                current.lines2.start = current.lines2.start.min(next.lines2.start);
                current.lines2.end = current.lines2.end.max(next.lines2.end);
                if next.similarity > current.similarity {
                    current.similarity = next.similarity;
                }
            } else {
                merged.push(current);
                current = next;
            }
        }
        merged.push(current);
    }

    merged
}
