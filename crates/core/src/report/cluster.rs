use std::collections::HashMap;

use crate::normalize::fingerprint;
use crate::types::{AnalyzerOptions, ClusteredFinding, DuplicatePair, FileLocation, LineRange};

use super::AnalyzeError;
use super::util::{jaccard_similarity, merge_ranges};

/// Disjoint-set forest over pair ordinals, with path compression. Union by
/// rank is omitted; the forests here stay tiny.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = node;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_a] = root_b;
        }
    }
}

/// Stage 6: connect pairs whose code matches at the stricter threshold, then
/// collapse each connected component into a single finding that lists every
/// affected file and range.
pub(super) fn cluster_patterns(
    pairs: Vec<DuplicatePair>,
    options: &AnalyzerOptions,
) -> Result<Vec<ClusteredFinding>, AnalyzeError> {
    let mut forest = UnionFind::new(pairs.len());
    for i in 0..pairs.len() {
        for j in i + 1..pairs.len() {
            // The raw code, not the normalized form: clustering demands the
            // surface text itself repeats, not just its shape.
            let similarity = jaccard_similarity(&pairs[i].code, &pairs[j].code);
            if similarity >= options.cluster_similarity_threshold {
                forest.union(i, j);
            }
        }
    }

    // Components in first-member order, members in pair order.
    let mut cluster_ids: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for ordinal in 0..pairs.len() {
        let root = forest.find(ordinal);
        let slot = *cluster_ids.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[slot].push(ordinal);
    }

    let mut findings = Vec::with_capacity(clusters.len());
    for (cluster_id, members) in clusters.iter().enumerate() {
        let (&first, rest) = members
            .split_first()
            .ok_or(AnalyzeError::EmptyCluster(cluster_id))?;
        if rest.is_empty() {
            findings.push(ClusteredFinding::from_pair(pairs[first].clone()));
            continue;
        }

        // Gather every location the cluster touches, then merge each file's
        // ranges with the same slack the pairwise coalescer uses.
        let mut file_ids: HashMap<&str, usize> = HashMap::new();
        let mut locations: Vec<(&str, Vec<LineRange>)> = Vec::new();
        for &member in members {
            let pair = &pairs[member];
            for (file, lines) in [
                (pair.file1.as_str(), pair.lines1),
                (pair.file2.as_str(), pair.lines2),
            ] {
                let slot = *file_ids.entry(file).or_insert_with(|| {
                    locations.push((file, Vec::new()));
                    locations.len() - 1
                });
                locations[slot].1.push(lines);
            }
        }

        let cluster_size = locations.len();
        let mut all_files = Vec::new();
        for (file, ranges) in locations {
            for lines in merge_ranges(ranges) {
                all_files.push(FileLocation {
                    file: file.to_string(),
                    lines,
                });
            }
        }

        let mut representative = first;
        for &member in rest {
            if pairs[member].similarity > pairs[representative].similarity {
                representative = member;
            }
        }

        let pattern_hash = fingerprint(&pairs[representative].code);
        let mut finding = ClusteredFinding::from_pair(pairs[representative].clone());
        finding.cluster_size = Some(cluster_size);
        finding.all_files = Some(all_files);
        finding.pattern_hash = Some(pattern_hash);
        findings.push(finding);
    }

    Ok(findings)
}
