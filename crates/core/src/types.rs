use serde::Serialize;

/// Number of consecutive added lines forming one candidate block.
pub const MIN_BLOCK_SIZE: usize = 10;

/// Jaccard similarity at or above which a block pair is reported.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Stricter Jaccard threshold used when clustering pairs transitively.
pub const CLUSTER_SIMILARITY_THRESHOLD: f64 = 0.90;

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub min_block_size: usize,
    pub similarity_threshold: f64,
    pub cluster_similarity_threshold: f64,
    pub medium_severity_percentage: f64,
    pub high_severity_percentage: f64,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            min_block_size: MIN_BLOCK_SIZE,
            similarity_threshold: SIMILARITY_THRESHOLD,
            cluster_similarity_threshold: CLUSTER_SIMILARITY_THRESHOLD,
            medium_severity_percentage: 15.0,
            high_severity_percentage: 30.0,
        }
    }
}

/// One changed file as reported by the upstream PR fetcher. `patch` carries
/// the unified diff when the provider supplied one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub filename: String,
    pub status: String,
    pub additions: u64,
    pub deletions: u64,
    pub patch: Option<String>,
}

/// Inclusive 1-based line range in the post-image of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// A pairwise duplicate between two distinct files.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicatePair {
    pub file1: String,
    pub file2: String,
    pub lines1: LineRange,
    pub lines2: LineRange,
    pub code: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLocation {
    pub file: String,
    pub lines: LineRange,
}

/// A report entry. Pairwise findings leave the cluster fields empty; findings
/// that collapsed a multi-file pattern carry the full location list. The
/// serialized field names are consumed by the review frontend as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredFinding {
    pub file1: String,
    pub file2: String,
    pub lines1: LineRange,
    pub lines2: LineRange,
    pub code: String,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_files: Option<Vec<FileLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_hash: Option<String>,
}

impl ClusteredFinding {
    pub(crate) fn from_pair(pair: DuplicatePair) -> Self {
        Self {
            file1: pair.file1,
            file2: pair.file2,
            lines1: pair.lines1,
            lines2: pair.lines2,
            code: pair.code,
            similarity: pair.similarity,
            cluster_size: None,
            all_files: None,
            pattern_hash: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicationReport {
    pub percentage: f64,
    pub severity: Severity,
    pub duplicate_blocks: Vec<ClusteredFinding>,
    pub total_lines: u64,
    pub duplicated_lines: u64,
}

/// Pipeline counters. Observational only; never feeds back into the report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnalyzeStats {
    pub files_seen: u64,
    pub files_skipped_by_path: u64,
    pub files_without_patch: u64,
    pub files_below_window: u64,
    pub blocks_extracted: u64,
    pub blocks_trivial: u64,
    pub exact_pairs: u64,
    pub fuzzy_pairs: u64,
    pub pairs_after_merge: u64,
    pub clustered_findings: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOutcome {
    pub report: DuplicationReport,
    pub stats: AnalyzeStats,
}
