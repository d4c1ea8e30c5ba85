mod filter;
mod normalize;
mod patch;
mod report;
mod types;

pub use filter::should_skip;

pub use report::{analyze_duplication, analyze_duplication_with_stats};

pub use types::{
    AnalyzeOutcome, AnalyzeStats, AnalyzerOptions, CLUSTER_SIMILARITY_THRESHOLD, ClusteredFinding,
    DuplicatePair, DuplicationReport, FileDescriptor, FileLocation, LineRange, MIN_BLOCK_SIZE,
    SIMILARITY_THRESHOLD, Severity,
};
