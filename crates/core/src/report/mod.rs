mod blocks;
mod cluster;
mod detect;
mod merge;
mod util;


use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::filter::should_skip;
use crate::types::{
    AnalyzeOutcome, AnalyzeStats, AnalyzerOptions, ClusteredFinding, DuplicationReport,
    FileDescriptor, Severity,
};

/// Internal pipeline failures. These never escape the crate: the orchestrator
/// trades them for the empty report.
#[derive(Debug, Error)]
pub(crate) enum AnalyzeError {
    #[error("window over {file} has inverted line range {start}..{end}")]
    InvertedRange { file: String, start: u32, end: u32 },
    #[error("cluster {0} resolved to no member pairs")]
    EmptyCluster(usize),
}

fn empty_report() -> DuplicationReport {
    DuplicationReport {
        percentage: 0.0,
        severity: Severity::Low,
        duplicate_blocks: Vec::new(),
        total_lines: 0,
        duplicated_lines: 0,
    }
}

/// Analyze the changed files of a pull request for duplicated code. Total:
/// any internal failure degrades to the empty report rather than surfacing,
/// so duplication analysis can never block the surrounding review.
pub fn analyze_duplication(
    files: &[FileDescriptor],
    options: &AnalyzerOptions,
) -> DuplicationReport {
    analyze_duplication_with_stats(files, options).report
}

/// Same analysis, plus the pipeline counters gathered along the way.
pub fn analyze_duplication_with_stats(
    files: &[FileDescriptor],
    options: &AnalyzerOptions,
) -> AnalyzeOutcome {
    let mut stats = AnalyzeStats::default();
    match run_pipeline(files, options, &mut stats) {
        Ok(report) => AnalyzeOutcome { report, stats },
        Err(err) => {
            warn!("duplication analysis failed, returning empty report: {err}");
            AnalyzeOutcome {
                report: empty_report(),
                stats,
            }
        }
    }
}

fn run_pipeline(
    files: &[FileDescriptor],
    options: &AnalyzerOptions,
    stats: &mut AnalyzeStats,
) -> Result<DuplicationReport, AnalyzeError> {
    let blocks = blocks::extract_blocks(files, options, stats)?;
    debug!(blocks = blocks.len(), "extracted candidate blocks");

    let pairs = detect::detect_duplicate_pairs(&blocks, options, stats);
    let merged = merge::merge_overlapping_pairs(pairs);
    stats.pairs_after_merge = merged.len() as u64;

    let mut findings = cluster::cluster_patterns(merged, options)?;
    stats.clustered_findings = findings
        .iter()
        .filter(|finding| finding.cluster_size.is_some())
        .count() as u64;
    util::sort_findings_for_report(&mut findings);

    let total_lines = total_added_lines(files);
    let duplicated_lines = count_duplicated_lines(&findings);
    let percentage = if total_lines > 0 {
        (duplicated_lines as f64 / total_lines as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };
    let severity = severity_for(percentage, options);
    debug!(
        findings = findings.len(),
        total_lines, duplicated_lines, "duplication analysis complete"
    );

    Ok(DuplicationReport {
        percentage,
        severity,
        duplicate_blocks: findings,
        total_lines,
        duplicated_lines,
    })
}

/// Additions across every file the skip filter lets through, whether or not
/// a patch came with it.
fn total_added_lines(files: &[FileDescriptor]) -> u64 {
    files
        .iter()
        .filter(|file| !should_skip(&file.filename))
        .map(|file| file.additions)
        .sum()
}

/// Unique (file, line) coordinates covered by the findings' own two sides.
/// Cluster `all_files` locations deliberately do not contribute.
fn count_duplicated_lines(findings: &[ClusteredFinding]) -> u64 {
    let mut seen: HashSet<(&str, u32)> = HashSet::new();
    for finding in findings {
        for line in finding.lines1.start..=finding.lines1.end {
            seen.insert((finding.file1.as_str(), line));
        }
        for line in finding.lines2.start..=finding.lines2.end {
            seen.insert((finding.file2.as_str(), line));
        }
    }
    seen.len() as u64
}

fn severity_for(percentage: f64, options: &AnalyzerOptions) -> Severity {
    if percentage >= options.high_severity_percentage {
        Severity::High
    } else if percentage >= options.medium_severity_percentage {
        Severity::Medium
    } else {
        Severity::Low
    }
}
