/// Name suffixes excluded from analysis: lockfiles, data, docs, minified
/// bundles.
const SKIP_SUFFIXES: &[&str] = &[
    ".json",
    ".md",
    ".txt",
    ".yaml",
    ".yml",
    ".lock",
    "package-lock.json",
    "yarn.lock",
    ".min.js",
];

/// Path fragments excluded wherever they appear: tests, vendored and
/// generated trees.
const SKIP_FRAGMENTS: &[&str] = &[
    ".test.",
    ".spec.",
    "/__tests__/",
    "/node_modules/",
    "/dist/",
    "/build/",
];

/// Whether a changed file is exempt from duplication analysis. Matching is
/// case-sensitive; filenames are otherwise opaque to the analyzer.
pub fn should_skip(filename: &str) -> bool {
    SKIP_SUFFIXES.iter().any(|suffix| filename.ends_with(suffix))
        || SKIP_FRAGMENTS.iter().any(|fragment| filename.contains(fragment))
}
