use globset::{Glob, GlobMatcher};

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        source: globset::Error,
    },
}

/// A compiled set of shell-style ignore patterns.
///
/// Each pattern is matched against the whole relative path string, not per
/// segment: `*` and `?` cross `/`, `[...]` character classes work, and
/// matching is case-sensitive. Patterns are independent and the first match
/// short-circuits. The empty set matches nothing.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    patterns: Vec<String>,
    matchers: Vec<GlobMatcher>,
}

impl IgnoreSet {
    /// Compiles every pattern up front. A malformed pattern, whether it came
    /// from the command line or from a stored snapshot, is a configuration
    /// error for the whole run.
    pub fn new(patterns: &[String]) -> Result<Self, PatternError> {
        let matchers = patterns
            .iter()
            .map(|pattern| {
                Glob::new(pattern)
                    .map(|glob| glob.compile_matcher())
                    .map_err(|source| PatternError::Invalid {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IgnoreSet {
            patterns: patterns.to_vec(),
            matchers,
        })
    }

    pub fn is_match(&self, relative_path: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(relative_path))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
