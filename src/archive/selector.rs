//! Include/exclude selection of archive entries.
//!
//! Patterns are glob strings matched against `/`-separated entry names:
//! `*` stays within one path segment, `**` spans segments, and a pattern
//! ending in `/` or `/**` selects that directory and everything below it.

use glob::{MatchOptions, Pattern};

use super::ArchiveError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Admits an entry if it matches any include (when includes are given) and
/// no exclude.
#[derive(Debug, Clone, Default)]
pub struct IncludeExcludeSelector {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl IncludeExcludeSelector {
    /// Build a selector from comma-separated pattern lists.
    ///
    /// Returns `Ok(None)` when both lists are absent or empty, meaning every
    /// entry is selected.
    pub fn from_lists(
        includes: Option<&str>,
        excludes: Option<&str>,
    ) -> Result<Option<Self>, ArchiveError> {
        let includes = parse_list(includes)?;
        let excludes = parse_list(excludes)?;
        if includes.is_empty() && excludes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self { includes, excludes }))
    }

    pub fn is_selected(&self, entry_name: &str) -> bool {
        let name = entry_name.trim_end_matches('/');
        let included = self.includes.is_empty()
            || self.includes.iter().any(|p| p.matches_with(name, MATCH_OPTIONS));
        included && !self.excludes.iter().any(|p| p.matches_with(name, MATCH_OPTIONS))
    }
}

fn parse_list(list: Option<&str>) -> Result<Vec<Pattern>, ArchiveError> {
    let Some(list) = list else {
        return Ok(Vec::new());
    };
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(compile)
        .collect::<Result<Vec<_>, _>>()
        .map(|patterns| patterns.into_iter().flatten().collect())
}

fn compile(raw: &str) -> Result<Vec<Pattern>, ArchiveError> {
    let normalized = raw.replace('\\', "/");
    let sources = match normalized
        .strip_suffix('/')
        .or_else(|| normalized.strip_suffix("/**"))
    {
        // The directory entry itself is selected along with its contents.
        Some(dir) => vec![dir.to_string(), format!("{}/**/*", dir)],
        None if normalized.ends_with("**") => vec![format!("{}/*", normalized)],
        None => vec![normalized],
    };
    sources
        .iter()
        .map(|glob| {
            Pattern::new(glob).map_err(|source| ArchiveError::Pattern {
                pattern: raw.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(includes: Option<&str>, excludes: Option<&str>) -> IncludeExcludeSelector {
        IncludeExcludeSelector::from_lists(includes, excludes)
            .unwrap()
            .expect("selector should be built")
    }

    #[test]
    fn test_no_patterns_means_no_selector() {
        assert!(IncludeExcludeSelector::from_lists(None, None).unwrap().is_none());
        assert!(IncludeExcludeSelector::from_lists(Some(""), Some(" , ")).unwrap().is_none());
    }

    #[test]
    fn test_includes_only() {
        let s = selector(Some("**/*.js"), None);
        assert!(s.is_selected("a.js"));
        assert!(s.is_selected("lib/deep/b.js"));
        assert!(!s.is_selected("lib/style.css"));
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let s = selector(Some("*.js"), None);
        assert!(s.is_selected("a.js"));
        assert!(!s.is_selected("lib/a.js"));
    }

    #[test]
    fn test_excludes_only() {
        let s = selector(None, Some("test/, **/*.map"));
        assert!(s.is_selected("lib/a.js"));
        assert!(!s.is_selected("test/spec.js"));
        assert!(!s.is_selected("lib/a.js.map"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let s = selector(Some("lib/**"), Some("lib/internal/**"));
        assert!(s.is_selected("lib/a.js"));
        assert!(!s.is_selected("lib/internal/b.js"));
        assert!(!s.is_selected("README.md"));
    }

    #[test]
    fn test_directory_entries_match_without_trailing_slash() {
        let s = selector(Some("lib/**"), None);
        assert!(s.is_selected("lib/sub/"));
    }

    #[test]
    fn test_directory_pattern_covers_the_directory_entry() {
        for pattern in ["lib/", "lib/**"] {
            let s = selector(None, Some(pattern));
            assert!(!s.is_selected("lib/"), "{pattern} kept lib/");
            assert!(!s.is_selected("lib/sub/a.js"), "{pattern} kept lib/sub/a.js");
            assert!(s.is_selected("library/a.js"), "{pattern} dropped library/a.js");
        }
    }

    #[test]
    fn test_malformed_pattern_is_an_error() {
        let err = IncludeExcludeSelector::from_lists(Some("lib/***"), None).unwrap_err();
        assert!(err.to_string().contains("lib/***"), "got: {err}");
    }
}
