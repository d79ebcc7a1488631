//! Artifact filtering.
//!
//! A [`FilterChain`] keeps an artifact only if every filter in it accepts the
//! artifact. Filters are independent predicates, so the chain's result is the
//! intersection of each filter's accepted set no matter the order in which
//! they were added.
//!
//! Filter parameters are validated when the filter is built; applying a chain
//! never fails.

use crate::project::{Artifact, Scope};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid scope filter: unknown scope '{0}'")]
    UnknownScope(String),
    #[error("invalid scope filter: '{0}' scope cannot select dependencies")]
    UnselectableScope(String),
    #[error("invalid type filter: type must not be empty")]
    EmptyType,
}

/// A predicate over resolved artifacts.
pub trait ArtifactFilter {
    fn is_included(&self, artifact: &Artifact) -> bool;
}

/// Keeps only artifacts that the project declares directly.
///
/// With `exclude_transitive == false` every artifact passes.
pub struct ProjectTransitivityFilter {
    direct: HashSet<String>,
    exclude_transitive: bool,
}

impl ProjectTransitivityFilter {
    pub fn new(dependency_artifacts: &[Artifact], exclude_transitive: bool) -> Self {
        Self {
            direct: dependency_artifacts
                .iter()
                .map(|a| a.coordinates.dependency_key())
                .collect(),
            exclude_transitive,
        }
    }
}

impl ArtifactFilter for ProjectTransitivityFilter {
    fn is_included(&self, artifact: &Artifact) -> bool {
        !self.exclude_transitive || self.direct.contains(&artifact.coordinates.dependency_key())
    }
}

/// Keeps only artifacts with exactly the given scope.
pub struct ScopeFilter {
    scope: Scope,
}

impl ScopeFilter {
    pub fn new(scope: &str) -> Result<Self, FilterError> {
        let scope = scope
            .parse::<Scope>()
            .map_err(|_| FilterError::UnknownScope(scope.to_string()))?;
        // `import` only appears in dependency management, never on a resolved artifact.
        if scope == Scope::Import {
            return Err(FilterError::UnselectableScope(scope.to_string()));
        }
        Ok(Self { scope })
    }
}

impl ArtifactFilter for ScopeFilter {
    fn is_included(&self, artifact: &Artifact) -> bool {
        artifact.scope == self.scope
    }
}

/// Keeps only artifacts of the given type.
pub struct TypeFilter {
    type_: String,
}

impl TypeFilter {
    pub fn new(type_: &str) -> Result<Self, FilterError> {
        let type_ = type_.trim();
        if type_.is_empty() {
            return Err(FilterError::EmptyType);
        }
        Ok(Self {
            type_: type_.to_string(),
        })
    }
}

impl ArtifactFilter for TypeFilter {
    fn is_included(&self, artifact: &Artifact) -> bool {
        artifact.coordinates.type_ == self.type_
    }
}

/// An ordered collection of filters applied as a conjunction.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ArtifactFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: impl ArtifactFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Keep the artifacts accepted by every filter, in input order.
    pub fn filter<'a>(&self, artifacts: &'a [Artifact]) -> Vec<&'a Artifact> {
        artifacts
            .iter()
            .filter(|a| self.filters.iter().all(|f| f.is_included(a)))
            .collect()
    }
}
