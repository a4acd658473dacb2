use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Glob-like path pattern used by the session gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// `/favicon.ico` matches only itself
    Exact(String),
    /// `/api/*` matches any path strictly below `/api`, at any depth
    Subtree(String),
    /// `*.png` matches any path ending in `.png`
    Extension(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid path pattern '{0}': expected '/path', '/path/*' or '*.ext'")]
pub struct PatternError(pub String);

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Subtree(prefix) => path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1),
            PathPattern::Extension(suffix) => path.ends_with(suffix.as_str()),
        }
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let pattern = raw.trim();

        if let Some(suffix) = pattern.strip_prefix('*') {
            if suffix.starts_with('.') && suffix.len() > 1 && !suffix.contains(['*', '/']) {
                return Ok(PathPattern::Extension(suffix.to_string()));
            }
            return Err(PatternError(raw.to_string()));
        }

        if !pattern.starts_with('/') {
            return Err(PatternError(raw.to_string()));
        }

        if let Some(prefix) = pattern.strip_suffix("/*") {
            if prefix.contains('*') {
                return Err(PatternError(raw.to_string()));
            }
            return Ok(PathPattern::Subtree(prefix.to_string()));
        }

        if pattern.contains('*') {
            return Err(PatternError(raw.to_string()));
        }

        Ok(PathPattern::Exact(pattern.to_string()))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(path) => write!(f, "{}", path),
            PathPattern::Subtree(prefix) => write!(f, "{}/*", prefix),
            PathPattern::Extension(suffix) => write!(f, "*{}", suffix),
        }
    }
}

/// Which part of the application a protected path belongs to. Decides how a rejected
/// request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedArea {
    Api,
    Page,
}

/// Ordered protection rules plus the exclusions that short-circuit them
#[derive(Debug, Clone)]
pub struct RouteRules {
    rules: Vec<(PathPattern, ProtectedArea)>,
    exclusions: Vec<PathPattern>,
}

impl RouteRules {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            exclusions: Vec::new(),
        }
    }

    pub fn protect(mut self, pattern: &str, area: ProtectedArea) -> Result<Self, PatternError> {
        self.rules.push((pattern.parse()?, area));
        Ok(self)
    }

    pub fn exclude(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.exclusions.push(pattern.parse()?);
        Ok(self)
    }

    /// Returns the area of the first matching rule, or None when the path is excluded or
    /// matches nothing
    pub fn classify(&self, path: &str) -> Option<ProtectedArea> {
        if self.exclusions.iter().any(|pattern| pattern.matches(path)) {
            return None;
        }

        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, area)| *area)
    }
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            rules: vec![
                (
                    PathPattern::Exact("/dashboard".to_string()),
                    ProtectedArea::Page,
                ),
                (
                    PathPattern::Subtree("/dashboard".to_string()),
                    ProtectedArea::Page,
                ),
                (PathPattern::Subtree("/api".to_string()), ProtectedArea::Api),
            ],
            exclusions: vec![
                PathPattern::Subtree("/static".to_string()),
                PathPattern::Exact("/favicon.ico".to_string()),
            ],
        }
    }
}
