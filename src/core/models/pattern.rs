//! Path and name patterns used by task filters
//!
//! Three flavours are recognised:
//! - delimited regular expressions: `/^src\/.*/i` or `#^feature/.*#`
//! - glob patterns, anything containing `*`, `?` or `[`
//! - literals, everything else

use std::fmt;

use glob::MatchOptions;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Error raised for a pattern that cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern \"{pattern}\": {message}")]
pub struct PatternError {
    /// The offending pattern
    pub pattern: String,
    /// Compiler diagnostic
    pub message: String,
}

/// A compiled path or name pattern
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Shell glob
    Glob(glob::Pattern),
    /// Regular expression
    Regex(Regex),
    /// Plain text
    Literal(String),
}

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

impl PathPattern {
    /// Compile a pattern
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let error = |message: String| PatternError {
            pattern: pattern.to_string(),
            message,
        };

        if let Some((body, flags)) = split_delimited(pattern) {
            let mut builder = RegexBuilder::new(body);
            for flag in flags.chars() {
                match flag {
                    'i' => builder.case_insensitive(true),
                    'm' => builder.multi_line(true),
                    's' => builder.dot_matches_new_line(true),
                    'x' => builder.ignore_whitespace(true),
                    _ => builder.unicode(true),
                };
            }
            return builder.build().map(Self::Regex).map_err(|e| error(e.to_string()));
        }

        if pattern.contains(['*', '?', '[']) {
            return glob::Pattern::new(pattern).map(Self::Glob).map_err(|e| error(e.to_string()));
        }

        Ok(Self::Literal(pattern.to_string()))
    }

    /// Match a path: literals match as substrings, globs and regexes as usual
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Glob(glob) => glob.matches_with(path, GLOB_OPTIONS),
            Self::Regex(regex) => regex.is_match(path),
            Self::Literal(literal) => path.contains(literal.as_str()),
        }
    }

    /// Match a whole name: literals must be equal
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == name,
            other => other.matches(name),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glob(glob) => write!(f, "{}", glob.as_str()),
            Self::Regex(regex) => write!(f, "/{}/", regex.as_str()),
            Self::Literal(literal) => f.write_str(literal),
        }
    }
}

const REGEX_FLAGS: &str = "imsxu";

/// Split `/body/flags` or `#body#flags` into body and flags
#[must_use]
pub fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let delimiter = pattern.chars().next().filter(|c| matches!(c, '/' | '#'))?;
    let rest = &pattern[1..];
    let end = rest.rfind(delimiter)?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    if body.is_empty() || !flags.chars().all(|c| REGEX_FLAGS.contains(c)) {
        return None;
    }
    Some((body, flags))
}

/// Compile a list of patterns, failing on the first invalid one
pub fn compile_all<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Vec<PathPattern>, PatternError> {
    patterns.into_iter().map(PathPattern::parse).collect()
}
