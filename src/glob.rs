//! Path globs selecting which destination files a snapshot owns

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

/// Include/exclude glob set over `/`-separated relative paths
///
/// Supports `**` (any number of path segments), `*` (within one segment) and
/// `?` (one character within a segment).
#[derive(Clone)]
pub struct Glob {
    include: Vec<String>,
    exclude: Vec<String>,
    include_re: Vec<Regex>,
    exclude_re: Vec<Regex>,
}

impl Glob {
    /// Build a glob from include and exclude patterns
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let include: Vec<String> = include.into_iter().map(Into::into).collect();
        let exclude: Vec<String> = exclude.into_iter().map(Into::into).collect();
        let include_re = include.iter().map(|p| compile(p)).collect::<Result<_>>()?;
        let exclude_re = exclude.iter().map(|p| compile(p)).collect::<Result<_>>()?;
        Ok(Self {
            include,
            exclude,
            include_re,
            exclude_re,
        })
    }

    /// Glob matching every file
    pub fn all_files() -> Self {
        Self {
            include: vec!["**".to_string()],
            exclude: Vec::new(),
            include_re: vec![Regex::new("^.*$").expect("hardcoded regex is valid")],
            exclude_re: Vec::new(),
        }
    }

    /// Whether a relative path is selected
    pub fn matches(&self, path: &str) -> bool {
        self.include_re.iter().any(|re| re.is_match(path))
            && !self.exclude_re.iter().any(|re| re.is_match(path))
    }
}

impl Default for Glob {
    fn default() -> Self {
        Self::all_files()
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glob")
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .finish()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(Error::Validation("empty glob pattern".to_string()));
    }

    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                // `**/` also matches zero directories
                if chars.peek() == Some(&'/') {
                    chars.next();
                    re.push_str("(?:.*/)?");
                } else {
                    re.push_str(".*");
                }
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');

    Regex::new(&re).map_err(|e| Error::Validation(format!("invalid glob '{pattern}': {e}")))
}
