//! Validated SQL identifiers and opaque row ids.
//!
//! `Identifier` is the only value the query builder will interpolate into SQL text.
//! It can only be obtained through [`Identifier::parse`], which whitelists `[A-Za-z0-9_-]+`.

use crate::error::AppError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static identifier pattern"))
}

/// Returns true when `candidate` is non-empty and made only of ASCII letters, digits, `_` and `-`.
pub fn is_valid_identifier(candidate: &str) -> bool {
    identifier_pattern().is_match(candidate)
}

/// Table or column name that passed the identifier whitelist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(candidate: &str) -> Result<Self, AppError> {
        if candidate.is_empty() {
            return Err(AppError::MissingParameter("resource"));
        }
        if !is_valid_identifier(candidate) {
            return Err(AppError::InvalidIdentifier(candidate.to_string()));
        }
        Ok(Identifier(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for SQL text. The whitelist excludes `"` so no escaping is needed.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of a row's `id` column as it arrived in the path. Only ever bound, never interpolated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowId(String);

impl RowId {
    pub fn parse(candidate: &str) -> Result<Self, AppError> {
        if candidate.is_empty() {
            return Err(AppError::MissingParameter("id"));
        }
        Ok(RowId(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
