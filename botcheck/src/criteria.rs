//! Reply match criteria: optional substring and optional regex, both evaluated against the
//! markup-stripped text.

use std::fmt;

use botcheck_core::{HarnessError, Result};
use regex::Regex;

/// What a reply must look like. With neither constraint set, any reply matches.
#[derive(Debug, Clone, Default)]
pub struct ReplyCriteria {
    contains: Option<String>,
    pattern: Option<Regex>,
}

impl ReplyCriteria {
    /// Matches any reply.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn contains(text: impl Into<String>) -> Self {
        Self::any().and_contains(text)
    }

    /// Regex searched anywhere in the text (`(?i)` for case-insensitive).
    pub fn pattern(pattern: &str) -> Result<Self> {
        Self::any().and_pattern(pattern)
    }

    pub fn and_contains(mut self, text: impl Into<String>) -> Self {
        self.contains = Some(text.into());
        self
    }

    pub fn and_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| HarnessError::InvalidPattern(e.to_string()))?;
        self.pattern = Some(regex);
        Ok(self)
    }

    /// `normalized` must already be stripped with [`botcheck_core::normalize_markup`].
    pub fn matches(&self, normalized: &str) -> bool {
        self.contains
            .as_deref()
            .map_or(true, |needle| normalized.contains(needle))
            && self
                .pattern
                .as_ref()
                .map_or(true, |re| re.is_match(normalized))
    }
}

impl fmt::Display for ReplyCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.contains, &self.pattern) {
            (None, None) => write!(f, "any reply"),
            (Some(c), None) => write!(f, "contains={:?}", c),
            (None, Some(p)) => write!(f, "pattern=/{}/", p.as_str()),
            (Some(c), Some(p)) => write!(f, "contains={:?}, pattern=/{}/", c, p.as_str()),
        }
    }
}
