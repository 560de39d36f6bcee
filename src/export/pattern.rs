//! Two-placeholder export URL templates.

use thiserror::Error;

/// Placeholder token in a URL template.
pub const PLACEHOLDER: &str = "%s";

/// Path appended to an export host to form the default template.
pub const EXPORT_ENDPOINT_PATTERN: &str = "/sparc/datasets/%s/LATEST/%s";

/// Errors from URL template validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The template does not contain exactly two `%s` placeholders.
    #[error("URL pattern {pattern:?} must contain exactly 2 %s placeholders, found {found}")]
    PlaceholderCount {
        /// The rejected template.
        pattern: String,
        /// Number of placeholders present.
        found: usize,
    },
}

/// A validated URL template: dataset UUID goes in the first `%s`, file name in the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    raw: String,
    head: String,
    middle: String,
    tail: String,
}

impl UrlPattern {
    /// Parses a template such as `https://host/sparc/datasets/%s/LATEST/%s`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::PlaceholderCount`] unless there are exactly two placeholders.
    pub fn new(pattern: impl Into<String>) -> Result<Self, PatternError> {
        let raw = pattern.into();
        let parts: Vec<String> = raw.split(PLACEHOLDER).map(str::to_string).collect();
        let found = parts.len() - 1;
        let Ok([head, middle, tail]) = <[String; 3]>::try_from(parts) else {
            return Err(PatternError::PlaceholderCount {
                pattern: raw,
                found,
            });
        };
        Ok(Self {
            raw,
            head,
            middle,
            tail,
        })
    }

    /// Default template for an export host: `{host}/sparc/datasets/%s/LATEST/%s`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `host` itself contains a placeholder.
    pub fn for_host(host: &str) -> Result<Self, PatternError> {
        Self::new(format!(
            "{}{EXPORT_ENDPOINT_PATTERN}",
            host.trim_end_matches('/')
        ))
    }

    /// Fills both placeholders. Substituted values are inserted verbatim.
    #[must_use]
    pub fn render(&self, dataset_uuid: &str, file_name: &str) -> String {
        format!(
            "{}{dataset_uuid}{}{file_name}{}",
            self.head, self.middle, self.tail
        )
    }

    /// The template as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
