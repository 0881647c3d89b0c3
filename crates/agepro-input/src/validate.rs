//! Business validation results
//!
//! A document can be syntactically well formed and still describe an
//! unusable case. Validation collects every problem instead of stopping at
//! the first one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregated validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub messages: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Record `message` when `condition` does not hold.
    pub fn require(&mut self, condition: bool, message: impl FnOnce() -> String) {
        if !condition {
            self.messages.push(message());
        }
    }

    /// Add `other`'s messages, each prefixed with `context`.
    pub fn merge(&mut self, context: &str, other: ValidationReport) {
        self.messages.extend(
            other
                .messages
                .into_iter()
                .map(|m| format!("{context}: {m}")),
        );
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefixes_context() {
        let mut inner = ValidationReport::new();
        inner.push("missing alpha");
        let mut outer = ValidationReport::new();
        outer.require(true, || "never".to_string());
        outer.merge("recruit model 1", inner);
        assert_eq!(outer.messages, vec!["recruit model 1: missing alpha"]);
        assert!(!outer.is_valid());
        assert_eq!(outer.to_string(), "  - recruit model 1: missing alpha");
    }
}
