//! Shared domain models for product text rewriting.

use std::fmt;

/// Input payload for one rewrite call.
///
/// Instructions are fixed per rewriter, so only the source text varies
/// between requests issued by the same instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest<'a> {
    instructions: &'a str,
    source_text: &'a str,
}

impl<'a> RewriteRequest<'a> {
    /// Construct a request from instructions and source text.
    #[must_use]
    pub const fn new(instructions: &'a str, source_text: &'a str) -> Self {
        Self {
            instructions,
            source_text,
        }
    }

    /// System-level directive describing the desired rewrite.
    #[must_use]
    pub const fn instructions(&self) -> &'a str {
        self.instructions
    }

    /// Input text that should be rewritten.
    #[must_use]
    pub const fn source_text(&self) -> &'a str {
        self.source_text
    }
}

/// Whether a row's text came from the generation service or was kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteStatus {
    /// The service produced the text.
    Generated,
    /// The call failed and the original text was kept.
    Fallback,
}

impl RewriteStatus {
    /// Label written to the optional status column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for RewriteStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Result of a rewrite attempt.
///
/// Both variants carry the text that ends up in the output column; the
/// variant itself is the side channel telling the two cases apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The service produced a trimmed, non-empty rewrite.
    Generated {
        /// Rewritten text.
        text: String,
    },
    /// The call failed and the original text is preserved byte-for-byte.
    Fallback {
        /// Original unmodified source text.
        original_text: String,
        /// Operator-readable failure reason.
        reason: String,
    },
}

impl RewriteOutcome {
    /// Construct a generated outcome.
    #[must_use]
    pub fn generated(text: impl Into<String>) -> Self {
        Self::Generated { text: text.into() }
    }

    /// Construct a fallback outcome preserving the original text.
    #[must_use]
    pub fn fallback(original_text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fallback {
            original_text: original_text.into(),
            reason: reason.into(),
        }
    }

    /// Text destined for the output column.
    #[must_use]
    pub const fn text(&self) -> &str {
        match self {
            Self::Generated { text } => text.as_str(),
            Self::Fallback { original_text, .. } => original_text.as_str(),
        }
    }

    /// Consumes the outcome, returning the output text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Generated { text } => text,
            Self::Fallback { original_text, .. } => original_text,
        }
    }

    /// Status label for this outcome.
    #[must_use]
    pub const fn status(&self) -> RewriteStatus {
        match self {
            Self::Generated { .. } => RewriteStatus::Generated,
            Self::Fallback { .. } => RewriteStatus::Fallback,
        }
    }
}
