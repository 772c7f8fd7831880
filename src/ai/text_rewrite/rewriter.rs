//! Memoising rewriter that never fails.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::model::{RewriteOutcome, RewriteRequest};
use super::service::{TextRewriteService, rewrite_with_fallback};

/// Rewrites product texts with fixed instructions, caching every result.
///
/// The cache is keyed by the exact input string and lives as long as the
/// rewriter. Fallback outcomes are cached as well, so an input that failed
/// once is not sent again by the same instance.
#[derive(Debug)]
pub struct TextRewriter<'a> {
    service: &'a dyn TextRewriteService,
    instructions: String,
    cache: HashMap<String, RewriteOutcome>,
}

impl<'a> TextRewriter<'a> {
    /// Creates a rewriter bound to a service and a fixed instruction text.
    #[must_use]
    pub fn new(service: &'a dyn TextRewriteService, instructions: impl Into<String>) -> Self {
        Self {
            service,
            instructions: instructions.into(),
            cache: HashMap::new(),
        }
    }

    /// Instructions sent as the system message on every call.
    #[must_use]
    pub const fn instructions(&self) -> &str {
        self.instructions.as_str()
    }

    /// Rewrites `original_text`, returning the original on any failure.
    pub fn rewrite(&mut self, original_text: &str) -> String {
        self.rewrite_outcome(original_text).text().to_owned()
    }

    /// Rewrites `original_text`, reporting whether the result was generated.
    pub fn rewrite_outcome(&mut self, original_text: &str) -> &RewriteOutcome {
        match self.cache.entry(original_text.to_owned()) {
            Entry::Occupied(entry) => {
                tracing::debug!(original_text, "reusing cached rewrite");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let request = RewriteRequest::new(self.instructions.as_str(), original_text);
                entry.insert(rewrite_with_fallback(self.service, &request))
            }
        }
    }

    /// Number of distinct inputs seen since creation or the last reset.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Forgets every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
