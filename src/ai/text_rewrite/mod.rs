//! AI-powered product text rewriting shared by the CLI and library callers.

mod model;
mod openai;
pub mod prompt;
mod rewriter;
mod service;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use model::{RewriteOutcome, RewriteRequest, RewriteStatus};
pub use openai::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiTextRewriteConfig, OpenAiTextRewriteService,
};
pub use prompt::DEFAULT_INSTRUCTIONS;
pub use rewriter::TextRewriter;
pub use service::{TextRewriteService, rewrite_with_fallback};
