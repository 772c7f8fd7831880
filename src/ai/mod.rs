//! AI integration for rewriting product descriptions.
//!
//! The [`text_rewrite`] module talks to an OpenAI-compatible
//! chat-completions endpoint and wraps it in a memoising rewriter that
//! degrades to the original text whenever generation fails.

mod error;
pub mod text_rewrite;

pub use error::RewriteError;
pub use text_rewrite::{
    DEFAULT_INSTRUCTIONS, OpenAiTextRewriteConfig, OpenAiTextRewriteService, RewriteOutcome,
    RewriteRequest, RewriteStatus, TextRewriteService, TextRewriter, rewrite_with_fallback,
};
