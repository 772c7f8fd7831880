//! Error types raised while talking to the text-generation service.

use thiserror::Error;

/// Errors surfaced while configuring or calling the generation service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewriteError {
    /// No API key was available from any configuration source.
    #[error("AI API key is required (use --ai-api-key, PRODUCT_REWRITER_AI_API_KEY, or OPENAI_API_KEY)")]
    MissingApiKey,

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("network error talking to the AI service: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The service rejected the API key.
    #[error("AI service rejected the API key: {message}")]
    Authentication {
        /// Response detail returned with the 401/403 status.
        message: String,
    },

    /// The service asked the client to slow down.
    #[error("AI service rate limit exceeded: {message}")]
    RateLimited {
        /// Response detail returned with the 429 status.
        message: String,
    },

    /// Any other non-success status or an unusable response body.
    #[error("AI service error: {message}")]
    Api {
        /// Description of the failure.
        message: String,
    },
}
