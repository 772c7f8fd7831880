//! Service abstraction and fallback helper for AI rewriting.

use crate::ai::RewriteError;

use super::model::{RewriteOutcome, RewriteRequest};

/// Contract for anything that can turn a product text into a rewrite.
pub trait TextRewriteService: Send + Sync + std::fmt::Debug {
    /// Generate rewritten text for a request.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError`] when the provider call fails.
    fn rewrite_text(&self, request: &RewriteRequest<'_>) -> Result<String, RewriteError>;
}

/// Execute one rewrite while guaranteeing a fallback outcome.
///
/// A successful call yields the trimmed response, even when that is empty.
#[must_use]
pub fn rewrite_with_fallback(
    service: &dyn TextRewriteService,
    request: &RewriteRequest<'_>,
) -> RewriteOutcome {
    let original_text = request.source_text();

    match service.rewrite_text(request) {
        Ok(rewritten_text) => RewriteOutcome::generated(rewritten_text.trim()),
        Err(error) => {
            tracing::warn!(
                original_text,
                %error,
                "failed to generate text; keeping the original text"
            );
            RewriteOutcome::fallback(original_text, format!("AI request failed: {error}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::ai::RewriteError;
    use crate::ai::text_rewrite::{RewriteOutcome, RewriteRequest};

    use super::{TextRewriteService, rewrite_with_fallback};

    #[derive(Debug)]
    struct StubService {
        response: Result<String, RewriteError>,
    }

    impl TextRewriteService for StubService {
        fn rewrite_text(&self, _request: &RewriteRequest<'_>) -> Result<String, RewriteError> {
            self.response.clone()
        }
    }

    #[test]
    fn returns_trimmed_generated_text_when_service_succeeds() {
        let service = StubService {
            response: Ok("\n  Elegant blue shirt \n".to_owned()),
        };
        let request = RewriteRequest::new("instructions", "Blue cotton shirt, size M");

        let outcome = rewrite_with_fallback(&service, &request);

        assert_eq!(outcome, RewriteOutcome::generated("Elegant blue shirt"));
    }

    #[rstest]
    #[case::network(RewriteError::Network { message: "timeout".to_owned() }, "timeout")]
    #[case::auth(RewriteError::Authentication { message: "bad key".to_owned() }, "bad key")]
    #[case::missing_key(RewriteError::MissingApiKey, "API key is required")]
    fn returns_original_text_verbatim_when_service_fails(
        #[case] error: RewriteError,
        #[case] expected_reason: &str,
    ) {
        let service = StubService {
            response: Err(error),
        };
        let request = RewriteRequest::new("instructions", "  keep me as is\t");

        let outcome = rewrite_with_fallback(&service, &request);

        let RewriteOutcome::Fallback {
            original_text,
            reason,
        } = outcome
        else {
            panic!("expected fallback outcome");
        };
        assert_eq!(original_text, "  keep me as is\t");
        assert!(
            reason.contains(expected_reason),
            "reason should mention {expected_reason}: {reason}"
        );
    }

    #[test]
    fn blank_response_is_generated_empty_text() {
        let service = StubService {
            response: Ok("\n\t ".to_owned()),
        };
        let request = RewriteRequest::new("instructions", "Original");

        let outcome = rewrite_with_fallback(&service, &request);

        assert_eq!(outcome, RewriteOutcome::generated(""));
        assert_eq!(outcome.text(), "");
    }
}
