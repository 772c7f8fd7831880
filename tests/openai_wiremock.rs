//! Integration tests for the `OpenAI` rewrite adapter against a `wiremock`
//! chat-completions endpoint.

use std::error::Error;
use std::io;
use std::time::Duration;

use product_rewriter::ai::{
    OpenAiTextRewriteConfig, OpenAiTextRewriteService, RewriteError, RewriteOutcome,
    RewriteRequest, TextRewriteService, TextRewriter, rewrite_with_fallback,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::matchers::{bearer_token, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestResult<T> = Result<T, Box<dyn Error>>;

const INSTRUCTIONS: &str = "Skriv en bedre tekst.";

struct ChatServer {
    runtime: Runtime,
    server: MockServer,
}

impl ChatServer {
    fn start() -> TestResult<Self> {
        let runtime = Runtime::new()?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self { runtime, server })
    }

    fn respond_with(&self, template: ResponseTemplate) {
        self.runtime.block_on(
            Mock::given(method("POST"))
                .and(path("/v1/chat/completions"))
                .and(bearer_token("sk-test"))
                .respond_with(template)
                .mount(&self.server),
        );
    }

    fn service(&self) -> TestResult<OpenAiTextRewriteService> {
        let config = OpenAiTextRewriteConfig::new(
            format!("{}/v1", self.server.uri()),
            "gpt-test",
            Some("sk-test".to_owned()),
            Some(Duration::from_secs(5)),
        );
        Ok(OpenAiTextRewriteService::new(config)?)
    }

    fn received_bodies(&self) -> TestResult<Vec<Value>> {
        let requests = self
            .runtime
            .block_on(self.server.received_requests())
            .ok_or("request recording should be enabled")?;
        requests
            .iter()
            .map(|request| serde_json::from_slice(&request.body).map_err(Into::into))
            .collect()
    }
}

#[fixture]
#[expect(
    clippy::expect_used,
    reason = "integration test fixture; allow-expect-in-tests does not cover integration tests"
)]
fn chat_server() -> ChatServer {
    ChatServer::start().expect("mock server should start")
}

fn completion(content: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

#[rstest]
fn request_body_carries_model_messages_and_limits(chat_server: ChatServer) -> TestResult<()> {
    chat_server.respond_with(completion(&json!("  Elegant blue shirt \n")));
    let service = chat_server.service()?;

    let text = service.rewrite_text(&RewriteRequest::new(INSTRUCTIONS, "Blue cotton shirt"))?;

    assert_eq!(text.trim(), "Elegant blue shirt");
    let bodies = chat_server.received_bodies()?;
    let body = bodies.first().ok_or("expected one request")?;
    assert_eq!(body.get("model"), Some(&json!("gpt-test")));
    assert_eq!(body.get("max_tokens"), Some(&json!(1000)));
    assert_eq!(body.get("temperature"), Some(&json!(0.7)));
    assert_eq!(
        body.get("messages"),
        Some(&json!([
            {"role": "system", "content": INSTRUCTIONS},
            {"role": "user", "content": "Omskriv følgende produktbeskrivelse: \n\nBlue cotton shirt"}
        ]))
    );
    Ok(())
}

#[rstest]
fn rewriter_trims_output_and_calls_once_per_distinct_text(
    chat_server: ChatServer,
) -> TestResult<()> {
    chat_server.respond_with(completion(&json!("\nElegant blue shirt\n")));
    let service = chat_server.service()?;
    let mut rewriter = TextRewriter::new(&service, INSTRUCTIONS);

    let first = rewriter.rewrite("Blue cotton shirt");
    let second = rewriter.rewrite("Blue cotton shirt");

    assert_eq!(first, "Elegant blue shirt");
    assert_eq!(second, "Elegant blue shirt");
    assert_eq!(chat_server.received_bodies()?.len(), 1);
    Ok(())
}

#[rstest]
fn blank_content_is_returned_as_empty_text(chat_server: ChatServer) -> TestResult<()> {
    chat_server.respond_with(completion(&json!(" \n\t ")));
    let service = chat_server.service()?;

    let outcome = rewrite_with_fallback(&service, &RewriteRequest::new(INSTRUCTIONS, "shirt"));

    assert_eq!(outcome, RewriteOutcome::generated(""));
    Ok(())
}

#[rstest]
fn content_parts_use_the_first_text_part(chat_server: ChatServer) -> TestResult<()> {
    chat_server.respond_with(completion(&json!([
        {"type": "text", "text": "Første del"},
        {"type": "text", "text": "Anden del"}
    ])));
    let service = chat_server.service()?;

    let text = service.rewrite_text(&RewriteRequest::new(INSTRUCTIONS, "hat"))?;

    assert_eq!(text, "Første del");
    Ok(())
}

#[rstest]
#[case::server_error(ResponseTemplate::new(500).set_body_string("upstream exploded"))]
#[case::malformed_json(ResponseTemplate::new(200).set_body_string("{not json"))]
#[case::no_choices(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))]
#[case::null_content(completion(&Value::Null))]
fn failed_requests_fall_back_to_the_original_text(
    chat_server: ChatServer,
    #[case] template: ResponseTemplate,
) -> TestResult<()> {
    chat_server.respond_with(template);
    let service = chat_server.service()?;

    let outcome = rewrite_with_fallback(&service, &RewriteRequest::new(INSTRUCTIONS, "red scarf"));

    match outcome {
        RewriteOutcome::Fallback { original_text, .. } if original_text == "red scarf" => Ok(()),
        other => Err(io::Error::other(format!("expected fallback, got {other:?}")).into()),
    }
}

#[rstest]
#[case::unauthorised(401, "authentication")]
#[case::rate_limited(429, "rate")]
fn status_codes_map_to_typed_errors(
    chat_server: ChatServer,
    #[case] status: u16,
    #[case] expected: &str,
) -> TestResult<()> {
    chat_server.respond_with(ResponseTemplate::new(status).set_body_string("nope"));
    let service = chat_server.service()?;

    let error = service
        .rewrite_text(&RewriteRequest::new(INSTRUCTIONS, "hat"))
        .err()
        .ok_or("request should fail")?;

    let matched = match expected {
        "authentication" => matches!(error, RewriteError::Authentication { .. }),
        _ => matches!(error, RewriteError::RateLimited { .. }),
    };
    if !matched {
        return Err(io::Error::other(format!("unexpected error for {status}: {error:?}")).into());
    }
    Ok(())
}

#[rstest]
fn additional_headers_are_sent(chat_server: ChatServer) -> TestResult<()> {
    chat_server.runtime.block_on(
        Mock::given(method("POST"))
            .and(header("X-Test-Scenario", "headers"))
            .respond_with(completion(&json!("Med header")))
            .mount(&chat_server.server),
    );
    let config = OpenAiTextRewriteConfig::new(
        format!("{}/v1", chat_server.server.uri()),
        "gpt-test",
        Some("sk-test".to_owned()),
        None,
    )
    .with_additional_header("X-Test-Scenario", "headers");
    let service = OpenAiTextRewriteService::new(config)?;

    let text = service.rewrite_text(&RewriteRequest::new(INSTRUCTIONS, "hat"))?;

    assert_eq!(text, "Med header");
    Ok(())
}
