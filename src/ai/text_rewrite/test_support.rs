//! Test-support utilities for rewrite flows.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ai::RewriteError;

use super::{RewriteRequest, TextRewriteService};

#[derive(Debug, Clone, Copy, Default)]
enum UnscriptedBehaviour {
    #[default]
    Fail,
    EchoUpper,
}

#[derive(Debug, Clone)]
struct RecordedCall {
    instructions: String,
    source_text: String,
}

/// Deterministic rewrite service that answers from a script and records
/// every call it receives.
#[derive(Debug, Default)]
pub struct ScriptedTextRewriteService {
    responses: HashMap<String, Result<String, RewriteError>>,
    unscripted: UnscriptedBehaviour,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTextRewriteService {
    /// Creates a stub that upper-cases every unscripted input.
    #[must_use]
    pub fn echo_upper() -> Self {
        Self {
            unscripted: UnscriptedBehaviour::EchoUpper,
            ..Self::default()
        }
    }

    /// Scripts the response for one exact source text.
    #[must_use]
    pub fn with_response(
        mut self,
        source_text: impl Into<String>,
        response: Result<String, RewriteError>,
    ) -> Self {
        self.responses.insert(source_text.into(), response);
        self
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map_or(0, |calls| calls.len())
    }

    /// Source texts in the order they were received.
    #[must_use]
    pub fn seen_texts(&self) -> Vec<String> {
        self.calls.lock().map_or_else(
            |_| Vec::new(),
            |calls| calls.iter().map(|call| call.source_text.clone()).collect(),
        )
    }

    /// Instructions in the order they were received.
    #[must_use]
    pub fn seen_instructions(&self) -> Vec<String> {
        self.calls.lock().map_or_else(
            |_| Vec::new(),
            |calls| calls.iter().map(|call| call.instructions.clone()).collect(),
        )
    }
}

impl TextRewriteService for ScriptedTextRewriteService {
    fn rewrite_text(&self, request: &RewriteRequest<'_>) -> Result<String, RewriteError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                instructions: request.instructions().to_owned(),
                source_text: request.source_text().to_owned(),
            });
        }

        if let Some(response) = self.responses.get(request.source_text()) {
            return response.clone();
        }

        match self.unscripted {
            UnscriptedBehaviour::EchoUpper => Ok(request.source_text().to_uppercase()),
            UnscriptedBehaviour::Fail => Err(RewriteError::Api {
                message: format!("no scripted response for '{}'", request.source_text()),
            }),
        }
    }
}
