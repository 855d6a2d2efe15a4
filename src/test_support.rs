use crate::blueprint::{Blueprint, Rule};
use crate::model::{ModelClient, ModelError, ModelRequest, ModelResponse};
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

enum Scripted {
    Reply {
        content: Option<String>,
        delay: Duration,
    },
    Fail(String),
}

/// A model client that replays canned replies and records every request.
pub(crate) struct ScriptedModel {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub(crate) fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script replies that all return instantly.
    pub(crate) fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let model = Self::new();
        for reply in replies {
            model.push(reply, Duration::ZERO);
        }
        model
    }

    pub(crate) fn push(&self, reply: impl Into<String>, delay: Duration) -> &Self {
        self.lock_replies().push_back(Scripted::Reply {
            content: Some(reply.into()),
            delay,
        });
        self
    }

    pub(crate) fn push_empty(&self) -> &Self {
        self.lock_replies().push_back(Scripted::Reply {
            content: None,
            delay: Duration::ZERO,
        });
        self
    }

    pub(crate) fn push_failure(&self, message: &str) -> &Self {
        self.lock_replies()
            .push_back(Scripted::Fail(message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub(crate) fn requests(&self) -> Vec<ModelRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.replies.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl ModelClient for ScriptedModel {
    fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.clone());

        let next = self.lock_replies().pop_front();
        match next {
            Some(Scripted::Reply { content, delay }) => {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                Ok(ModelResponse { content })
            }
            Some(Scripted::Fail(message)) => Err(ModelError::Http(message)),
            None => panic!("ScriptedModel ran out of replies after {} calls", self.calls()),
        }
    }
}

/// A blueprint with one HARD "NEVER mention" rule, one SOFT rule, and a
/// `{summary: string, confidence: number}` output shape.
pub(crate) fn sample_blueprint() -> Blueprint {
    Blueprint {
        id: "bp-summary".to_string(),
        name: "Summarizer".to_string(),
        role: "compliance analyst".to_string(),
        task_template: "Summarize {document} for {audience}.".to_string(),
        rules: vec![
            Rule::hard("r-gdpr", "NEVER mention GDPR"),
            Rule::soft("r-tone", "Keep a neutral tone"),
        ],
        input_slots: Default::default(),
        output_schema: schema(json!({"summary": "string", "confidence": "number"})),
        tests: Vec::new(),
    }
}

/// A blueprint with no rules and the given output shape.
pub(crate) fn blueprint_with_schema(output_schema: Value) -> Blueprint {
    Blueprint {
        id: "bp-schema".to_string(),
        name: "Schema only".to_string(),
        role: "assistant".to_string(),
        task_template: "Answer.".to_string(),
        rules: Vec::new(),
        input_slots: Default::default(),
        output_schema: schema(output_schema),
        tests: Vec::new(),
    }
}

fn schema(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("schema must be an object, got {other}"),
    }
}
