use chat_orchestrator::ChatResult;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Request payload for /api/chat, read from a JSON object.
#[derive(Debug, PartialEq, Eq)]
pub struct ChatRequest {
    /// User question; a missing field is read as an empty message.
    pub message: String,
}

/// A JSON object that is not a chat request.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ChatRequestError {
    #[error("`message` must be a string, got {0}")]
    MessageNotString(&'static str),
}

impl TryFrom<Map<String, Value>> for ChatRequest {
    type Error = ChatRequestError;

    fn try_from(mut body: Map<String, Value>) -> Result<Self, Self::Error> {
        match body.remove("message") {
            None => Ok(Self {
                message: String::new(),
            }),
            Some(Value::String(message)) => Ok(Self { message }),
            Some(other) => Err(ChatRequestError::MessageNotString(json_kind(&other))),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Response payload for /api/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Number of FAQ entries used; omitted for filtered responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<usize>,
    pub filtered: bool,
}

impl From<ChatResult> for ChatResponse {
    fn from(r: ChatResult) -> Self {
        Self {
            sources: (!r.filtered).then_some(r.sources),
            response: r.response,
            filtered: r.filtered,
        }
    }
}

/// Body returned with HTTP 500.
#[derive(Debug, Serialize)]
pub struct ChatFailure {
    pub response: String,
    pub error: bool,
}
