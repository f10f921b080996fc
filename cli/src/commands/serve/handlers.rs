//! # Chat API Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//!
//! ## Overview
//!
//! Request handlers for the chat API and the JSON bodies they exchange:
//!
//! | Route            | Handler    | Success body                                   |
//! |------------------|------------|------------------------------------------------|
//! | `GET /health`    | `health`   | `{status, message, version, timestamp}`        |
//! | `POST /chat`     | `chat`     | `{answer, timestamp, confidence, model, context}` |
//! | `GET /examples`  | `examples` | `{examples}`                                   |
//! | `POST /batch`    | `batch`    | `{results, timestamp}`                         |
//!
//! Every failure is rendered through `ApiError` as `{error, message}` with a
//! 400, 404 or 500 status.
//!
use crate::core::config::DEFAULT_CONTEXT;
use crate::guidelines::{Responder, EXAMPLE_QUESTIONS};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Version of the HTTP contract reported by `/health`.
pub const API_VERSION: &str = "1.0.0";
/// Model label stamped on every answer.
pub const MODEL_NAME: &str = "ZNPHI-Measles-v1";
/// Keyword answers are verbatim guideline text, so confidence is constant.
pub const CONFIDENCE: &str = "high";
const HEALTH_MESSAGE: &str = "ZNPHI Measles Chatbot API is running";

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub responder: Arc<Responder>,
}

impl AppState {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder: Arc::new(responder),
        }
    }
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2024-05-01T09:30:00.123Z`.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// --- Bodies ---

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

/// Body of `POST /chat`. Only `question` is required. Clients also send
/// `max_tokens` and `temperature`; any JSON value is accepted for them and
/// they are dropped during deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: Option<String>,
    pub context: Option<String>,
}

/// The response envelope.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
    pub timestamp: String,
    pub confidence: String,
    pub model: String,
    pub context: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ExamplesResponse {
    pub examples: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
    Error,
}

/// Outcome for one question of a batch.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchResult {
    pub question: String,
    pub answer: Option<String>,
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchResponse {
    pub results: Vec<BatchResult>,
    pub timestamp: String,
}

// --- Errors ---

/// A failed request, rendered as `{error, message}`.
#[derive(Debug)]
pub enum ApiError {
    /// Caller mistake: missing question, malformed body, empty batch.
    BadRequest { error: &'static str, message: String },
    NotFound { message: String },
    /// Anything unexpected while handling; `message` carries the raw failure text.
    Internal { message: String },
}

impl ApiError {
    fn missing_question() -> Self {
        ApiError::BadRequest {
            error: "Question is required",
            message: "Please provide a question in the request body".to_string(),
        }
    }

    fn invalid_body(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            error: "Invalid request body",
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest { error, message } => (StatusCode::BAD_REQUEST, error, message),
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, "Not found", message),
            ApiError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", message)
            }
        };
        let body = ErrorBody {
            error: error.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Returns the question unless it is absent or the empty string. Whitespace
/// is a question like any other and gets the fallback answer.
fn required_question(question: Option<&str>) -> Option<&str> {
    question.filter(|q| !q.is_empty())
}

// --- Handlers ---

/// `GET /health`. Always healthy; there is nothing to degrade.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: HEALTH_MESSAGE.to_string(),
        version: API_VERSION.to_string(),
        timestamp: iso_timestamp(),
    })
}

/// `POST /chat`. Validates the question, asks the responder and wraps the
/// answer in the envelope.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!("Rejected chat request body: {}", rejection.body_text());
        ApiError::invalid_body(rejection)
    })?;

    let question = required_question(request.question.as_deref()).ok_or_else(|| {
        warn!("Chat request without a question");
        ApiError::missing_question()
    })?;

    let timestamp = iso_timestamp();
    info!("[{}] Question: {}", timestamp, question);

    let answer = state.responder.answer(question);

    let context = request
        .context
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());

    Ok(Json(ChatResponse {
        answer: answer.to_string(),
        timestamp,
        confidence: CONFIDENCE.to_string(),
        model: MODEL_NAME.to_string(),
        context,
    }))
}

/// `GET /examples`.
pub async fn examples() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        examples: EXAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    })
}

/// `POST /batch`. Answers each question independently; an empty question
/// becomes an error entry instead of failing the whole batch.
pub async fn batch(
    State(state): State<AppState>,
    body: Result<Json<Vec<String>>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(questions) = body.map_err(ApiError::invalid_body)?;

    if questions.is_empty() {
        return Err(ApiError::BadRequest {
            error: "Questions list cannot be empty",
            message: "Please provide a JSON array of questions in the request body".to_string(),
        });
    }

    info!("[{}] Batch of {} questions", iso_timestamp(), questions.len());

    let results = questions
        .into_iter()
        .map(|question| {
            let answer =
                required_question(Some(question.as_str())).map(|q| state.responder.answer(q));
            (question, answer)
        })
        .map(|(question, answer)| match answer {
            Some(answer) => BatchResult {
                question,
                answer: Some(answer.to_string()),
                status: BatchStatus::Success,
                error: None,
            },
            None => BatchResult {
                question,
                answer: None,
                status: BatchStatus::Error,
                error: Some("Question is required".to_string()),
            },
        })
        .collect();

    Ok(Json(BatchResponse {
        results,
        timestamp: iso_timestamp(),
    }))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        message: format!("No route for {}", uri.path()),
    }
}

/// Turns a handler panic caught by `CatchPanicLayer` into the 500 envelope.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!("Error processing request: {}", message);
    ApiError::Internal { message }.into_response()
}
