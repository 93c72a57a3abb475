//! Request handlers. Every write follows the same shape: validate, persist, then
//! either redirect with a status token or answer with the form and its errors.

pub mod classes;
pub mod instructors;
pub mod payments;
pub mod schedules;

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;
use crate::validation::{FieldErrors, form_from_pairs};

/// Status tokens carried on the index redirect, e.g. `?success=created`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FlashQuery {
    /// created | updated | deleted
    pub success: Option<String>,
    /// not_found | delete_failed
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Success {
    Created,
    Updated,
    Deleted,
}

impl Success {
    fn token(self) -> &'static str {
        match self {
            Success::Created => "created",
            Success::Updated => "updated",
            Success::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    NotFound,
    DeleteFailed,
}

impl Failure {
    fn token(self) -> &'static str {
        match self {
            Failure::NotFound => "not_found",
            Failure::DeleteFailed => "delete_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// The managed entity types, used for routing and flash wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Class,
    Instructor,
    Payment,
    Schedule,
}

impl Resource {
    pub fn index_path(self) -> &'static str {
        match self {
            Resource::Class => "/classes",
            Resource::Instructor => "/instructors",
            Resource::Payment => "/payments",
            Resource::Schedule => "/schedules",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Resource::Class => "clase",
            Resource::Instructor => "instructor",
            Resource::Payment => "pago",
            Resource::Schedule => "horario",
        }
    }

    fn feminine(self) -> bool {
        matches!(self, Resource::Class)
    }

    fn ending(self) -> &'static str {
        if self.feminine() { "a" } else { "o" }
    }

    fn success_message(self, success: Success) -> Option<String> {
        let participle = match (self, success) {
            (Resource::Payment, Success::Created) => {
                return Some("Pago registrado exitosamente".to_string());
            }
            // payments are never edited or removed
            (Resource::Payment, _) => return None,
            (_, Success::Created) => "cread",
            (_, Success::Updated) => "actualizad",
            (_, Success::Deleted) => "eliminad",
        };
        Some(format!(
            "{} {participle}{} exitosamente",
            capitalize(self.noun()),
            self.ending()
        ))
    }

    fn failure_message(self, failure: Failure) -> String {
        let article = if self.feminine() { "la" } else { "el" };
        match failure {
            Failure::NotFound => {
                format!("{} no encontrad{}", capitalize(self.noun()), self.ending())
            }
            Failure::DeleteFailed => format!("Error al eliminar {article} {}", self.noun()),
        }
    }

    /// Resolves the one-time message for an index page. A success token wins over
    /// an error token; unknown error tokens still surface as a generic error.
    pub fn flash(self, query: &FlashQuery) -> Option<Flash> {
        let success = match query.success.as_deref() {
            Some("created") => Some(Success::Created),
            Some("updated") => Some(Success::Updated),
            Some("deleted") => Some(Success::Deleted),
            _ => None,
        };
        if let Some(message) = success.and_then(|s| self.success_message(s)) {
            return Some(Flash {
                kind: FlashKind::Success,
                message,
            });
        }
        let message = match query.error.as_deref()? {
            "not_found" => self.failure_message(Failure::NotFound),
            "delete_failed" => self.failure_message(Failure::DeleteFailed),
            _ => "Error desconocido".to_string(),
        };
        Some(Flash {
            kind: FlashKind::Error,
            message,
        })
    }

    pub fn redirect_success(self, success: Success) -> Response {
        Redirect::to(&format!("{}?success={}", self.index_path(), success.token())).into_response()
    }

    pub fn redirect_failure(self, failure: Failure) -> Response {
        Redirect::to(&format!("{}?error={}", self.index_path(), failure.token())).into_response()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Serialize)]
pub struct IndexView<T> {
    pub flash: Option<Flash>,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct FormView<V> {
    pub values: V,
    pub errors: FieldErrors,
}

/// Answers with a form: 200 for a fresh one, 422 when it carries errors.
pub fn form_response<V: Serialize>(values: V, errors: FieldErrors) -> Response {
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(FormView { values, errors })).into_response()
}

/// A submitted form body as raw pairs. Taking the rejection lets every body reach
/// validation instead of failing in the extractor.
pub type FormBody = Result<Form<Vec<(String, String)>>, FormRejection>;

/// Repeated keys keep their last value. An unreadable body decodes to an empty form,
/// which validation then reports field by field.
pub fn decode_form<T: DeserializeOwned + Default>(body: FormBody) -> T {
    match body {
        Ok(Form(pairs)) => form_from_pairs(pairs),
        Err(rejection) => {
            warn!("Unreadable form body: {rejection}");
            T::default()
        }
    }
}

/// Ids arrive as raw strings; anything but a positive integer resolves to nothing.
pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|id| *id > 0)
}

#[utoipa::path(get, path = "/", tag = "gym")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Gym Admin",
        "endpoints": {
            "/classes": "Training classes",
            "/instructors": "Instructors",
            "/payments": "Membership payments",
            "/schedules": "Opening hours"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "gym")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "gym"
)]
pub async fn healthz_ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))),
        Err(err) => {
            warn!("Readiness check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"status": "unavailable"})),
            )
        }
    }
}
