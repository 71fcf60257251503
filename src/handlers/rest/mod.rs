use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_macros::{FromRequest, debug_handler};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use std::sync::Arc;

use crate::{
    dto::{NoteRequest, NoteResponse},
    service::NoteService,
};

pub const NOTES_PATH: &str = "/api/notes";

#[derive(OpenApi)]
#[openapi(
    paths(get_all_notes, get_one_note, create_note, update_note, delete_note),
    components(schemas(NoteResponse, NoteRequest)),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

/// JSON request body whose syntax and type errors are answered with 400.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(JsonBodyRejection))]
pub struct JsonBody<T>(pub T);

pub struct JsonBodyRejection(JsonRejection);

impl From<JsonRejection> for JsonBodyRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection)
    }
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        let message = self.0.body_text();
        tracing::debug!("rejected request body: {}", message);
        (status, message).into_response()
    }
}

pub fn router(service: Arc<NoteService>) -> Router {
    let notes_router = Router::new()
        .route("/", get(get_all_notes))
        .route("/create", post(create_note))
        .route(
            "/{id}",
            get(get_one_note).put(update_note).delete(delete_note),
        );

    Router::new()
        .route("/", get(root))
        .nest(NOTES_PATH, notes_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Notes API is running").into_response()
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "List of all notes", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => {
            tracing::error!("failed to get note entries: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get all notes").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = Uuid, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.get_one_note(id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("failed to get note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get note").into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/notes/create",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse,
            headers(("Location" = String, description = "URL of the created note"))),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    JsonBody(payload): JsonBody<NoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(note) => {
            let location = format!("{NOTES_PATH}/{}", note.id);
            (StatusCode::CREATED, [(header::LOCATION, location)], Json(note)).into_response()
        }
        Err(e) => {
            tracing::error!("failed to create note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create note").into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = Uuid, Path, description = "Note ID")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<NoteRequest>,
) -> Response {
    match service.update_note(id, payload).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("failed to update note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update note").into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = Uuid, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted, returns the removed note", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<Uuid>,
) -> Response {
    match service.delete_note(id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("failed to delete note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete note").into_response()
        }
    }
}
