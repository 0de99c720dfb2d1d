use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_helpers::{
    AppError, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use domain_items::{Book, Magazine};
use domain_users::User;
use utoipa::OpenApi;

use super::items::ServedKind;
use super::response::Envelope;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(upsert_user, user_books, user_magazines),
    components(
        schemas(User),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "users", description = "BookSwap users and what they own"))
)]
pub struct UsersApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(upsert_user))
        .route("/{id}/books", get(user_books))
        .route("/{id}/magazines", get(user_magazines))
        .with_state(state)
}

async fn owned<K: ServedKind>(
    state: &AppState,
    id: uuid::Uuid,
) -> Result<Json<Envelope<K>>, AppError> {
    let profile = state.users.get(id).await?;
    let (user, items) = K::into_section(profile);
    Ok(Json(Envelope::profile(user, items)))
}

/// Create or update a user
///
/// A user whose id does not resolve is created with a fresh id.
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    request_body = User,
    responses(
        (status = 200, description = "Stored user as `user`", body = serde_json::Value),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upsert_user(
    State(state): State<AppState>,
    ValidatedJson(user): ValidatedJson<User>,
) -> Result<Json<Envelope>, AppError> {
    let saved = state.users.upsert(user).await?;
    Ok(Json(Envelope::user(saved)))
}

/// A user and the books they own
#[utoipa::path(
    get,
    path = "/{id}/books",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "`user` plus owned books as `items`", body = serde_json::Value),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn user_books(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<Envelope<Book>>, AppError> {
    owned(&state, id).await
}

/// A user and the magazines they own
#[utoipa::path(
    get,
    path = "/{id}/magazines",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "`user` plus owned magazines as `items`", body = serde_json::Value),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn user_magazines(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<Envelope<Magazine>>, AppError> {
    owned(&state, id).await
}
