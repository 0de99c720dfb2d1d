//! `/books` and `/magazines`: one generic implementation, thin per-kind
//! handlers for routing and OpenAPI.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use axum_helpers::{
    AppError, UuidPath,
    errors::responses::{
        BadGatewayResponse, BadRequestResponse, BadRequestUuidResponse, InternalServerErrorResponse,
        InvalidJsonResponse, NotAvailableResponse, NotFoundResponse,
    },
};
use domain_items::{Book, Item, ItemCatalogue, Magazine};
use domain_users::{ProfileSection, UserError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use super::response::Envelope;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_books, upsert_book, swap_book, list_magazines, upsert_magazine, swap_magazine),
    components(
        schemas(Book, Magazine, domain_items::ItemStatus),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            NotFoundResponse,
            NotAvailableResponse,
            InvalidJsonResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "books", description = "Swappable books"),
        (name = "magazines", description = "Swappable magazines")
    )
)]
pub struct ItemsApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/books", get(list_books).post(upsert_book))
        .route("/books/{id}", post(swap_book))
        .route("/magazines", get(list_magazines).post(upsert_magazine))
        .route("/magazines/{id}", post(swap_magazine))
        .with_state(state)
}

/// Item kinds served over HTTP.
pub trait ServedKind: ProfileSection {
    fn catalogue(state: &AppState) -> &Arc<dyn ItemCatalogue<Self>>;
}

impl ServedKind for Book {
    fn catalogue(state: &AppState) -> &Arc<dyn ItemCatalogue<Self>> {
        &state.books
    }
}

impl ServedKind for Magazine {
    fn catalogue(state: &AppState) -> &Arc<dyn ItemCatalogue<Self>> {
        &state.magazines
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SwapParams {
    /// Id of the user receiving the item
    #[serde(default)]
    pub user: String,
}

/// Fails with 400 unless `id` names a stored user.
pub(crate) async fn require_user(state: &AppState, id: Uuid) -> Result<(), AppError> {
    match state.users.exists(id).await {
        Ok(()) => Ok(()),
        Err(UserError::NotFound(_)) => Err(AppError::BadRequest(format!("User {} does not exist", id))),
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn list<K: ServedKind>(state: &AppState) -> Result<Json<Envelope<K>>, AppError> {
    let items = K::catalogue(state).list().await?;
    Ok(Json(Envelope::items(items)))
}

async fn upsert<K: ServedKind>(
    state: &AppState,
    payload: Result<Json<Item<K>>, JsonRejection>,
) -> Result<Json<Envelope<K>>, AppError> {
    let Json(item) = payload?;

    if item.name.trim().is_empty() {
        return Err(AppError::BadRequest("Item name must not be empty".to_string()));
    }
    if let Some(owner) = item.owner_id.filter(|owner| !owner.is_nil()) {
        require_user(state, owner).await?;
    }

    let saved = K::catalogue(state).upsert(item).await?;
    Ok(Json(Envelope::items(vec![saved])))
}

async fn swap<K: ServedKind>(
    state: &AppState,
    id: Uuid,
    params: SwapParams,
) -> Result<Json<Envelope<K>>, AppError> {
    let user_id = Uuid::parse_str(params.user.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid user id '{}'", params.user)))?;
    require_user(state, user_id).await?;

    K::catalogue(state).swap(id, user_id).await?;

    let profile = state.users.get(user_id).await?;
    let (user, items) = K::into_section(profile);
    Ok(Json(Envelope::profile(user, items)))
}

/// List available books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Available books as `items`", body = serde_json::Value),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_books(State(state): State<AppState>) -> Result<Json<Envelope<Book>>, AppError> {
    list(&state).await
}

/// Create or update a book
///
/// A book whose id does not resolve is created as `AVAILABLE` with a fresh id.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Stored book as the single entry of `items`", body = serde_json::Value),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = InvalidJsonResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upsert_book(
    State(state): State<AppState>,
    payload: Result<Json<Item<Book>>, JsonRejection>,
) -> Result<Json<Envelope<Book>>, AppError> {
    upsert(&state, payload).await
}

/// Swap a book to another user
#[utoipa::path(
    post,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID"),
        SwapParams
    ),
    responses(
        (status = 200, description = "Receiving user and the books they now own", body = serde_json::Value),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = NotAvailableResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn swap_book(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    Query(params): Query<SwapParams>,
) -> Result<Json<Envelope<Book>>, AppError> {
    swap(&state, id, params).await
}

/// List available magazines
#[utoipa::path(
    get,
    path = "/magazines",
    tag = "magazines",
    responses(
        (status = 200, description = "Available magazines as `items`", body = serde_json::Value),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_magazines(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Magazine>>, AppError> {
    list(&state).await
}

/// Create or update a magazine
#[utoipa::path(
    post,
    path = "/magazines",
    tag = "magazines",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Stored magazine as the single entry of `items`", body = serde_json::Value),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = InvalidJsonResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upsert_magazine(
    State(state): State<AppState>,
    payload: Result<Json<Item<Magazine>>, JsonRejection>,
) -> Result<Json<Envelope<Magazine>>, AppError> {
    upsert(&state, payload).await
}

/// Swap a magazine to another user
#[utoipa::path(
    post,
    path = "/magazines/{id}",
    tag = "magazines",
    params(
        ("id" = Uuid, Path, description = "Magazine ID"),
        SwapParams
    ),
    responses(
        (status = 200, description = "Receiving user and the magazines they now own", body = serde_json::Value),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = NotAvailableResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn swap_magazine(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    Query(params): Query<SwapParams>,
) -> Result<Json<Envelope<Magazine>>, AppError> {
    swap(&state, id, params).await
}
