use axum::{Json, extract::State};
use axum_helpers::{AppError, errors::responses::InternalServerErrorResponse};
use domain_items::Book;
use utoipa::OpenApi;

use super::items::list;
use super::response::Envelope;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(index), tags((name = "index", description = "Service landing page")))]
pub struct IndexApiDoc;

/// Welcome message and the books currently available
#[utoipa::path(
    get,
    path = "/",
    tag = "index",
    responses(
        (status = 200, description = "`message` plus available books as `items`", body = serde_json::Value),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Envelope<Book>>, AppError> {
    let Json(envelope) = list::<Book>(&state).await?;
    Ok(Json(envelope.with_message("Welcome to the BookSwap service!")))
}
