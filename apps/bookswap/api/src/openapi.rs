use axum_helpers::ErrorResponse;
use utoipa::OpenApi;

use crate::api::{index::IndexApiDoc, items::ItemsApiDoc, users::UsersApiDoc};

/// Combined OpenAPI document served by the docs UIs.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookSwap API",
        description = "Swap books and magazines between users"
    ),
    components(schemas(ErrorResponse)),
    nest(
        (path = "/api", api = IndexApiDoc),
        (path = "/api", api = ItemsApiDoc),
        (path = "/api/users", api = UsersApiDoc)
    )
)]
pub struct ApiDoc;
