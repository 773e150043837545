use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::CategoryRequest,
    repo_types::Category,
    services::{create_category, delete_category, edit_category},
};
use crate::{auth::AuthUser, error::CatalogError, state::AppState};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create))
        .route("/categories/:id", put(edit).delete(delete))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.categories.all().await)
}

#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>, CatalogError> {
    let category = create_category(&state.categories, body.name.as_deref()).await?;
    Ok(Json(category))
}

#[instrument(skip(state, body))]
pub async fn edit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>, CatalogError> {
    let category = edit_category(&state.categories, id, body.name.as_deref()).await?;
    Ok(Json(category))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, CatalogError> {
    let category = delete_category(&state.categories, &state.recipes, id).await?;
    Ok(Json(category))
}
