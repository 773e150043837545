use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::RecipeRequest,
    repo_types::Recipe,
    services::{create_recipe, delete_recipe, edit_recipe},
};
use crate::{auth::AuthUser, error::CatalogError, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create))
        .route("/recipes/:id", put(edit).delete(delete))
}

#[instrument(skip(state))]
pub async fn list_recipes(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.recipes.all().await)
}

#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<Recipe>, CatalogError> {
    let recipe = create_recipe(&state.categories, &state.recipes, body).await?;
    Ok(Json(recipe))
}

#[instrument(skip(state, body))]
pub async fn edit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<Recipe>, CatalogError> {
    let recipe = edit_recipe(&state.categories, &state.recipes, id, body).await?;
    Ok(Json(recipe))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, CatalogError> {
    let recipe = delete_recipe(&state.recipes, id).await?;
    Ok(Json(recipe))
}
