use tracing::info;
use uuid::Uuid;

use super::{dto::RecipeRequest, repo_types::Recipe};
use crate::{categories::repo_types::Category, error::CatalogError, storage::JsonStore};

/// Validated recipe content, ready to be stored under some id.
#[derive(Debug, PartialEq, Eq)]
struct RecipeFields {
    title: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    categories: Vec<Uuid>,
}

fn non_blank(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_owned())
        .filter(|e| !e.is_empty())
        .collect()
}

fn validate(req: RecipeRequest, known: &[Category]) -> Result<RecipeFields, CatalogError> {
    let title = req.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(CatalogError::Validation(
            "title must be a non-empty field".into(),
        ));
    }

    let instructions = non_blank(req.instructions);
    if instructions.is_empty() {
        return Err(CatalogError::Validation(
            "the recipe must have a non-zero number of instructions".into(),
        ));
    }

    let ingredients = non_blank(req.ingredients);
    if ingredients.is_empty() {
        return Err(CatalogError::Validation(
            "the recipe must have a non-zero number of ingredients".into(),
        ));
    }

    if !req
        .categories
        .iter()
        .all(|id| known.iter().any(|c| c.id == *id))
    {
        return Err(CatalogError::Validation(
            "the recipe must have real and existing categories".into(),
        ));
    }

    Ok(RecipeFields {
        title: title.to_owned(),
        ingredients,
        instructions,
        categories: req.categories,
    })
}

pub async fn create_recipe(
    categories: &JsonStore<Category>,
    recipes: &JsonStore<Recipe>,
    req: RecipeRequest,
) -> Result<Recipe, CatalogError> {
    // Hold the categories lock so none can vanish before the recipe is stored.
    let cat_txn = categories.begin().await;
    let fields = validate(req, cat_txn.items())?;

    let recipe = Recipe {
        id: Uuid::new_v4(),
        title: fields.title,
        ingredients: fields.ingredients,
        instructions: fields.instructions,
        categories: fields.categories,
    };

    let mut txn = recipes.begin().await;
    txn.items_mut().push(recipe.clone());
    txn.commit().await?;
    drop(cat_txn);

    info!(recipe_id = %recipe.id, title = %recipe.title, "recipe created");
    Ok(recipe)
}

pub async fn edit_recipe(
    categories: &JsonStore<Category>,
    recipes: &JsonStore<Recipe>,
    id: Uuid,
    req: RecipeRequest,
) -> Result<Recipe, CatalogError> {
    let cat_txn = categories.begin().await;
    let fields = validate(req, cat_txn.items())?;

    let mut txn = recipes.begin().await;
    let recipe = txn
        .items_mut()
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(CatalogError::NotFound("recipe"))?;
    recipe.title = fields.title;
    recipe.ingredients = fields.ingredients;
    recipe.instructions = fields.instructions;
    recipe.categories = fields.categories;
    let updated = recipe.clone();
    txn.commit().await?;
    drop(cat_txn);

    info!(recipe_id = %id, "recipe updated");
    Ok(updated)
}

pub async fn delete_recipe(recipes: &JsonStore<Recipe>, id: Uuid) -> Result<Recipe, CatalogError> {
    let mut txn = recipes.begin().await;
    let pos = txn
        .items()
        .iter()
        .position(|r| r.id == id)
        .ok_or(CatalogError::NotFound("recipe"))?;
    let removed = txn.items_mut().remove(pos);
    txn.commit().await?;

    info!(recipe_id = %id, "recipe deleted");
    Ok(removed)
}
