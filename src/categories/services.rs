use tracing::info;
use uuid::Uuid;

use super::repo_types::Category;
use crate::{error::CatalogError, recipes::repo_types::Recipe, storage::JsonStore};

fn clean_name(name: Option<&str>) -> Result<String, CatalogError> {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_owned()),
        _ => Err(CatalogError::Validation(
            "name must be a non-empty field".into(),
        )),
    }
}

pub async fn create_category(
    categories: &JsonStore<Category>,
    name: Option<&str>,
) -> Result<Category, CatalogError> {
    let category = Category {
        id: Uuid::new_v4(),
        name: clean_name(name)?,
    };

    let mut txn = categories.begin().await;
    txn.items_mut().push(category.clone());
    txn.commit().await?;

    info!(category_id = %category.id, name = %category.name, "category created");
    Ok(category)
}

pub async fn edit_category(
    categories: &JsonStore<Category>,
    id: Uuid,
    name: Option<&str>,
) -> Result<Category, CatalogError> {
    let name = clean_name(name)?;

    let mut txn = categories.begin().await;
    let category = txn
        .items_mut()
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(CatalogError::NotFound("category"))?;
    category.name = name;
    let updated = category.clone();
    txn.commit().await?;

    info!(category_id = %id, "category renamed");
    Ok(updated)
}

/// Remove a category and strip its id from every recipe.
pub async fn delete_category(
    categories: &JsonStore<Category>,
    recipes: &JsonStore<Recipe>,
    id: Uuid,
) -> Result<Category, CatalogError> {
    // Lock order: categories, then recipes.
    let mut cat_txn = categories.begin().await;
    let pos = cat_txn
        .items()
        .iter()
        .position(|c| c.id == id)
        .ok_or(CatalogError::NotFound("category"))?;
    let removed = cat_txn.items_mut().remove(pos);

    let mut recipe_txn = recipes.begin().await;
    let mut touched = 0usize;
    for recipe in recipe_txn.items_mut().iter_mut() {
        let before = recipe.categories.len();
        recipe.categories.retain(|c| *c != id);
        if recipe.categories.len() != before {
            touched += 1;
        }
    }

    // On disk, recipes never reference a category that is gone.
    recipe_txn.commit().await?;
    cat_txn.commit().await?;

    info!(category_id = %id, recipes_updated = touched, "category deleted");
    Ok(removed)
}
