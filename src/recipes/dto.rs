use serde::Deserialize;
use uuid::Uuid;

/// Body of recipe create and edit requests.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
}
