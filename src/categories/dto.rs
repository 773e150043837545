use serde::Deserialize;

/// Body of category create and edit requests.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
}
