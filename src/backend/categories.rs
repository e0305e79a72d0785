//! Article categories from the category manager function, with a
//! built-in fallback list.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::BackendClient;

/// Name of the category function.
pub const CATEGORY_FUNCTION: &str = "category-manager";

/// An article category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Numeric id referenced by `Article::category_id`.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// URL-safe name.
    pub slug: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Badge colour, `#RRGGBB`.
    #[serde(default)]
    pub color_code: Option<String>,
    /// Whether the category is offered.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Display order.
    #[serde(default)]
    pub sort_order: u32,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CategoryPayload {
    #[serde(default)]
    categories: Vec<Category>,
}

/// The seven built-in categories used when the backend is unavailable.
pub fn default_categories() -> Vec<Category> {
    [
        (1, "AI Regulation", "ai-regulation", "Government and regulatory news", "#DC2626"),
        (2, "AI Startups", "ai-startups", "Startup announcements and news", "#16A34A"),
        (3, "AI Tools", "ai-tools", "New AI tools and platforms", "#3B82F6"),
        (4, "AI Ethics", "ai-ethics", "AI ethics and safety discussions", "#7C3AED"),
        (5, "Funding", "funding", "Investment and funding news", "#059669"),
        (6, "Policy", "policy", "AI policy and governance", "#D97706"),
        (7, "Product Launches", "product-launches", "New product releases", "#9333EA"),
    ]
    .into_iter()
    .map(|(id, name, slug, description, color)| Category {
        id,
        name: name.into(),
        slug: slug.into(),
        description: description.into(),
        color_code: Some(color.into()),
        is_active: true,
        sort_order: id,
    })
    .collect()
}

/// Look up the display name for `id`.
pub fn category_name(categories: &[Category], id: u32) -> Option<&str> {
    categories
        .iter()
        .find(|category| category.id == id)
        .map(|category| category.name.as_str())
}

/// Client for the category function.
#[derive(Debug, Clone)]
pub struct CategoryService {
    client: BackendClient,
}

impl CategoryService {
    /// Service over `client`.
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Active categories in display order.
    ///
    /// Never fails: any error is logged and the built-in list returned.
    pub async fn list(&self) -> Vec<Category> {
        let body = json!({ "userId": self.client.session().user().map(|u| u.id) });
        match self
            .client
            .invoke::<_, CategoryPayload>(CATEGORY_FUNCTION, &body)
            .await
        {
            Ok(payload) => {
                let mut categories: Vec<Category> = payload
                    .categories
                    .into_iter()
                    .filter(|category| category.is_active)
                    .collect();
                categories.sort_by_key(|category| category.sort_order);
                categories
            }
            Err(err) => {
                tracing::warn!(error = %err, "category fetch failed, using defaults");
                default_categories()
            }
        }
    }
}
