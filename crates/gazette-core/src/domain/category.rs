use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - groups posts under a shared topic.
///
/// Referenced (not owned) by posts: deleting a category leaves its posts
/// in place with no category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            description,
            created_at: Utc::now(),
        }
    }
}
