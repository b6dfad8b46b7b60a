use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::excerpt;

/// Publication status gating public visibility of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(()),
        }
    }
}

/// Post entity - a blog article authored by a user.
///
/// The slug is assigned once at creation and never regenerated; a title
/// edit leaves the slug stale on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub status: PostStatus,
    pub meta_description: String,
    pub featured_image: Option<String>,
    /// Monotonic view counter, incremented on each public detail read.
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft post with generated ID and timestamps.
    pub fn new(author_id: Uuid, title: String, slug: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            content,
            category_id: None,
            status: PostStatus::Draft,
            meta_description: String::new(),
            featured_image: None,
            views: 0,
            created_at: now,
            updated_at: now,
            published_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Markup-stripped preview of the content, truncated at a word boundary.
    pub fn excerpt(&self, length: usize) -> String {
        excerpt::excerpt(&self.content, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!("draft".parse::<PostStatus>(), Ok(PostStatus::Draft));
        assert_eq!("published".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert!("archived".parse::<PostStatus>().is_err());
        assert_eq!(PostStatus::Published.as_str(), "published");
    }

    #[test]
    fn test_new_post_is_draft() {
        let post = Post::new(
            Uuid::new_v4(),
            "Title".to_string(),
            "title".to_string(),
            "Content".to_string(),
        );
        assert_eq!(post.status, PostStatus::Draft);
        assert!(!post.is_published());
        assert_eq!(post.views, 0);
    }
}
