use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gallery image attached to a post.
///
/// Owned by the post: deleting the post deletes its images. The `image`
/// field holds a storage path, never file bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostImage {
    pub id: Uuid,
    pub post_id: Uuid,
    pub image: String,
    pub caption: String,
    pub alt_text: String,
    pub order: i32,
    pub uploaded_at: DateTime<Utc>,
}

impl PostImage {
    pub fn new(post_id: Uuid, image: String, caption: String, alt_text: String, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            image,
            caption,
            alt_text,
            order,
            uploaded_at: Utc::now(),
        }
    }

    /// Alt text falls back to the caption, then to a line naming the post.
    pub fn resolve_alt_text(alt_text: Option<String>, caption: &str, post_title: &str) -> String {
        match alt_text {
            Some(alt) if !alt.trim().is_empty() => alt,
            _ if !caption.trim().is_empty() => caption.to_string(),
            _ => format!("Image for {post_title}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alt_text_explicit_wins() {
        let alt = PostImage::resolve_alt_text(Some("A lake".into()), "Caption", "Post");
        assert_eq!(alt, "A lake");
    }

    #[test]
    fn test_alt_text_falls_back_to_caption() {
        let alt = PostImage::resolve_alt_text(None, "Sunset over the fjord", "Post");
        assert_eq!(alt, "Sunset over the fjord");

        let alt = PostImage::resolve_alt_text(Some("  ".into()), "Sunset", "Post");
        assert_eq!(alt, "Sunset");
    }

    #[test]
    fn test_alt_text_falls_back_to_title() {
        let alt = PostImage::resolve_alt_text(None, "", "Hello World");
        assert_eq!(alt, "Image for Hello World");
    }
}
