//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::PageMeta;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request to register a new author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing an author's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Request to create a category. Slug is derived from the name when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Partial category update. An explicit empty slug re-derives it from the
/// current name; an absent slug leaves it untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Request to create a post. The author comes from the access token, the
/// slug from the title unless supplied, the status defaults to draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    pub status: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
}

/// Partial post update. Absent fields are left untouched; the slug is never
/// re-derived from an edited title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub status: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
}

/// One post in a listing: excerpted, with its category resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub status: String,
    pub category: Option<CategoryResponse>,
    pub featured_image: Option<String>,
    pub views: i64,
    pub published_at: DateTime<Utc>,
}

/// Full post render context for the detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: String,
    pub author: String,
    pub category: Option<CategoryResponse>,
    pub tags: Vec<TagResponse>,
    pub images: Vec<PostImageResponse>,
    pub meta_description: String,
    pub featured_image: Option<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

/// Public list page: one page of posts plus the navigation sets and the
/// echoed active filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostListItem>,
    pub page: PageMeta,
    pub categories: Vec<CategoryResponse>,
    pub tags: Vec<TagResponse>,
    pub search: Option<String>,
    pub current_category: Option<String>,
    pub current_tag: Option<String>,
}

/// Public detail page: the post and up to three related posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub related_posts: Vec<PostListItem>,
}

/// Category landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetailResponse {
    pub category: CategoryResponse,
    pub posts: Vec<PostListItem>,
    pub page: PageMeta,
}

/// Tag landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDetailResponse {
    pub tag: TagResponse,
    pub posts: Vec<PostListItem>,
    pub page: PageMeta,
}

// ---------------------------------------------------------------------------
// Post images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostImageResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub image: String,
    pub caption: String,
    pub alt_text: String,
    pub order: i32,
    pub uploaded_at: DateTime<Utc>,
}

/// Request to attach an image to a post. `image` is a storage path, not
/// file bytes. Alt text falls back to the caption, then to a line naming
/// the post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostImageRequest {
    pub image: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostImageRequest {
    pub image: Option<String>,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub order: Option<i32>,
}
