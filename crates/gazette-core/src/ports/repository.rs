//! Repository ports - one trait per entity so any storage backend can
//! satisfy them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post, PostImage, Tag, User};
use crate::error::RepoError;
use crate::slug::SlugLookup;

/// Filter options for the public post listing.
///
/// Every field is optional; supplied fields combine with logical AND on
/// top of the always-applied `status = published` predicate. `category`
/// and `tag` hold slugs; an unknown slug simply matches nothing.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Case-insensitive substring match against title OR content.
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// Author repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn save(&self, user: User) -> Result<User, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: SlugLookup {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories, name-ordered.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn save(&self, category: Category) -> Result<Category, RepoError>;

    /// Delete the category. Referencing posts survive with their category
    /// cleared.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: SlugLookup {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// All tags, name-ordered.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;

    /// Tags attached to one post, name-ordered.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError>;

    /// Delete the tag and its post associations; posts persist.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Post repository - the content query surface.
#[async_trait]
pub trait PostRepository: SlugLookup {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Any status; used by the admin surface and slug probing.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Published posts only; the public detail path.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Number of published posts matching the filter.
    async fn count_published(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Published posts matching the filter, ordered by `published_at`
    /// descending, sliced by limit/offset.
    async fn list_published(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Up to `limit` other published posts, same category when the post
    /// has one, newest first.
    async fn related(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Atomically add 1 to the view counter. Touches nothing else,
    /// `updated_at` included.
    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError>;

    /// Admin listing for one author, any status, newest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Admin listing across all authors (superusers), any status,
    /// newest first.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Replace the post's tag set.
    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;

    /// Insert or update. Updating an existing post refreshes `updated_at`.
    async fn save(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete the post and, with it, its images and tag associations.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Post image repository.
#[async_trait]
pub trait PostImageRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostImage>, RepoError>;

    /// Images of one post in display order (`order`, then `uploaded_at`).
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>, RepoError>;

    async fn save(&self, image: PostImage) -> Result<PostImage, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
