//! In-memory store - repository implementations over shared hash maps.
//!
//! Serves two purposes: the fallback mode of the API server when no
//! database is configured, and the behavioral test bed for the repository
//! contracts. Relational behavior the schema would provide (unique
//! name/slug constraints, SET NULL on category delete, CASCADE on post
//! delete) is emulated here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use gazette_core::domain::{Category, Post, PostImage, Tag, User};
use gazette_core::error::RepoError;
use gazette_core::ports::{
    CategoryRepository, PostFilter, PostImageRepository, PostRepository, TagRepository,
    UserRepository,
};
use gazette_core::slug::SlugLookup;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    tags: HashMap<Uuid, Tag>,
    posts: HashMap<Uuid, Post>,
    images: HashMap<Uuid, PostImage>,
    /// (post_id, tag_id) association rows.
    post_tags: Vec<(Uuid, Uuid)>,
}

impl Tables {
    fn post_matches(&self, post: &Post, filter: &PostFilter) -> bool {
        if !post.is_published() {
            return false;
        }

        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            let needle = term.to_lowercase();
            if !post.title.to_lowercase().contains(&needle)
                && !post.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(slug) = filter.category.as_deref().filter(|s| !s.is_empty()) {
            let category_id = self.categories.values().find(|c| c.slug == slug).map(|c| c.id);
            match category_id {
                Some(id) if post.category_id == Some(id) => {}
                _ => return false,
            }
        }

        if let Some(slug) = filter.tag.as_deref().filter(|s| !s.is_empty()) {
            let Some(tag_id) = self.tags.values().find(|t| t.slug == slug).map(|t| t.id) else {
                return false;
            };
            if !self
                .post_tags
                .iter()
                .any(|(p, t)| *p == post.id && *t == tag_id)
            {
                return false;
            }
        }

        true
    }
}

/// Shared in-memory tables, handed out as per-entity repositories.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn images(&self) -> InMemoryPostImageRepository {
        InMemoryPostImageRepository {
            tables: self.tables.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save(&self, mut user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        let conflict = tables.users.values().any(|other| {
            other.id != user.id && (other.email == user.email || other.username == user.username)
        });
        if conflict {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        if tables.users.contains_key(&user.id) {
            user.updated_at = Utc::now();
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Posts go with their author.
        let orphaned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in orphaned {
            tables.posts.remove(&post_id);
            tables.images.retain(|_, img| img.post_id != post_id);
            tables.post_tags.retain(|(p, _)| *p != post_id);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub struct InMemoryCategoryRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl SlugLookup for InMemoryCategoryRepository {
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .categories
            .values()
            .any(|c| c.slug == slug))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> =
            self.tables.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;

        let conflict = tables.categories.values().any(|other| {
            other.id != category.id
                && (other.name == category.name || other.slug == category.slug)
        });
        if conflict {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // SET NULL semantics: posts survive without a category.
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

pub struct InMemoryTagRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl SlugLookup for InMemoryTagRepository {
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.tags.values().any(|t| t.slug == slug))
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .tags
            .values()
            .find(|t| t.slug == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags: Vec<Tag> = self.tables.read().await.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, t)| tables.tags.get(t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;

        let conflict = tables
            .tags
            .values()
            .any(|other| other.id != tag.id && (other.name == tag.name || other.slug == tag.slug));
        if conflict {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Associations go with the tag; posts stay.
        tables.post_tags.retain(|(_, t)| *t != id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl SlugLookup for InMemoryPostRepository {
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.posts.values().any(|p| p.slug == slug))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .posts
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .posts
            .values()
            .find(|p| p.slug == slug && p.is_published())
            .cloned())
    }

    async fn count_published(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| tables.post_matches(p, filter))
            .count() as u64)
    }

    async fn list_published(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| tables.post_matches(p, filter))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn related(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut related: Vec<Post> = tables
            .posts
            .values()
            .filter(|other| other.is_published() && other.id != post.id)
            .filter(|other| match post.category_id {
                Some(category_id) => other.category_id == Some(category_id),
                None => true,
            })
            .cloned()
            .collect();
        related.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        related.truncate(limit as usize);
        Ok(related)
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        // Under the write lock the increment cannot lose updates, and
        // updated_at is deliberately left alone.
        post.views += 1;
        Ok(())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .tables
            .read()
            .await
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.tables.read().await.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.post_tags.retain(|(p, _)| *p != post_id);
        for tag_id in tag_ids {
            if !tables.post_tags.contains(&(post_id, *tag_id)) {
                tables.post_tags.push((post_id, *tag_id));
            }
        }
        Ok(())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        let conflict = tables
            .posts
            .values()
            .any(|other| other.id != post.id && other.slug == post.slug);
        if conflict {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        if tables.posts.contains_key(&post.id) {
            post.updated_at = Utc::now();
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // CASCADE semantics: images and tag links go with the post.
        tables.images.retain(|_, img| img.post_id != id);
        tables.post_tags.retain(|(p, _)| *p != id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Post images
// ---------------------------------------------------------------------------

pub struct InMemoryPostImageRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl PostImageRepository for InMemoryPostImageRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostImage>, RepoError> {
        Ok(self.tables.read().await.images.get(&id).cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>, RepoError> {
        let mut images: Vec<PostImage> = self
            .tables
            .read()
            .await
            .images
            .values()
            .filter(|img| img.post_id == post_id)
            .cloned()
            .collect();
        images.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.uploaded_at.cmp(&b.uploaded_at))
        });
        Ok(images)
    }

    async fn save(&self, image: PostImage) -> Result<PostImage, RepoError> {
        let mut tables = self.tables.write().await;
        tables.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.images.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use gazette_core::domain::PostStatus;
    use gazette_core::pagination::{DEFAULT_PAGE_SIZE, Paginator};
    use gazette_core::slug::unique_slug;

    use super::*;

    async fn seed_author(store: &InMemoryStore) -> User {
        store
            .users()
            .save(User::new(
                "author@example.com".to_string(),
                "author".to_string(),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }

    fn published(author: &User, title: &str, slug: &str) -> Post {
        let mut post = Post::new(
            author.id,
            title.to_string(),
            slug.to_string(),
            format!("Content of {title}"),
        );
        post.status = PostStatus::Published;
        post
    }

    #[tokio::test]
    async fn test_drafts_never_appear_on_public_paths() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        posts
            .save(Post::new(
                author.id,
                "Draft".to_string(),
                "draft".to_string(),
                "Hidden".to_string(),
            ))
            .await
            .unwrap();
        posts
            .save(published(&author, "Public", "public"))
            .await
            .unwrap();

        let listed = posts
            .list_published(&PostFilter::default(), 100, 0)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slug, "public");

        assert!(posts.find_published_by_slug("draft").await.unwrap().is_none());
        assert!(posts.find_by_slug("draft").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_filters_combine_with_and() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        let rust = store
            .categories()
            .save(Category::new(
                "Rust".to_string(),
                "rust".to_string(),
                String::new(),
            ))
            .await
            .unwrap();
        let tokio_tag = store
            .tags()
            .save(Tag::new("Tokio".to_string(), "tokio".to_string()))
            .await
            .unwrap();

        let mut matching = published(&author, "Async Rust in practice", "async-rust");
        matching.category_id = Some(rust.id);
        let matching = posts.save(matching).await.unwrap();
        posts.set_tags(matching.id, &[tokio_tag.id]).await.unwrap();

        let mut same_category = published(&author, "Borrow checker tips", "borrow-checker");
        same_category.category_id = Some(rust.id);
        posts.save(same_category).await.unwrap();

        posts
            .save(published(&author, "Async cooking", "async-cooking"))
            .await
            .unwrap();

        let by_category = PostFilter {
            category: Some("rust".to_string()),
            ..Default::default()
        };
        assert_eq!(posts.count_published(&by_category).await.unwrap(), 2);

        let by_tag = PostFilter {
            tag: Some("tokio".to_string()),
            ..Default::default()
        };
        let tagged = posts.list_published(&by_tag, 100, 0).await.unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].slug, "async-rust");

        let by_search = PostFilter {
            search: Some("ASYNC".to_string()),
            ..Default::default()
        };
        assert_eq!(posts.count_published(&by_search).await.unwrap(), 2);

        let combined = PostFilter {
            search: Some("async".to_string()),
            category: Some("rust".to_string()),
            tag: Some("tokio".to_string()),
        };
        let intersection = posts.list_published(&combined, 100, 0).await.unwrap();
        assert_eq!(intersection.len(), 1);
        assert_eq!(intersection[0].slug, "async-rust");
    }

    #[tokio::test]
    async fn test_unknown_filter_slugs_match_nothing() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();
        posts
            .save(published(&author, "Hello", "hello"))
            .await
            .unwrap();

        let unknown_category = PostFilter {
            category: Some("no-such-category".to_string()),
            ..Default::default()
        };
        assert_eq!(posts.count_published(&unknown_category).await.unwrap(), 0);

        let unknown_tag = PostFilter {
            tag: Some("no-such-tag".to_string()),
            ..Default::default()
        };
        assert_eq!(posts.count_published(&unknown_tag).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_listing_orders_by_publication_recency() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        for (i, slug) in ["oldest", "middle", "newest"].iter().enumerate() {
            let mut post = published(&author, slug, slug);
            post.published_at = Utc::now() + Duration::seconds(i as i64);
            posts.save(post).await.unwrap();
        }

        let listed = posts
            .list_published(&PostFilter::default(), 100, 0)
            .await
            .unwrap();
        let slugs: Vec<&str> = listed.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_pagination_of_thirteen_posts() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        for i in 0..13 {
            let mut post = published(&author, &format!("Post {i}"), &format!("post-{i}"));
            post.published_at = Utc::now() + Duration::seconds(i);
            posts.save(post).await.unwrap();
        }

        let total = posts.count_published(&PostFilter::default()).await.unwrap();
        assert_eq!(total, 13);

        let paginator = Paginator::new(total, DEFAULT_PAGE_SIZE);

        let first = paginator.resolve(Some("1"));
        let page_one = posts
            .list_published(&PostFilter::default(), first.page_size, first.offset())
            .await
            .unwrap();
        assert_eq!(page_one.len(), 6);

        let third = paginator.resolve(Some("3"));
        let page_three = posts
            .list_published(&PostFilter::default(), third.page_size, third.offset())
            .await
            .unwrap();
        assert_eq!(page_three.len(), 1);

        assert_eq!(paginator.resolve(Some("0")).number, 1);
        assert_eq!(paginator.resolve(Some("abc")).number, 1);
        assert_eq!(paginator.resolve(Some("99")).number, 3);
    }

    #[tokio::test]
    async fn test_view_counter_five_reads_add_five() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        let post = posts
            .save(published(&author, "Counted", "counted"))
            .await
            .unwrap();
        let updated_at_before = post.updated_at;

        for _ in 0..5 {
            let found = posts.find_published_by_slug("counted").await.unwrap();
            assert!(found.is_some());
            posts.increment_views(post.id).await.unwrap();
        }

        let counted = posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(counted.views, 5);
        // The counter bump must not masquerade as an edit.
        assert_eq!(counted.updated_at, updated_at_before);
    }

    #[tokio::test]
    async fn test_duplicate_titles_get_suffixed_slugs() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        let first_slug = unique_slug(&posts, "Hello World", "post").await.unwrap();
        assert_eq!(first_slug, "hello-world");
        posts
            .save(published(&author, "Hello World", &first_slug))
            .await
            .unwrap();

        let second_slug = unique_slug(&posts, "Hello World", "post").await.unwrap();
        assert_eq!(second_slug, "hello-world-2");
        posts
            .save(published(&author, "Hello World", &second_slug))
            .await
            .unwrap();

        // The unique constraint still backstops the policy.
        let clash = posts
            .save(published(&author, "Hello World", "hello-world"))
            .await;
        assert!(matches!(clash, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_category_delete_clears_post_reference() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();
        let categories = store.categories();

        let category = categories
            .save(Category::new(
                "News".to_string(),
                "news".to_string(),
                String::new(),
            ))
            .await
            .unwrap();

        let mut post = published(&author, "Categorized", "categorized");
        post.category_id = Some(category.id);
        let post = posts.save(post).await.unwrap();

        categories.delete(category.id).await.unwrap();

        let survivor = posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(survivor.category_id, None);
    }

    #[tokio::test]
    async fn test_post_delete_cascades_images_and_tag_links() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();
        let images = store.images();

        let tag = store
            .tags()
            .save(Tag::new("Photos".to_string(), "photos".to_string()))
            .await
            .unwrap();

        let post = posts
            .save(published(&author, "Gallery", "gallery"))
            .await
            .unwrap();
        posts.set_tags(post.id, &[tag.id]).await.unwrap();
        let image = images
            .save(PostImage::new(
                post.id,
                "blog/gallery/a.jpg".to_string(),
                "A".to_string(),
                "A".to_string(),
                0,
            ))
            .await
            .unwrap();

        posts.delete(post.id).await.unwrap();

        assert!(images.find_by_id(image.id).await.unwrap().is_none());
        assert!(store.tags().find_by_id(tag.id).await.unwrap().is_some());
        assert!(
            store
                .tags()
                .list_for_post(post.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_tag_delete_detaches_but_keeps_posts() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();
        let tags = store.tags();

        let tag = tags
            .save(Tag::new("Transient".to_string(), "transient".to_string()))
            .await
            .unwrap();
        let post = posts
            .save(published(&author, "Tagged", "tagged"))
            .await
            .unwrap();
        posts.set_tags(post.id, &[tag.id]).await.unwrap();

        tags.delete(tag.id).await.unwrap();

        assert!(posts.find_by_id(post.id).await.unwrap().is_some());
        assert!(tags.list_for_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_related_posts_prefer_same_category() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        let category = store
            .categories()
            .save(Category::new(
                "Travel".to_string(),
                "travel".to_string(),
                String::new(),
            ))
            .await
            .unwrap();

        let mut subject = published(&author, "Subject", "subject");
        subject.category_id = Some(category.id);
        let subject = posts.save(subject).await.unwrap();

        let mut sibling = published(&author, "Sibling", "sibling");
        sibling.category_id = Some(category.id);
        posts.save(sibling).await.unwrap();

        let mut hidden_sibling = Post::new(
            author.id,
            "Hidden".to_string(),
            "hidden".to_string(),
            "Draft".to_string(),
        );
        hidden_sibling.category_id = Some(category.id);
        posts.save(hidden_sibling).await.unwrap();

        posts
            .save(published(&author, "Unrelated", "unrelated"))
            .await
            .unwrap();

        let related = posts.related(&subject, 3).await.unwrap();
        let slugs: Vec<&str> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["sibling"]);
    }

    #[tokio::test]
    async fn test_post_save_refreshes_updated_at() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();

        let mut post = posts
            .save(published(&author, "Editable", "editable"))
            .await
            .unwrap();
        let before = post.updated_at;

        post.title = "Edited".to_string();
        let saved = posts.save(post).await.unwrap();

        assert!(saved.updated_at > before);
        // Slug untouched by the title edit.
        assert_eq!(saved.slug, "editable");
    }

    #[tokio::test]
    async fn test_duplicate_category_name_rejected() {
        let store = InMemoryStore::new();
        let categories = store.categories();

        categories
            .save(Category::new(
                "News".to_string(),
                "news".to_string(),
                String::new(),
            ))
            .await
            .unwrap();

        let duplicate = categories
            .save(Category::new(
                "News".to_string(),
                "news-2".to_string(),
                String::new(),
            ))
            .await;
        assert!(matches!(duplicate, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_image_display_ordering() {
        let store = InMemoryStore::new();
        let author = seed_author(&store).await;
        let posts = store.posts();
        let images = store.images();

        let post = posts
            .save(published(&author, "Gallery", "gallery"))
            .await
            .unwrap();

        for (order, name) in [(2, "last"), (0, "first"), (1, "second")] {
            images
                .save(PostImage::new(
                    post.id,
                    format!("blog/gallery/{name}.jpg"),
                    name.to_string(),
                    name.to_string(),
                    order,
                ))
                .await
                .unwrap();
        }

        let listed = images.list_for_post(post.id).await.unwrap();
        let captions: Vec<&str> = listed.iter().map(|i| i.caption.as_str()).collect();
        assert_eq!(captions, vec!["first", "second", "last"]);
    }
}
