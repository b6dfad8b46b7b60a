//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use gazette_core::domain::{Category, Post, PostImage, PostStatus, Tag, User};
use gazette_core::error::RepoError;
use gazette_core::ports::{
    CategoryRepository, PostFilter, PostImageRepository, PostRepository, TagRepository,
    UserRepository,
};
use gazette_core::slug::SlugLookup;

use super::entity::{category, post, post_image, post_tag, tag, user};

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn save_err(e: sea_orm::DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// Escape LIKE wildcards in user-supplied search terms.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// WHERE clause for the public post listing: always published-only, plus
/// any supplied filters ANDed together. Unknown category/tag slugs match
/// nothing rather than erroring.
fn published_condition(filter: &PostFilter) -> Condition {
    let mut cond =
        Condition::all().add(post::Column::Status.eq(PostStatus::Published.as_str()));

    if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        cond = cond.add(
            Condition::any()
                .add(Expr::col((post::Entity, post::Column::Title)).ilike(pattern.clone()))
                .add(Expr::col((post::Entity, post::Column::Content)).ilike(pattern)),
        );
    }

    if let Some(slug) = filter.category.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(
            post::Column::CategoryId.in_subquery(
                Query::select()
                    .column(category::Column::Id)
                    .from(category::Entity)
                    .and_where(Expr::col(category::Column::Slug).eq(slug))
                    .to_owned(),
            ),
        );
    }

    if let Some(slug) = filter.tag.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_tag::Column::PostId)
                    .from(post_tag::Entity)
                    .inner_join(
                        tag::Entity,
                        Expr::col((tag::Entity, tag::Column::Id))
                            .equals((post_tag::Entity, post_tag::Column::TagId)),
                    )
                    .and_where(Expr::col((tag::Entity, tag::Column::Slug)).eq(slug))
                    .to_owned(),
            ),
        );
    }

    cond
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// PostgreSQL author repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, mut user: User) -> Result<User, RepoError> {
        let exists = user::Entity::find_by_id(user.id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        if exists {
            user.updated_at = chrono::Utc::now();
            let active: user::ActiveModel = user.clone().into();
            active.update(&self.db).await.map_err(save_err)?;
        } else {
            let active: user::ActiveModel = user.clone().into();
            active.insert(&self.db).await.map_err(save_err)?;
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlugLookup for PostgresCategoryRepository {
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError> {
        let count = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(query_err)?;

        Ok(count > 0)
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let exists = category::Entity::find_by_id(category.id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let active: category::ActiveModel = category.clone().into();
        if exists {
            active.update(&self.db).await.map_err(save_err)?;
        } else {
            active.insert(&self.db).await.map_err(save_err)?;
        }

        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Referencing posts fall back to no category via the SET NULL
        // foreign key.
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// PostgreSQL tag repository.
pub struct PostgresTagRepository {
    db: DbConn,
}

impl PostgresTagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlugLookup for PostgresTagRepository {
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError> {
        let count = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(query_err)?;

        Ok(count > 0)
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        let result = tag::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let result = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let result = tag::Entity::find()
            .filter(
                tag::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::TagId)
                        .from(post_tag::Entity)
                        .and_where(Expr::col(post_tag::Column::PostId).eq(post_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let exists = tag::Entity::find_by_id(tag.id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let active: tag::ActiveModel = tag.clone().into();
        if exists {
            active.update(&self.db).await.map_err(save_err)?;
        } else {
            active.insert(&self.db).await.map_err(save_err)?;
        }

        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Associations go with the tag (CASCADE on post_tags); posts stay.
        let result = tag::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// PostgreSQL post repository - the content query surface.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlugLookup for PostgresPostRepository {
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError> {
        let count = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(query_err)?;

        Ok(count > 0)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn count_published(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        post::Entity::find()
            .filter(published_condition(filter))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn list_published(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(published_condition(filter))
            .order_by_desc(post::Column::PublishedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn related(&self, post_ref: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        let mut query = post::Entity::find()
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .filter(post::Column::Id.ne(post_ref.id));

        if let Some(category_id) = post_ref.category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }

        let result = query
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        // Single atomic UPDATE; concurrent reads cannot lose counts, and
        // updated_at stays untouched.
        let result = post::Entity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if tag_ids.is_empty() {
            return Ok(());
        }

        let links = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(*tag_id),
        });
        post_tag::Entity::insert_many(links)
            .exec(&self.db)
            .await
            .map_err(save_err)?;

        Ok(())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let exists = post::Entity::find_by_id(post.id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        if exists {
            post.updated_at = chrono::Utc::now();
            let active: post::ActiveModel = post.clone().into();
            active.update(&self.db).await.map_err(save_err)?;
        } else {
            let active: post::ActiveModel = post.clone().into();
            active.insert(&self.db).await.map_err(save_err)?;
        }

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Images and tag associations go with the post (CASCADE).
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Post images
// ---------------------------------------------------------------------------

/// PostgreSQL post image repository.
pub struct PostgresPostImageRepository {
    db: DbConn,
}

impl PostgresPostImageRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostImageRepository for PostgresPostImageRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostImage>, RepoError> {
        let result = post_image::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>, RepoError> {
        let result = post_image::Entity::find()
            .filter(post_image::Column::PostId.eq(post_id))
            .order_by_asc(post_image::Column::Order)
            .order_by_asc(post_image::Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, image: PostImage) -> Result<PostImage, RepoError> {
        let exists = post_image::Entity::find_by_id(image.id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let active: post_image::ActiveModel = image.clone().into();
        if exists {
            active.update(&self.db).await.map_err(save_err)?;
        } else {
            active.insert(&self.db).await.map_err(save_err)?;
        }

        Ok(image)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = post_image::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
