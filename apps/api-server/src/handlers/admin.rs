//! Admin surface: author-scoped CRUD for posts, taxonomy and images.
//!
//! Every route requires a Bearer token. The author field is assigned from
//! the token identity on creation; non-superusers see only their own posts,
//! and foreign posts answer NotFound the way a scoped queryset would.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use gazette_core::DomainError;
use gazette_core::domain::{Category, Post, PostImage, PostStatus, Tag};
use gazette_core::ports::ROLE_ADMIN;
use gazette_core::slug::{slugify, unique_slug};
use gazette_shared::ApiResponse;
use gazette_shared::dto::{
    CreateCategoryRequest, CreatePostImageRequest, CreatePostRequest, CreateTagRequest,
    PostListItem, PostResponse, UpdateCategoryRequest, UpdatePostImageRequest, UpdatePostRequest,
    UpdateTagRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

use super::blog::{category_response, image_response, list_item, post_response, tag_response};

/// Resolve a post the caller is allowed to touch. A foreign post reads as
/// missing for non-superusers rather than revealing its existence.
async fn owned_post(state: &AppState, identity: &Identity, id: Uuid) -> Result<Post, AppError> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id.to_string()))?;

    if post.author_id != identity.user_id && !identity.has_role(ROLE_ADMIN) {
        return Err(AppError::NotFound(format!("post `{id}` not found")));
    }

    Ok(post)
}

fn parse_status(raw: Option<&str>) -> Result<Option<PostStatus>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown status `{s}`"))),
    }
}

/// An explicit slug must already be in slug form.
fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slugify(slug) != slug {
        return Err(AppError::BadRequest(format!("Invalid slug `{slug}`")));
    }
    Ok(())
}

/// Every referenced tag must exist; duplicates collapse.
async fn validate_tag_ids(state: &AppState, tag_ids: &[Uuid]) -> Result<Vec<Uuid>, AppError> {
    let mut validated = Vec::with_capacity(tag_ids.len());
    for tag_id in tag_ids {
        if state.tags.find_by_id(*tag_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("Unknown tag `{tag_id}`")));
        }
        if !validated.contains(tag_id) {
            validated.push(*tag_id);
        }
    }
    Ok(validated)
}

async fn validate_category_id(state: &AppState, category_id: Uuid) -> Result<(), AppError> {
    if state.categories.find_by_id(category_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "Unknown category `{category_id}`"
        )));
    }
    Ok(())
}

/// Assemble the full admin render context for one post.
async fn load_post_response(state: &AppState, post: &Post) -> Result<PostResponse, AppError> {
    let category = match post.category_id {
        Some(id) => state.categories.find_by_id(id).await?,
        None => None,
    };
    let tags = state.tags.list_for_post(post.id).await?;
    let images = state.images.list_for_post(post.id).await?;
    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();

    Ok(post_response(
        post,
        &author,
        category.as_ref(),
        &tags,
        &images,
    ))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// GET /api/admin/posts - the caller's posts, drafts included.
/// Superusers see every author's posts.
pub async fn list_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = if identity.has_role(ROLE_ADMIN) {
        state.posts.list_all().await?
    } else {
        state.posts.list_by_author(identity.user_id).await?
    };

    let mut items: Vec<PostListItem> = Vec::with_capacity(posts.len());
    for post in &posts {
        let category = match post.category_id {
            Some(id) => state.categories.find_by_id(id).await?,
            None => None,
        };
        items.push(list_item(post, category.as_ref()));
    }

    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/admin/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => {
            validate_slug(explicit)?;
            if state.posts.slug_taken(explicit).await? {
                return Err(AppError::Conflict(format!(
                    "Slug `{explicit}` is already in use"
                )));
            }
            explicit.to_string()
        }
        None => unique_slug(state.posts.as_ref(), &req.title, "post").await?,
    };

    let status = parse_status(req.status.as_deref())?.unwrap_or_default();
    if let Some(category_id) = req.category_id {
        validate_category_id(&state, category_id).await?;
    }
    let tag_ids = validate_tag_ids(&state, &req.tag_ids).await?;

    let mut post = Post::new(identity.user_id, req.title, slug, req.content);
    post.category_id = req.category_id;
    post.status = status;
    post.meta_description = req.meta_description.unwrap_or_default();
    post.featured_image = req.featured_image.filter(|s| !s.is_empty());

    let post = state.posts.save(post).await?;
    state.posts.set_tags(post.id, &tag_ids).await?;

    let response = load_post_response(&state, &post).await?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /api/admin/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;
    let response = load_post_response(&state, &post).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/admin/posts/{id}
///
/// Partial update. The slug is never re-derived from an edited title;
/// only an explicit slug in the request changes it.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let mut post = owned_post(&state, &identity, path.into_inner()).await?;
    let req = body.into_inner();

    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required".to_string()));
        }
        post.title = title;
    }
    if let Some(content) = req.content {
        if content.trim().is_empty() {
            return Err(AppError::BadRequest("Content is required".to_string()));
        }
        post.content = content;
    }
    if let Some(slug) = req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if slug != post.slug {
            validate_slug(slug)?;
            if state.posts.slug_taken(slug).await? {
                return Err(AppError::Conflict(format!("Slug `{slug}` is already in use")));
            }
            post.slug = slug.to_string();
        }
    }
    if let Some(category_id) = req.category_id {
        validate_category_id(&state, category_id).await?;
        post.category_id = Some(category_id);
    }
    if let Some(status) = parse_status(req.status.as_deref())? {
        post.status = status;
    }
    if let Some(meta_description) = req.meta_description {
        post.meta_description = meta_description;
    }
    if let Some(featured_image) = req.featured_image {
        post.featured_image = if featured_image.is_empty() {
            None
        } else {
            Some(featured_image)
        };
    }

    let post = state.posts.save(post).await?;

    if let Some(tag_ids) = req.tag_ids {
        let tag_ids = validate_tag_ids(&state, &tag_ids).await?;
        state.posts.set_tags(post.id, &tag_ids).await?;
    }

    let response = load_post_response(&state, &post).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /api/admin/posts/{id} - the post's images go with it.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;
    state.posts.delete(post.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Post deleted")))
}

// ---------------------------------------------------------------------------
// Post images
// ---------------------------------------------------------------------------

/// GET /api/admin/posts/{id}/images
pub async fn list_post_images(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;
    let images = state.images.list_for_post(post.id).await?;
    let response: Vec<_> = images.iter().map(image_response).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/admin/posts/{id}/images
pub async fn create_post_image(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreatePostImageRequest>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &identity, path.into_inner()).await?;
    let req = body.into_inner();

    if req.image.trim().is_empty() {
        return Err(AppError::BadRequest("Image path is required".to_string()));
    }

    let caption = req.caption.unwrap_or_default();
    let alt_text = PostImage::resolve_alt_text(req.alt_text, &caption, &post.title);
    let image = PostImage::new(
        post.id,
        req.image,
        caption,
        alt_text,
        req.order.unwrap_or(0),
    );

    let image = state.images.save(image).await?;
    Ok(HttpResponse::Created().json(image_response(&image)))
}

/// PUT /api/admin/images/{id}
pub async fn update_post_image(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostImageRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut image = state
        .images
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("image", id.to_string()))?;
    let post = owned_post(&state, &identity, image.post_id).await?;
    let req = body.into_inner();

    if let Some(path) = req.image {
        if path.trim().is_empty() {
            return Err(AppError::BadRequest("Image path is required".to_string()));
        }
        image.image = path;
    }
    if let Some(caption) = req.caption {
        image.caption = caption;
    }
    if let Some(alt_text) = req.alt_text {
        image.alt_text = alt_text;
    }
    if let Some(order) = req.order {
        image.order = order;
    }
    // Re-apply the fallback when the alt text ended up blank.
    if image.alt_text.trim().is_empty() {
        image.alt_text = PostImage::resolve_alt_text(None, &image.caption, &post.title);
    }

    let image = state.images.save(image).await?;
    Ok(HttpResponse::Ok().json(image_response(&image)))
}

/// DELETE /api/admin/images/{id}
pub async fn delete_post_image(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let image = state
        .images
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("image", id.to_string()))?;
    owned_post(&state, &identity, image.post_id).await?;

    state.images.delete(image.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Image deleted")))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => {
            validate_slug(explicit)?;
            if state.categories.slug_taken(explicit).await? {
                return Err(AppError::Conflict(format!(
                    "Slug `{explicit}` is already in use"
                )));
            }
            explicit.to_string()
        }
        None => unique_slug(state.categories.as_ref(), &req.name, "category").await?,
    };

    let category = Category::new(req.name, slug, req.description.unwrap_or_default());
    let category = state.categories.save(category).await?;

    Ok(HttpResponse::Created().json(category_response(&category)))
}

/// PUT /api/admin/categories/{id}
///
/// The slug is immutable unless explicitly cleared: an empty slug in the
/// request re-derives it from the current name.
pub async fn update_category(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("category", id.to_string()))?;
    let req = body.into_inner();

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        category.name = name;
    }
    if let Some(description) = req.description {
        category.description = description;
    }
    if let Some(slug) = req.slug {
        let trimmed = slug.trim();
        if trimmed.is_empty() {
            // Cleared: re-derive from the current name, keeping the slug
            // stable when the derivation lands on the one already held.
            let base = slugify(&category.name);
            let base = if base.is_empty() { "category" } else { &base };
            if base != category.slug {
                category.slug =
                    unique_slug(state.categories.as_ref(), &category.name, "category").await?;
            }
        } else if trimmed != category.slug {
            validate_slug(trimmed)?;
            if state.categories.slug_taken(trimmed).await? {
                return Err(AppError::Conflict(format!(
                    "Slug `{trimmed}` is already in use"
                )));
            }
            category.slug = trimmed.to_string();
        }
    }

    let category = state.categories.save(category).await?;
    Ok(HttpResponse::Ok().json(category_response(&category)))
}

/// DELETE /api/admin/categories/{id} - referencing posts lose the
/// category but survive.
pub async fn delete_category(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.categories.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Category deleted")))
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// POST /api/admin/tags
pub async fn create_tag(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => {
            validate_slug(explicit)?;
            if state.tags.slug_taken(explicit).await? {
                return Err(AppError::Conflict(format!(
                    "Slug `{explicit}` is already in use"
                )));
            }
            explicit.to_string()
        }
        None => unique_slug(state.tags.as_ref(), &req.name, "tag").await?,
    };

    let tag = Tag::new(req.name, slug);
    let tag = state.tags.save(tag).await?;

    Ok(HttpResponse::Created().json(tag_response(&tag)))
}

/// PUT /api/admin/tags/{id}
pub async fn update_tag(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTagRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut tag = state
        .tags
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("tag", id.to_string()))?;
    let req = body.into_inner();

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        tag.name = name;
    }
    if let Some(slug) = req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if slug != tag.slug {
            validate_slug(slug)?;
            if state.tags.slug_taken(slug).await? {
                return Err(AppError::Conflict(format!("Slug `{slug}` is already in use")));
            }
            tag.slug = slug.to_string();
        }
    }

    let tag = state.tags.save(tag).await?;
    Ok(HttpResponse::Ok().json(tag_response(&tag)))
}

/// DELETE /api/admin/tags/{id} - associations go with it, posts stay.
pub async fn delete_tag(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.tags.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Tag deleted")))
}
