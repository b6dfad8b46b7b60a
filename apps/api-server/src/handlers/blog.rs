//! Public blog read paths: listing, detail, category and tag pages.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use gazette_core::DomainError;
use gazette_core::domain::{Category, Post, PostImage, Tag};
use gazette_core::excerpt::DEFAULT_EXCERPT_LENGTH;
use gazette_core::pagination::{DEFAULT_PAGE_SIZE, PageInfo, Paginator};
use gazette_core::ports::PostFilter;
use gazette_shared::PageMeta;
use gazette_shared::dto::{
    CategoryDetailResponse, CategoryResponse, PostDetailResponse, PostImageResponse, PostListItem,
    PostListResponse, PostResponse, TagDetailResponse, TagResponse,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Related posts shown under a detail page.
const RELATED_LIMIT: u64 = 3;

pub(super) fn category_response(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        description: category.description.clone(),
        created_at: category.created_at,
    }
}

pub(super) fn tag_response(tag: &Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

pub(super) fn image_response(image: &PostImage) -> PostImageResponse {
    PostImageResponse {
        id: image.id,
        post_id: image.post_id,
        image: image.image.clone(),
        caption: image.caption.clone(),
        alt_text: image.alt_text.clone(),
        order: image.order,
        uploaded_at: image.uploaded_at,
    }
}

pub(super) fn page_meta(info: PageInfo) -> PageMeta {
    PageMeta {
        page: info.number,
        page_size: info.page_size,
        total_items: info.total_items,
        total_pages: info.total_pages,
        has_next: info.has_next,
        has_previous: info.has_previous,
    }
}

pub(super) fn list_item(post: &Post, category: Option<&Category>) -> PostListItem {
    PostListItem {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        excerpt: post.excerpt(DEFAULT_EXCERPT_LENGTH),
        status: post.status.as_str().to_string(),
        category: category.map(category_response),
        featured_image: post.featured_image.clone(),
        views: post.views,
        published_at: post.published_at,
    }
}

pub(super) fn post_response(
    post: &Post,
    author: &str,
    category: Option<&Category>,
    tags: &[Tag],
    images: &[PostImage],
) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        content: post.content.clone(),
        status: post.status.as_str().to_string(),
        author: author.to_string(),
        category: category.map(category_response),
        tags: tags.iter().map(tag_response).collect(),
        images: images.iter().map(image_response).collect(),
        meta_description: post.meta_description.clone(),
        featured_image: post.featured_image.clone(),
        views: post.views,
        created_at: post.created_at,
        updated_at: post.updated_at,
        published_at: post.published_at,
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// GET /api/posts - paginated published posts plus the navigation sets.
///
/// Supports ?search=&category=&tag=&page=; filters combine with AND.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filter = PostFilter {
        search: query.search.clone(),
        category: query.category.clone(),
        tag: query.tag.clone(),
    };

    let total = state.posts.count_published(&filter).await?;
    let info = Paginator::new(total, DEFAULT_PAGE_SIZE).resolve(query.page.as_deref());
    let posts = state
        .posts
        .list_published(&filter, info.page_size, info.offset())
        .await?;

    // Full category and tag sets for sidebar navigation
    let categories = state.categories.list().await?;
    let tags = state.tags.list().await?;
    let by_id: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let items = posts
        .iter()
        .map(|p| list_item(p, p.category_id.and_then(|id| by_id.get(&id)).copied()))
        .collect();

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: items,
        page: page_meta(info),
        categories: categories.iter().map(category_response).collect(),
        tags: tags.iter().map(tag_response).collect(),
        search: query.search,
        current_category: query.category,
        current_tag: query.tag,
    }))
}

/// GET /api/posts/{slug} - published post detail plus related posts.
///
/// Counts the read: the view counter is incremented atomically before the
/// render context is built.
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let mut post = state
        .posts
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("post", slug.as_str()))?;

    state.posts.increment_views(post.id).await?;
    post.views += 1; // reflect the read just counted

    let related = state.posts.related(&post, RELATED_LIMIT).await?;
    let tags = state.tags.list_for_post(post.id).await?;
    let images = state.images.list_for_post(post.id).await?;
    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_default();

    let categories = state.categories.list().await?;
    let by_id: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let category = post.category_id.and_then(|id| by_id.get(&id)).copied();

    let related_posts = related
        .iter()
        .map(|p| list_item(p, p.category_id.and_then(|id| by_id.get(&id)).copied()))
        .collect();

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(&post, &author, category, &tags, &images),
        related_posts,
    }))
}

/// GET /api/categories - all categories, name-ordered.
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    let response: Vec<CategoryResponse> = categories.iter().map(category_response).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/tags - all tags, name-ordered.
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;
    let response: Vec<TagResponse> = tags.iter().map(tag_response).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/categories/{slug} - category page with its published posts.
pub async fn category_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("category", slug.as_str()))?;

    let filter = PostFilter {
        category: Some(slug),
        ..Default::default()
    };
    let total = state.posts.count_published(&filter).await?;
    let info = Paginator::new(total, DEFAULT_PAGE_SIZE).resolve(query.page.as_deref());
    let posts = state
        .posts
        .list_published(&filter, info.page_size, info.offset())
        .await?;

    let items = posts.iter().map(|p| list_item(p, Some(&category))).collect();

    Ok(HttpResponse::Ok().json(CategoryDetailResponse {
        category: category_response(&category),
        posts: items,
        page: page_meta(info),
    }))
}

/// GET /api/tags/{slug} - tag page with its published posts.
pub async fn tag_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let tag = state
        .tags
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("tag", slug.as_str()))?;

    let filter = PostFilter {
        tag: Some(slug),
        ..Default::default()
    };
    let total = state.posts.count_published(&filter).await?;
    let info = Paginator::new(total, DEFAULT_PAGE_SIZE).resolve(query.page.as_deref());
    let posts = state
        .posts
        .list_published(&filter, info.page_size, info.offset())
        .await?;

    let categories = state.categories.list().await?;
    let by_id: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let items = posts
        .iter()
        .map(|p| list_item(p, p.category_id.and_then(|id| by_id.get(&id)).copied()))
        .collect();

    Ok(HttpResponse::Ok().json(TagDetailResponse {
        tag: tag_response(&tag),
        posts: items,
        page: page_meta(info),
    }))
}
