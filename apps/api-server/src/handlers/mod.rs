//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod blog;
mod health;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(blog::list_posts))
            .route("/posts/{slug}", web::get().to(blog::post_detail))
            .route("/categories", web::get().to(blog::list_categories))
            .route("/categories/{slug}", web::get().to(blog::category_detail))
            .route("/tags", web::get().to(blog::list_tags))
            .route("/tags/{slug}", web::get().to(blog::tag_detail))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Admin routes - Bearer token required via the Identity extractor
            .service(
                web::scope("/admin")
                    .route("/posts", web::get().to(admin::list_posts))
                    .route("/posts", web::post().to(admin::create_post))
                    .route("/posts/{id}", web::get().to(admin::get_post))
                    .route("/posts/{id}", web::put().to(admin::update_post))
                    .route("/posts/{id}", web::delete().to(admin::delete_post))
                    .route("/posts/{id}/images", web::get().to(admin::list_post_images))
                    .route(
                        "/posts/{id}/images",
                        web::post().to(admin::create_post_image),
                    )
                    .route("/images/{id}", web::put().to(admin::update_post_image))
                    .route("/images/{id}", web::delete().to(admin::delete_post_image))
                    .route("/categories", web::post().to(admin::create_category))
                    .route("/categories/{id}", web::put().to(admin::update_category))
                    .route(
                        "/categories/{id}",
                        web::delete().to(admin::delete_category),
                    )
                    .route("/tags", web::post().to(admin::create_tag))
                    .route("/tags/{id}", web::put().to(admin::update_tag))
                    .route("/tags/{id}", web::delete().to(admin::delete_tag)),
            ),
    );
}
