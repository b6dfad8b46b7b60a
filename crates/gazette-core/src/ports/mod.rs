//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, ROLE_ADMIN, TokenClaims, TokenService};
pub use repository::{
    CategoryRepository, PostFilter, PostImageRepository, PostRepository, TagRepository,
    UserRepository,
};
