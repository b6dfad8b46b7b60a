//! SeaORM entities for the content schema.

pub mod category;
pub mod post;
pub mod post_image;
pub mod post_tag;
pub mod tag;
pub mod user;
