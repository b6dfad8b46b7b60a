//! URL-safe slug derivation.
//!
//! Slugs are derived once at creation time for categories, tags and posts
//! when no explicit slug is supplied, and are never re-derived on later
//! name or title edits.

use async_trait::async_trait;

use crate::error::RepoError;

/// Convert text into a URL-safe slug.
///
/// Transforms to lowercase, replaces non-alphanumeric characters with
/// hyphens, collapses consecutive hyphens, and trims leading/trailing
/// hyphens.
pub fn slugify(text: &str) -> String {
    let slug: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    let mut result = String::with_capacity(slug.len());
    let mut prev_was_hyphen = true; // skip leading hyphens
    for c in slug.chars() {
        if c == '-' {
            if !prev_was_hyphen {
                result.push('-');
            }
            prev_was_hyphen = true;
        } else {
            result.push(c);
            prev_was_hyphen = false;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    result
}

/// Probe for slug availability, implemented by each repository.
#[async_trait]
pub trait SlugLookup: Send + Sync {
    async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError>;
}

/// Derive a slug from `name` that is unique within the lookup's entity type.
///
/// Collisions get a numeric suffix: `hello-world`, `hello-world-2`,
/// `hello-world-3`, ... A name that slugifies to the empty string (pure
/// punctuation, non-ASCII) uses `fallback` as the base word instead.
pub async fn unique_slug<L>(lookup: &L, name: &str, fallback: &str) -> Result<String, RepoError>
where
    L: SlugLookup + ?Sized,
{
    let mut base = slugify(name);
    if base.is_empty() {
        base = fallback.to_string();
    }

    let mut candidate = base.clone();
    let mut n: u64 = 2;
    while lookup.slug_taken(&candidate).await? {
        candidate = format!("{base}-{n}");
        n += 1;
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tokio::sync::Mutex;

    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My First Blog Post"), "my-first-blog-post");
    }

    #[test]
    fn test_slugify_special_chars() {
        assert_eq!(slugify("What's New?"), "what-s-new");
        assert_eq!(slugify("Post #42: The Answer"), "post-42-the-answer");
        assert_eq!(slugify("foo & bar + baz"), "foo-bar-baz");
    }

    #[test]
    fn test_slugify_consecutive_hyphens() {
        assert_eq!(slugify("hello   world"), "hello-world");
        assert_eq!(slugify("a---b"), "a-b");
    }

    #[test]
    fn test_slugify_leading_trailing() {
        assert_eq!(slugify("  hello  "), "hello");
        assert_eq!(slugify("---hello---"), "hello");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    struct TakenSet(Mutex<HashSet<String>>);

    #[async_trait]
    impl SlugLookup for TakenSet {
        async fn slug_taken(&self, slug: &str) -> Result<bool, RepoError> {
            Ok(self.0.lock().await.contains(slug))
        }
    }

    #[tokio::test]
    async fn test_unique_slug_no_collision() {
        let taken = TakenSet(Mutex::new(HashSet::new()));
        let slug = unique_slug(&taken, "Hello World", "post").await.unwrap();
        assert_eq!(slug, "hello-world");
    }

    #[tokio::test]
    async fn test_unique_slug_numeric_suffix() {
        let taken = TakenSet(Mutex::new(
            ["hello-world".to_string(), "hello-world-2".to_string()]
                .into_iter()
                .collect(),
        ));
        let slug = unique_slug(&taken, "Hello World", "post").await.unwrap();
        assert_eq!(slug, "hello-world-3");
    }

    #[tokio::test]
    async fn test_unique_slug_fallback_base() {
        let taken = TakenSet(Mutex::new(HashSet::new()));
        let slug = unique_slug(&taken, "!!!", "post").await.unwrap();
        assert_eq!(slug, "post");
    }
}
