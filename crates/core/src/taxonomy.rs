//! Category and tag naming rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length for a category name (characters).
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Maximum length for a tag name (characters).
pub const MAX_TAG_NAME_LENGTH: usize = 50;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

fn validate_name(kind: &str, name: &str, max: usize) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation(format!("{kind} name must not be empty")));
    }
    if len > max {
        return Err(CoreError::Validation(format!(
            "{kind} name exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    validate_name("Category", name, MAX_CATEGORY_NAME_LENGTH)
}

pub fn validate_tag_name(name: &str) -> Result<(), CoreError> {
    validate_name("Tag", name, MAX_TAG_NAME_LENGTH)
}

/// Slugs are lowercase ASCII words joined by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits, and single hyphens"
        )));
    }
    Ok(())
}

/// Derive a slug from a display name: ASCII alphanumerics are lowercased,
/// every other run of characters becomes one hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
