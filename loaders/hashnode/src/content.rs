//! Stable local content schema handed to the store.
//!
//! The JSON Schema consts are exposed so the host can validate content
//! without redeclaring the shapes.

use serde::{Deserialize, Serialize};

/// Post author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub username: String,
    pub profile_picture: Option<String>,
    pub url: Option<String>,
}

/// Content tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

/// Content body in both renderings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub html: String,
    pub markdown: String,
}

/// A published post in the local schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub brief: String,
    pub url: String,
    pub canonical_url: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    pub reading_time_minutes: u32,
    pub views: u64,
    pub reaction_count: u64,
    pub cover_image: Option<String>,
    pub author: Option<Author>,
    pub tags: Vec<Tag>,
    pub content: Content,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

/// A post series in the local schema. `posts` holds the slugs of the
/// member posts in series order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub created_at: Option<String>,
    pub posts: Vec<String>,
}

/// An unpublished draft in the local schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub slug: Option<String>,
    pub title: String,
    pub updated_at: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<Tag>,
    pub content: Content,
}

pub(crate) const POST_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["id", "slug", "title", "url", "content"],
    "properties": {
        "id": { "type": "string", "minLength": 1 },
        "slug": { "type": "string", "minLength": 1 },
        "title": { "type": "string", "minLength": 1 },
        "brief": { "type": "string" },
        "url": { "type": "string", "minLength": 1 },
        "reading_time_minutes": { "type": "integer", "minimum": 0 },
        "views": { "type": "integer", "minimum": 0 },
        "reaction_count": { "type": "integer", "minimum": 0 },
        "tags": {
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "slug": { "type": "string" }
                }
            }
        },
        "content": {
            "type": "object",
            "properties": {
                "html": { "type": "string" },
                "markdown": { "type": "string" }
            }
        }
    }
}"#;

pub(crate) const SERIES_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["id", "slug", "name"],
    "properties": {
        "id": { "type": "string", "minLength": 1 },
        "slug": { "type": "string", "minLength": 1 },
        "name": { "type": "string", "minLength": 1 },
        "description": { "type": "string" },
        "posts": {
            "type": "array",
            "items": { "type": "string" }
        }
    }
}"#;

pub(crate) const DRAFT_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["id", "title"],
    "properties": {
        "id": { "type": "string", "minLength": 1 },
        "title": { "type": "string", "minLength": 1 },
        "content": {
            "type": "object",
            "properties": {
                "html": { "type": "string" },
                "markdown": { "type": "string" }
            }
        }
    }
}"#;

/// JSON Schema for [`Post`].
#[must_use]
pub const fn post_schema() -> &'static str {
    POST_SCHEMA
}

/// JSON Schema for [`Series`].
#[must_use]
pub const fn series_schema() -> &'static str {
    SERIES_SCHEMA
}

/// JSON Schema for [`Draft`].
#[must_use]
pub const fn draft_schema() -> &'static str {
    DRAFT_SCHEMA
}
