//! Remote shape to local schema mapping with default filling.
//!
//! Mechanical 1:1 mapping; any failure here is reported as a
//! [`PipelineError::Process`] and isolated at the item boundary.

use crate::content::{Author, Content, Draft, Post, Series, Tag};
use crate::error::PipelineError;
use crate::remote::{RemoteDraft, RemotePost, RemoteSeries};

fn map_tags(tags: Option<Vec<crate::remote::RemoteTag>>) -> Vec<Tag> {
    tags.unwrap_or_default()
        .into_iter()
        .map(|tag| Tag {
            name: tag.name.unwrap_or_default(),
            slug: tag.slug.unwrap_or_default(),
        })
        .collect()
}

fn map_content(content: Option<crate::remote::RemoteContent>) -> Content {
    content
        .map(|content| Content {
            html: content.html.unwrap_or_default(),
            markdown: content.markdown.unwrap_or_default(),
        })
        .unwrap_or_default()
}

fn map_author(author: crate::remote::RemoteAuthor) -> Author {
    Author {
        name: author.name.unwrap_or_default(),
        username: author.username.unwrap_or_default(),
        profile_picture: author.profile_picture,
        url: author.url,
    }
}

/// Map a remote post into the local schema.
pub fn post_to_content(host: &str, raw: RemotePost) -> Result<Post, PipelineError> {
    let url = match raw.url {
        Some(url) if !url.is_empty() => url,
        _ if !raw.slug.is_empty() => format!("https://{host}/{}", raw.slug),
        _ => {
            return Err(PipelineError::Process {
                message: format!("post {} has neither url nor slug", raw.id),
            });
        }
    };

    Ok(Post {
        id: raw.id,
        slug: raw.slug,
        title: raw.title.unwrap_or_default(),
        brief: raw.brief.unwrap_or_default(),
        url,
        canonical_url: raw.canonical_url.filter(|url| !url.is_empty()),
        date: raw.published_at,
        updated: raw.updated_at,
        reading_time_minutes: raw.reading_time_in_minutes.unwrap_or(0),
        views: raw.views.unwrap_or(0),
        reaction_count: raw.reaction_count.unwrap_or(0),
        cover_image: raw
            .cover_image
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty()),
        author: raw.author.map(map_author),
        tags: map_tags(raw.tags),
        content: map_content(raw.content),
        seo_title: raw.seo.as_ref().and_then(|seo| seo.title.clone()),
        seo_description: raw.seo.and_then(|seo| seo.description),
    })
}

/// Map a remote series (plus the slugs of its paginated posts) into
/// the local schema.
pub fn series_to_content(
    raw: RemoteSeries,
    post_slugs: Vec<String>,
) -> Result<Series, PipelineError> {
    Ok(Series {
        id: raw.id,
        slug: raw.slug,
        name: raw.name.unwrap_or_default(),
        description: raw
            .description
            .map(|description| {
                let markdown = description.markdown.unwrap_or_default();
                if markdown.is_empty() {
                    description.html.unwrap_or_default()
                } else {
                    markdown
                }
            })
            .unwrap_or_default(),
        cover_image: raw.cover_image.filter(|url| !url.is_empty()),
        created_at: raw.created_at,
        posts: post_slugs,
    })
}

/// Map a remote draft into the local schema.
pub fn draft_to_content(raw: RemoteDraft) -> Result<Draft, PipelineError> {
    Ok(Draft {
        id: raw.id,
        slug: raw.slug.filter(|slug| !slug.is_empty()),
        title: raw.title.unwrap_or_default(),
        updated_at: raw.updated_at,
        cover_image: raw
            .cover_image
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty()),
        tags: map_tags(raw.tags),
        content: map_content(raw.content),
    })
}
