//! Remote Hashnode GraphQL shapes and query operations.
//!
//! Textual query assembly only; the remote wire format is Hashnode's
//! GraphQL JSON, treated as an external protocol.

use quillfeed_graphql::{CursorPage, CursorPageInfo, GraphqlOperation};
use serde::{Deserialize, Serialize};

/// Relay-style page info as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemotePageInfo {
    /// Whether there is another page.
    pub has_next_page: bool,
    /// Cursor for the next page.
    pub end_cursor: Option<String>,
}

/// A single edge in a Relay-style connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The wrapped item.
    pub node: T,
}

/// Relay-style connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// Edges in this page.
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
    /// Pagination info.
    #[serde(default)]
    pub page_info: RemotePageInfo,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: RemotePageInfo::default(),
        }
    }
}

impl<T> Connection<T> {
    /// Flatten the edge wrapper into a pagination engine page.
    pub fn into_page(self) -> CursorPage<T> {
        CursorPage {
            items: self.edges.into_iter().map(|edge| edge.node).collect(),
            page_info: CursorPageInfo {
                has_next_page: self.page_info.has_next_page,
                end_cursor: self.page_info.end_cursor,
            },
        }
    }
}

/// Remote author shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteAuthor {
    pub name: Option<String>,
    pub username: Option<String>,
    pub profile_picture: Option<String>,
    pub url: Option<String>,
}

/// Remote tag shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteTag {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Remote content body (html + markdown).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteContent {
    pub html: Option<String>,
    pub markdown: Option<String>,
}

/// Remote cover image wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteCoverImage {
    pub url: Option<String>,
}

/// Remote SEO metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSeo {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Remote post shape, shared by the posts connection and search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemotePost {
    pub id: String,
    pub slug: String,
    pub title: Option<String>,
    pub brief: Option<String>,
    pub url: Option<String>,
    pub canonical_url: Option<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub reading_time_in_minutes: Option<u32>,
    pub views: Option<u64>,
    pub reaction_count: Option<u64>,
    pub cover_image: Option<RemoteCoverImage>,
    pub author: Option<RemoteAuthor>,
    pub tags: Option<Vec<RemoteTag>>,
    pub content: Option<RemoteContent>,
    pub seo: Option<RemoteSeo>,
}

/// Remote series shape. `posts` is absent outside the series query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSeries {
    pub id: String,
    pub slug: String,
    pub name: Option<String>,
    pub description: Option<RemoteContent>,
    pub cover_image: Option<String>,
    pub created_at: Option<String>,
    pub posts: Option<Connection<RemotePost>>,
}

/// Remote draft shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteDraft {
    pub id: String,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub updated_at: Option<String>,
    pub author: Option<RemoteAuthor>,
    pub tags: Option<Vec<RemoteTag>>,
    pub cover_image: Option<RemoteCoverImage>,
    pub content: Option<RemoteContent>,
}

/// Publication identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationInfo {
    pub id: String,
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// Publication identity

#[derive(Debug, Clone, Serialize)]
pub struct PublicationVariables {
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicationData {
    pub publication: Option<PublicationInfo>,
}

pub struct PublicationQuery;

impl GraphqlOperation for PublicationQuery {
    type Variables = PublicationVariables;
    type ResponseData = PublicationData;

    const QUERY: &'static str =
        "query Publication($host: String!) { publication(host: $host) { id title } }";
    const OPERATION_NAME: &'static str = "Publication";
}

// ---------------------------------------------------------------------------
// Posts

#[derive(Debug, Clone, Serialize)]
pub struct PostsVariables {
    pub host: String,
    pub first: i32,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostsData {
    pub publication: Option<PublicationPosts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicationPosts {
    pub posts: Connection<RemotePost>,
}

pub struct PostsQuery;

impl GraphqlOperation for PostsQuery {
    type Variables = PostsVariables;
    type ResponseData = PostsData;

    const QUERY: &'static str =
        "query PublicationPosts($host: String!, $first: Int!, $after: String) { \
           publication(host: $host) { \
             posts(first: $first, after: $after) { \
               edges { node { id slug title brief url canonicalUrl publishedAt updatedAt \
                 readingTimeInMinutes views reactionCount coverImage { url } \
                 author { name username profilePicture url } tags { name slug } \
                 content { html markdown } seo { title description } } } \
               pageInfo { hasNextPage endCursor } } } }";
    const OPERATION_NAME: &'static str = "PublicationPosts";
}

// ---------------------------------------------------------------------------
// Series

#[derive(Debug, Clone, Serialize)]
pub struct SeriesVariables {
    pub host: String,
    pub slug: String,
    pub first: i32,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesData {
    pub publication: Option<PublicationSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicationSeries {
    pub series: Option<RemoteSeries>,
}

pub struct SeriesQuery;

impl GraphqlOperation for SeriesQuery {
    type Variables = SeriesVariables;
    type ResponseData = SeriesData;

    const QUERY: &'static str =
        "query PublicationSeries($host: String!, $slug: String!, $first: Int!, $after: String) { \
           publication(host: $host) { \
             series(slug: $slug) { \
               id slug name description { html markdown } coverImage createdAt \
               posts(first: $first, after: $after) { \
                 edges { node { id slug title brief url publishedAt } } \
                 pageInfo { hasNextPage endCursor } } } } }";
    const OPERATION_NAME: &'static str = "PublicationSeries";
}

// ---------------------------------------------------------------------------
// Drafts

#[derive(Debug, Clone, Serialize)]
pub struct DraftsVariables {
    pub host: String,
    pub first: i32,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftsData {
    pub publication: Option<PublicationDrafts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicationDrafts {
    pub drafts: Connection<RemoteDraft>,
}

pub struct DraftsQuery;

impl GraphqlOperation for DraftsQuery {
    type Variables = DraftsVariables;
    type ResponseData = DraftsData;

    const QUERY: &'static str =
        "query PublicationDrafts($host: String!, $first: Int!, $after: String) { \
           publication(host: $host) { \
             drafts(first: $first, after: $after) { \
               edges { node { id slug title updatedAt \
                 author { name username profilePicture url } tags { name slug } \
                 coverImage { url } content { html markdown } } } \
               pageInfo { hasNextPage endCursor } } } }";
    const OPERATION_NAME: &'static str = "PublicationDrafts";
}

// ---------------------------------------------------------------------------
// Search

#[derive(Debug, Clone, Serialize)]
pub struct SearchVariables {
    pub first: i32,
    pub after: Option<String>,
    pub filter: SearchFilter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub query: String,
    pub publication_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    #[serde(rename = "searchPostsOfPublication")]
    pub search: Connection<RemotePost>,
}

pub struct SearchPostsQuery;

impl GraphqlOperation for SearchPostsQuery {
    type Variables = SearchVariables;
    type ResponseData = SearchData;

    const QUERY: &'static str =
        "query SearchPosts($first: Int!, $after: String, $filter: SearchPostsOfPublicationFilter!) { \
           searchPostsOfPublication(first: $first, after: $after, filter: $filter) { \
             edges { node { id slug title brief url publishedAt views reactionCount \
               coverImage { url } author { name username profilePicture url } } } \
             pageInfo { hasNextPage endCursor } } }";
    const OPERATION_NAME: &'static str = "SearchPosts";
}
