//! Quillfeed Hashnode loader.
//!
//! Fetches publication content (posts, series, drafts, search results)
//! from the Hashnode GraphQL API, transforms the remote schema into a
//! stable local schema, validates it, and hands digested entries to a
//! content store owned by the hosting static-site build system.
//!
//! The host owns on-disk persistence and render pipelines; this crate
//! owns pagination, response caching, change detection, and per-item
//! error isolation.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod config;
mod content;
mod digest;
mod error;
mod loader;
mod pipeline;
mod remote;
mod search;
mod store;
mod transform;

pub use config::{LoaderConfig, RetryConfig};
pub use content::{
    Author, Content, Draft, Post, Series, Tag, draft_schema, post_schema, series_schema,
};
pub use digest::{content_digest, stable_id};
pub use error::{LoadError, PipelineError};
pub use loader::{DraftsLoader, PostsLoader, SeriesLoader};
pub use pipeline::{ItemOutcome, LoadContext, LoadSummary, SchemaValidator};
pub use remote::{
    Connection, Edge, RemoteAuthor, RemoteContent, RemoteCoverImage, RemoteDraft, RemotePost,
    RemoteSeries, RemoteTag,
};
pub use search::{SearchAggregator, SearchHit, SearchLoader, relevance_score};
pub use store::{ContentStore, MemoryStore, StoredEntry};
