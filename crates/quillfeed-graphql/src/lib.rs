//! Quillfeed GraphQL - transport infrastructure for content loaders.
//!
//! This crate provides:
//! - Typed GraphQL query operations.
//! - An HTTP transport with per-request timeout, optional bearer auth,
//!   and a normalized error taxonomy.
//! - A TTL-evicting response cache consulted before every network call.
//! - A cursor pagination engine with an optional total-item cap.
//! - Caller-side retry policy helpers (the transport itself never retries).

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod cache;
mod client;
mod error;
mod operation;
mod pagination;
mod retry;

pub use cache::{ResponseCache, cache_key};
pub use client::{GraphqlClient, GraphqlClientBuilder, GraphqlClientMetricsSnapshot};
pub use error::{ClientError, HttpErrorInfo};
pub use operation::{GraphqlError, GraphqlErrorLocation, GraphqlOperation, GraphqlResponse};
pub use pagination::{CursorPage, CursorPageInfo, CursorPager, paginate_cursor};
pub use retry::{RetryDecision, RetryPolicy, with_retry};
