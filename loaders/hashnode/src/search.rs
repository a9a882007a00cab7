//! Multi-term search aggregation.
//!
//! Fans one query out per search term, dedupes the union, and ranks it
//! by a simple relevance score before the results enter the pipeline.

use std::collections::HashSet;

use quillfeed_graphql::{ClientError, GraphqlClient, paginate_cursor, with_retry};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::LoaderConfig;
use crate::content::post_schema;
use crate::error::LoadError;
use crate::loader::PAGE_SIZE;
use crate::pipeline::{LoadContext, LoadSummary, SchemaValidator, process_item, to_item_value};
use crate::remote::{
    PublicationQuery, PublicationVariables, RemotePost, SearchFilter, SearchPostsQuery,
    SearchVariables,
};
use crate::store::ContentStore;
use crate::transform::post_to_content;

/// Per-term result ceiling, applied before the overall cap.
const MAX_PER_TERM: usize = 100;

/// Score a post's relevance to a search term.
///
/// Term matches dominate; engagement numbers only break ties. A title
/// match outweighs any amount of engagement.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn relevance_score(post: &RemotePost, term: &str) -> f64 {
    let term = term.to_lowercase();
    let mut score = 0.0;
    if post
        .title
        .as_deref()
        .is_some_and(|title| title.to_lowercase().contains(&term))
    {
        score += 10.0;
    }
    if post
        .brief
        .as_deref()
        .is_some_and(|brief| brief.to_lowercase().contains(&term))
    {
        score += 4.0;
    }
    score += (post.reaction_count.unwrap_or(0) as f64 * 0.1).min(2.0);
    score += (post.views.unwrap_or(0) as f64 * 0.01).min(1.0);
    score
}

/// One deduplicated, scored search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched post.
    pub post: RemotePost,
    /// The term that first surfaced this post.
    pub term: String,
    /// Relevance score against that term.
    pub score: f64,
}

/// Fans search terms out against one publication and merges the results.
pub struct SearchAggregator<'a> {
    client: &'a GraphqlClient,
    publication_id: String,
    terms: &'a [String],
    max_results: usize,
}

impl<'a> SearchAggregator<'a> {
    /// Create an aggregator over a resolved publication id.
    pub fn new(
        client: &'a GraphqlClient,
        publication_id: impl Into<String>,
        terms: &'a [String],
        max_results: usize,
    ) -> Self {
        Self {
            client,
            publication_id: publication_id.into(),
            terms,
            max_results,
        }
    }

    /// Run every term sequentially and return the ranked union.
    ///
    /// A failing term is logged and skipped; it never poisons the other
    /// terms' results. A post surfaced by several terms keeps the score
    /// of the term that saw it first.
    pub async fn run(&self) -> Vec<SearchHit> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut hits: Vec<SearchHit> = Vec::new();
        let per_term_cap = self.max_results.min(MAX_PER_TERM);

        for term in self.terms {
            let posts = paginate_cursor(Some(per_term_cap), |cursor| {
                let filter = SearchFilter {
                    query: term.clone(),
                    publication_id: self.publication_id.clone(),
                };
                async move {
                    let data = self
                        .client
                        .execute::<SearchPostsQuery>(SearchVariables {
                            first: PAGE_SIZE,
                            after: cursor,
                            filter,
                        })
                        .await?;
                    Ok(data.search.into_page())
                }
            })
            .await;

            let posts = match posts {
                Ok(posts) => posts,
                Err(err) => {
                    warn!(term = %term, error = %err, "search term failed, skipping");
                    continue;
                }
            };

            for post in posts {
                let key = if post.id.is_empty() {
                    post.slug.clone()
                } else {
                    post.id.clone()
                };
                if !seen.insert(key) {
                    continue;
                }
                let score = relevance_score(&post, term);
                hits.push(SearchHit {
                    post,
                    term: term.clone(),
                    score,
                });
            }
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(self.max_results);
        hits
    }
}

/// Loads ranked search results into the content store.
pub struct SearchLoader {
    config: LoaderConfig,
    terms: Vec<String>,
    max_results: usize,
    client: GraphqlClient,
    validator: SchemaValidator,
}

impl SearchLoader {
    /// Build a search loader for a fixed set of terms.
    pub fn new(
        config: LoaderConfig,
        terms: Vec<String>,
        max_results: usize,
    ) -> Result<Self, LoadError> {
        let client = config.client()?;
        let validator = SchemaValidator::new(post_schema())?;
        Ok(Self {
            config,
            terms,
            max_results,
            client,
            validator,
        })
    }

    /// The underlying client, exposed for metrics inspection.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Run one load cycle. An empty term list is a no-op that touches
    /// neither the network nor the store.
    pub async fn load<S: ContentStore>(
        &self,
        ctx: &mut LoadContext<'_, S>,
    ) -> Result<LoadSummary, LoadError> {
        let mut summary = LoadSummary::default();
        if self.terms.is_empty() {
            info!(host = %self.config.host, "no search terms configured");
            return Ok(summary);
        }

        // Search filters by publication id, not host, so resolve it first.
        let policy = self.config.retry.policy();
        let host = self.config.host.clone();
        let publication = with_retry(&policy, || {
            self.client
                .execute::<PublicationQuery>(PublicationVariables { host: host.clone() })
        })
        .await
        .and_then(|data| {
            data.publication.ok_or_else(|| ClientError::Protocol {
                message: format!("publication {host} not found"),
            })
        })
        .map_err(|err| {
            error!(host = %self.config.host, error = %err, "publication lookup failed");
            LoadError::Fetch(err)
        })?;

        let aggregator = SearchAggregator::new(
            &self.client,
            publication.id,
            &self.terms,
            self.max_results,
        );
        let hits = aggregator.run().await;

        for hit in hits {
            let item = post_to_content(&self.config.host, hit.post)
                .and_then(to_item_value)
                .map(|mut value| {
                    if let Value::Object(map) = &mut value {
                        map.insert("search_term".into(), Value::String(hit.term));
                        map.insert("relevance_score".into(), Value::from(hit.score));
                    }
                    value
                });
            summary.record(&process_item(item, &self.validator, ctx));
        }
        info!(
            host = %self.config.host,
            terms = self.terms.len(),
            stored = summary.stored,
            skipped = summary.skipped,
            failed = summary.failed,
            "search load complete"
        );
        Ok(summary)
    }
}
