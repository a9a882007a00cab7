//! Collection loaders: posts, series, and drafts.
//!
//! Each loader owns its client and validator and drives one collection
//! through fetch, transform, validate, digest, and store handoff. A
//! fetch failure aborts the load cycle; a bad item never does.

use quillfeed_graphql::{ClientError, GraphqlClient, paginate_cursor, with_retry};
use tracing::{debug, error, info};

use crate::config::LoaderConfig;
use crate::content::{draft_schema, post_schema, series_schema};
use crate::error::LoadError;
use crate::pipeline::{LoadContext, LoadSummary, SchemaValidator, process_item, to_item_value};
use crate::remote::{
    DraftsQuery, DraftsVariables, PostsQuery, PostsVariables, SeriesQuery, SeriesVariables,
};
use crate::store::ContentStore;
use crate::transform::{draft_to_content, post_to_content, series_to_content};

/// Items requested per page. Hashnode rejects page sizes above 50.
pub(crate) const PAGE_SIZE: i32 = 20;

fn missing_publication(host: &str) -> ClientError {
    ClientError::Protocol {
        message: format!("publication {host} not found"),
    }
}

/// Loads published posts into the content store.
pub struct PostsLoader {
    config: LoaderConfig,
    client: GraphqlClient,
    validator: SchemaValidator,
}

impl PostsLoader {
    /// Build a posts loader from configuration.
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        let client = config.client()?;
        let validator = SchemaValidator::new(post_schema())?;
        Ok(Self {
            config,
            client,
            validator,
        })
    }

    /// The underlying client, exposed for metrics inspection.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Run one load cycle.
    pub async fn load<S: ContentStore>(
        &self,
        ctx: &mut LoadContext<'_, S>,
    ) -> Result<LoadSummary, LoadError> {
        let policy = self.config.retry.policy();
        let host = self.config.host.clone();
        let client = &self.client;

        let posts = paginate_cursor(self.config.max_items, |cursor| {
            let host = host.clone();
            let policy = policy.clone();
            async move {
                let data = with_retry(&policy, || {
                    client.execute::<PostsQuery>(PostsVariables {
                        host: host.clone(),
                        first: PAGE_SIZE,
                        after: cursor.clone(),
                    })
                })
                .await?;
                let publication = data.publication.ok_or_else(|| missing_publication(&host))?;
                Ok(publication.posts.into_page())
            }
        })
        .await
        .map_err(|err| {
            error!(host = %self.config.host, error = %err, "posts fetch failed");
            LoadError::Fetch(err)
        })?;

        let mut summary = LoadSummary::default();
        for raw in posts {
            let item = post_to_content(&self.config.host, raw).and_then(to_item_value);
            summary.record(&process_item(item, &self.validator, ctx));
        }
        info!(
            host = %self.config.host,
            stored = summary.stored,
            skipped = summary.skipped,
            failed = summary.failed,
            "posts load complete"
        );
        Ok(summary)
    }
}

/// Loads one post series, recorded as a single store entry holding the
/// series metadata plus the slugs of its member posts.
pub struct SeriesLoader {
    config: LoaderConfig,
    slug: String,
    client: GraphqlClient,
    validator: SchemaValidator,
}

impl SeriesLoader {
    /// Build a series loader for the given series slug.
    pub fn new(config: LoaderConfig, slug: impl Into<String>) -> Result<Self, LoadError> {
        let client = config.client()?;
        let validator = SchemaValidator::new(series_schema())?;
        Ok(Self {
            config,
            slug: slug.into(),
            client,
            validator,
        })
    }

    /// The underlying client, exposed for metrics inspection.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Run one load cycle.
    pub async fn load<S: ContentStore>(
        &self,
        ctx: &mut LoadContext<'_, S>,
    ) -> Result<LoadSummary, LoadError> {
        let policy = self.config.retry.policy();
        let host = self.config.host.clone();
        let slug = self.slug.clone();
        let client = &self.client;
        // Series metadata rides along on every page; keep the first copy.
        let meta = std::sync::Mutex::new(None);

        let posts = paginate_cursor(self.config.max_items, |cursor| {
            let host = host.clone();
            let slug = slug.clone();
            let policy = policy.clone();
            let meta = &meta;
            async move {
                let data = with_retry(&policy, || {
                    client.execute::<SeriesQuery>(SeriesVariables {
                        host: host.clone(),
                        slug: slug.clone(),
                        first: PAGE_SIZE,
                        after: cursor.clone(),
                    })
                })
                .await?;
                let mut series = data
                    .publication
                    .ok_or_else(|| missing_publication(&host))?
                    .series
                    .ok_or_else(|| ClientError::Protocol {
                        message: format!("series {slug} not found on {host}"),
                    })?;
                let page = series
                    .posts
                    .take()
                    .map(crate::remote::Connection::into_page)
                    .unwrap_or_else(|| crate::remote::Connection::default().into_page());
                if let Ok(mut guard) = meta.lock() {
                    guard.get_or_insert(series);
                }
                Ok(page)
            }
        })
        .await
        .map_err(|err| {
            error!(host = %self.config.host, slug = %self.slug, error = %err, "series fetch failed");
            LoadError::Fetch(err)
        })?;

        let mut summary = LoadSummary::default();
        let series = meta.lock().ok().and_then(|mut guard| guard.take());
        if let Some(series) = series {
            let slugs = posts
                .into_iter()
                .map(|post| post.slug)
                .filter(|slug| !slug.is_empty())
                .collect();
            let item = series_to_content(series, slugs).and_then(to_item_value);
            summary.record(&process_item(item, &self.validator, ctx));
        } else {
            debug!(slug = %self.slug, "no series pages fetched");
        }
        info!(
            host = %self.config.host,
            slug = %self.slug,
            stored = summary.stored,
            skipped = summary.skipped,
            failed = summary.failed,
            "series load complete"
        );
        Ok(summary)
    }
}

/// Loads unpublished drafts into the content store. Requires a
/// personal access token.
#[derive(Debug)]
pub struct DraftsLoader {
    config: LoaderConfig,
    client: GraphqlClient,
    validator: SchemaValidator,
}

impl DraftsLoader {
    /// Build a drafts loader. Fails when no token is configured, since
    /// the drafts query is rejected for anonymous callers.
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        if config.token.is_none() {
            return Err(LoadError::Config(
                "a personal access token is required to load drafts".into(),
            ));
        }
        let client = config.client()?;
        let validator = SchemaValidator::new(draft_schema())?;
        Ok(Self {
            config,
            client,
            validator,
        })
    }

    /// The underlying client, exposed for metrics inspection.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Run one load cycle.
    pub async fn load<S: ContentStore>(
        &self,
        ctx: &mut LoadContext<'_, S>,
    ) -> Result<LoadSummary, LoadError> {
        let policy = self.config.retry.policy();
        let host = self.config.host.clone();
        let client = &self.client;

        let drafts = paginate_cursor(self.config.max_items, |cursor| {
            let host = host.clone();
            let policy = policy.clone();
            async move {
                let data = with_retry(&policy, || {
                    client.execute::<DraftsQuery>(DraftsVariables {
                        host: host.clone(),
                        first: PAGE_SIZE,
                        after: cursor.clone(),
                    })
                })
                .await?;
                let publication = data.publication.ok_or_else(|| missing_publication(&host))?;
                Ok(publication.drafts.into_page())
            }
        })
        .await
        .map_err(|err| {
            error!(host = %self.config.host, error = %err, "drafts fetch failed");
            LoadError::Fetch(err)
        })?;

        let mut summary = LoadSummary::default();
        for raw in drafts {
            let item = draft_to_content(raw).and_then(to_item_value);
            summary.record(&process_item(item, &self.validator, ctx));
        }
        info!(
            host = %self.config.host,
            stored = summary.stored,
            skipped = summary.skipped,
            failed = summary.failed,
            "drafts load complete"
        );
        Ok(summary)
    }
}
