//! Per-item transform/validate/digest/store pipeline.
//!
//! A failure at any step produces a structured outcome for that item
//! alone; the batch always continues.

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, warn};

use crate::digest::{content_digest, stable_id};
use crate::error::{LoadError, PipelineError};
use crate::store::{ContentStore, StoredEntry};

/// Compiled-once JSON Schema validator.
#[derive(Debug)]
pub struct SchemaValidator {
    validator: Validator,
}

impl SchemaValidator {
    /// Compile a validator from JSON Schema text.
    pub fn new(schema: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(schema)
            .map_err(|err| LoadError::Config(format!("schema is not valid JSON: {err}")))?;
        let validator = Validator::new(&value)
            .map_err(|err| LoadError::Config(format!("invalid JSON Schema: {err}")))?;
        Ok(Self { validator })
    }

    /// Validate a payload, collecting every issue.
    pub fn validate(&self, value: &Value) -> Result<(), PipelineError> {
        let issues: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|err| err.to_string())
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Validation { issues })
        }
    }
}

/// Per-load-cycle context handed in by the hosting build system.
pub struct LoadContext<'a, S: ContentStore> {
    /// The host's content store.
    pub store: &'a mut S,
    /// Host-supplied digest function, preferred over the built-in hash
    /// so change detection stays consistent with the host's own.
    pub generate_digest: Option<&'a dyn Fn(&Value) -> String>,
}

impl<'a, S: ContentStore> LoadContext<'a, S> {
    /// Create a context using the built-in digest.
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            generate_digest: None,
        }
    }

    /// Use the host's digest function.
    #[must_use]
    pub fn with_digest(mut self, generate_digest: &'a dyn Fn(&Value) -> String) -> Self {
        self.generate_digest = Some(generate_digest);
        self
    }
}

/// Outcome of one item passing through the pipeline.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Validated and written to the store.
    Stored,
    /// Validated but the store judged it unchanged.
    Unchanged,
    /// Failed at some pipeline step; counted and skipped.
    Failed(PipelineError),
}

/// Batch-level bookkeeping for one load cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Items newly written to the store.
    pub stored: usize,
    /// Items the store skipped as unchanged.
    pub skipped: usize,
    /// Items that failed a pipeline step.
    pub failed: usize,
}

impl LoadSummary {
    /// Fold an item outcome into the counts.
    pub const fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Stored => self.stored += 1,
            ItemOutcome::Unchanged => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total items seen this cycle.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.stored + self.skipped + self.failed
    }
}

/// Serialize a transformed item for the pipeline.
pub(crate) fn to_item_value<T: serde::Serialize>(item: T) -> Result<Value, PipelineError> {
    serde_json::to_value(item).map_err(|err| PipelineError::Process {
        message: err.to_string(),
    })
}

/// Run one item through validate, identify, digest, and store handoff.
///
/// `item` carries the transform step's result so transform failures
/// flow through the same isolation path.
pub(crate) fn process_item<S: ContentStore>(
    item: Result<Value, PipelineError>,
    validator: &SchemaValidator,
    ctx: &mut LoadContext<'_, S>,
) -> ItemOutcome {
    let value = match item {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "skipping item: transform failed");
            return ItemOutcome::Failed(err);
        }
    };

    // Identity never depends on validation outcome.
    let id = stable_id(&value);

    if let Err(err) = validator.validate(&value) {
        warn!(id, error = %err, "skipping item: validation failed");
        return ItemOutcome::Failed(err);
    }

    let digest = ctx
        .generate_digest
        .map_or_else(|| content_digest(&value), |generate| generate(&value));

    let rendered_html = value
        .pointer("/content/html")
        .and_then(Value::as_str)
        .filter(|html| !html.is_empty())
        .map(ToString::to_string);

    let written = ctx.store.set(StoredEntry {
        id: id.clone(),
        data: value,
        digest,
        rendered_html,
    });

    if written {
        ItemOutcome::Stored
    } else {
        debug!(id, "store skipped unchanged item");
        ItemOutcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::content::post_schema;
    use crate::store::MemoryStore;

    use super::*;

    fn post_value(id: &str, title: &str) -> Value {
        json!({
            "id": id,
            "slug": format!("{id}-slug"),
            "title": title,
            "url": format!("https://blog.example.com/{id}"),
            "content": {"html": "<p>hi</p>", "markdown": "hi"}
        })
    }

    #[test]
    fn one_bad_item_does_not_abort_the_batch() {
        let validator = SchemaValidator::new(post_schema()).expect("validator");
        let mut store = MemoryStore::new();
        let mut ctx = LoadContext::new(&mut store);
        let mut summary = LoadSummary::default();

        let batch = vec![
            Ok(post_value("p1", "First")),
            Ok(post_value("p2", "")), // fails minLength on title
            Ok(post_value("p3", "Third")),
        ];
        for item in batch {
            summary.record(&process_item(item, &validator, &mut ctx));
        }

        assert_eq!(summary.stored, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 0);
        assert!(store.get("p1").is_some());
        assert!(store.get("p2").is_none());
        assert!(store.get("p3").is_some());
    }

    #[test]
    fn unchanged_item_counts_as_skipped() {
        let validator = SchemaValidator::new(post_schema()).expect("validator");
        let mut store = MemoryStore::new();

        let mut ctx = LoadContext::new(&mut store);
        let first = process_item(Ok(post_value("p1", "First")), &validator, &mut ctx);
        assert!(matches!(first, ItemOutcome::Stored));

        let second = process_item(Ok(post_value("p1", "First")), &validator, &mut ctx);
        assert!(matches!(second, ItemOutcome::Unchanged));
    }

    #[test]
    fn host_digest_is_preferred() {
        let validator = SchemaValidator::new(post_schema()).expect("validator");
        let mut store = MemoryStore::new();
        let host_digest = |_: &Value| "host-digest".to_string();
        let mut ctx = LoadContext::new(&mut store).with_digest(&host_digest);

        process_item(Ok(post_value("p1", "First")), &validator, &mut ctx);
        assert_eq!(
            store.get("p1").map(|entry| entry.digest.as_str()),
            Some("host-digest")
        );
    }

    #[test]
    fn rendered_html_is_passed_through() {
        let validator = SchemaValidator::new(post_schema()).expect("validator");
        let mut store = MemoryStore::new();
        let mut ctx = LoadContext::new(&mut store);

        process_item(Ok(post_value("p1", "First")), &validator, &mut ctx);
        assert_eq!(
            store
                .get("p1")
                .and_then(|entry| entry.rendered_html.as_deref()),
            Some("<p>hi</p>")
        );
    }

    #[test]
    fn transform_failure_is_counted() {
        let validator = SchemaValidator::new(post_schema()).expect("validator");
        let mut store = MemoryStore::new();
        let mut ctx = LoadContext::new(&mut store);

        let outcome = process_item(
            Err(PipelineError::Process {
                message: "boom".to_string(),
            }),
            &validator,
            &mut ctx,
        );
        assert!(matches!(
            outcome,
            ItemOutcome::Failed(PipelineError::Process { .. })
        ));
        assert!(store.is_empty());
    }
}
