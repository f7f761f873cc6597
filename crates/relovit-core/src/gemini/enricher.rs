//! Enrichment runs: apply a set of tasks to one product.
//!
//! Tasks always run one after another in a fixed order (description, price,
//! taxonomy, image). A failed task is logged and recorded in the report and
//! the run moves on to the next task.

use super::client::GeminiClient;
use super::retry;
use crate::config::EnrichmentConfig;
use crate::error::{EnrichError, EnrichResult};
use crate::prompts::PriceRange;
use crate::types::{EnrichmentReport, EnrichmentTask, ProductDraft, ProductStatus, TaskFailure};
use std::future::Future;

/// Configuration for the enrichment engine.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Extra attempts per task after a transient failure
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self::from(&EnrichmentConfig::default())
    }
}

impl From<&EnrichmentConfig> for EnrichOptions {
    fn from(config: &EnrichmentConfig) -> Self {
        Self {
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        }
    }
}

/// Sequential enrichment engine.
pub struct Enricher {
    client: GeminiClient,
    options: EnrichOptions,
}

impl Enricher {
    pub fn new(client: GeminiClient, options: EnrichOptions) -> Self {
        Self { client, options }
    }

    /// Access the underlying client (e.g. for object identification).
    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    /// Run the requested tasks against `draft`.
    ///
    /// Returns an error only when the run cannot start (no tasks, no images,
    /// or `identify` in the task list). Individual task failures end up in
    /// [`EnrichmentReport::failures`].
    pub async fn enrich(
        &self,
        draft: &ProductDraft,
        tasks: &[EnrichmentTask],
    ) -> EnrichResult<EnrichmentReport> {
        if tasks.is_empty() {
            return Err(EnrichError::NoTasks);
        }
        if tasks.contains(&EnrichmentTask::Identify) {
            return Err(EnrichError::InvalidTask(
                "identify is not an enrichment task".to_string(),
            ));
        }
        if draft.images.is_empty() {
            return Err(EnrichError::NoImages);
        }

        let price_range = draft.price_range.as_deref().map(PriceRange::parse_or_default);
        let mut report = EnrichmentReport::new(&draft.name);

        for task in EnrichmentTask::ENRICHMENT_ORDER {
            if !tasks.contains(&task) {
                continue;
            }
            tracing::info!("Running {task} for {:?}", draft.name);

            let outcome = match task {
                EnrichmentTask::Description => self
                    .with_retry(task, move || {
                        self.client.generate_description(&draft.name, &draft.images)
                    })
                    .await
                    .map(|description| report.description = Some(description)),
                EnrichmentTask::Price => self
                    .with_retry(task, move || {
                        self.client
                            .generate_price(&draft.name, &draft.images, price_range)
                    })
                    .await
                    .map(|price| report.price = Some(price)),
                EnrichmentTask::Taxonomy => self
                    .with_retry(task, move || {
                        self.client
                            .generate_taxonomy_terms(&draft.name, &draft.images)
                    })
                    .await
                    .map(|terms| {
                        if terms.is_empty() {
                            tracing::warn!("AI suggested no category or tags for {:?}", draft.name);
                        } else {
                            report.taxonomy = Some(terms);
                        }
                    }),
                EnrichmentTask::Image => self
                    .with_retry(task, move || self.client.generate_image(&draft.images[0]))
                    .await
                    .map(|image| report.image = Some(image)),
                EnrichmentTask::Identify => Ok(()),
            };

            if let Err(e) = outcome {
                tracing::warn!("Skipping {task} for {:?}: {e}", draft.name);
                report.failures.push(TaskFailure {
                    task,
                    error: e.to_string(),
                });
            }
        }

        report.status = ProductStatus::Pending;
        log_enrichment_stats(&report, tasks.len());
        Ok(report)
    }

    async fn with_retry<T, F, Fut>(&self, task: EnrichmentTask, mut op: F) -> EnrichResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = EnrichResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.options.retry_attempts && retry::is_retryable(&e) => {
                    let delay = retry::backoff_duration(attempt, self.options.retry_delay_ms);
                    attempt += 1;
                    tracing::debug!(
                        "Retry {attempt}/{} for {task} after {delay:?}: {e}",
                        self.options.retry_attempts
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn log_enrichment_stats(report: &EnrichmentReport, requested: usize) {
    let failed = report.failures.len();
    if failed > 0 {
        tracing::warn!(
            "Enrichment of {:?}: {} of {} tasks failed",
            report.product_name,
            failed,
            requested
        );
    } else {
        tracing::info!("Enrichment of {:?} complete", report.product_name);
    }
}
