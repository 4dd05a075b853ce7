use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::domain::{Patient, PatientPage};
use super::observer::{AssessmentEvent, AssessmentObserver, TracingObserver};

/// Collaborator providing one page of patients at a time.
#[async_trait]
pub trait PagedPatientSource: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PatientPage, SourceError>;
}

/// Failure reported by a paged source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP 429. `retry_after` carries the server-suggested delay when one was sent.
    #[error("rate limited by patient source")]
    RateLimited { retry_after: Option<Duration> },
    #[error("patient source returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("patient source unreachable: {0}")]
    Transport(String),
    #[error("unrecognized response structure for page {page}")]
    UnrecognizedResponse { page: u32 },
}

/// Paging and rate-limit behavior for [`PatientFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    pub page_limit: u32,
    pub max_rate_limit_retries: u32,
    pub default_retry_after: Duration,
    pub page_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            page_limit: 5,
            max_rate_limit_retries: 5,
            default_retry_after: Duration::from_secs(5),
            page_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("page {page} still rate limited after {retries} retries")]
    RateLimitExhausted { page: u32, retries: u32 },
    #[error("failed to fetch page {page}: {source}")]
    Source {
        page: u32,
        #[source]
        source: SourceError,
    },
}

/// Sequential paginator over a [`PagedPatientSource`].
pub struct PatientFetcher<S> {
    source: Arc<S>,
    policy: FetchPolicy,
    observer: Arc<dyn AssessmentObserver>,
}

impl<S> PatientFetcher<S>
where
    S: PagedPatientSource + 'static,
{
    pub fn new(source: Arc<S>, policy: FetchPolicy) -> Self {
        Self::with_observer(source, policy, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        source: Arc<S>,
        policy: FetchPolicy,
        observer: Arc<dyn AssessmentObserver>,
    ) -> Self {
        Self {
            source,
            policy,
            observer,
        }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetches every page starting at page 1 and returns the patients in page order.
    pub async fn fetch_all_patients(&self) -> Result<Vec<Patient>, FetchError> {
        let mut patients = Vec::new();
        let mut page = 1;

        loop {
            let response = self.fetch_page_with_retry(page).await?;

            let Some(data) = response.data else {
                self.observer
                    .on_event(&AssessmentEvent::MalformedPage { page });
                break;
            };

            let pagination = response.pagination.unwrap_or_default();
            let request_id = response
                .metadata
                .map(|metadata| metadata.request_id)
                .filter(|id| !id.is_empty());
            self.observer.on_event(&AssessmentEvent::PageFetched {
                page,
                records: data.len(),
                has_next: pagination.has_next,
                request_id,
            });
            patients.extend(data);

            if !pagination.has_next {
                break;
            }
            if pagination.total_pages > 0 && page >= pagination.total_pages {
                self.observer.on_event(&AssessmentEvent::PagingCapped {
                    page,
                    total_pages: pagination.total_pages,
                });
                break;
            }

            page += 1;
            if !self.policy.page_delay.is_zero() {
                tokio::time::sleep(self.policy.page_delay).await;
            }
        }

        self.observer.on_event(&AssessmentEvent::PatientsFetched {
            count: patients.len(),
        });
        Ok(patients)
    }

    async fn fetch_page_with_retry(&self, page: u32) -> Result<PatientPage, FetchError> {
        let mut retries = 0;

        loop {
            match self.source.fetch_page(page, self.policy.page_limit).await {
                Ok(response) => return Ok(response),
                Err(SourceError::RateLimited { retry_after }) => {
                    if retries >= self.policy.max_rate_limit_retries {
                        return Err(FetchError::RateLimitExhausted { page, retries });
                    }
                    retries += 1;

                    let delay = retry_after.unwrap_or(self.policy.default_retry_after);
                    self.observer.on_event(&AssessmentEvent::RateLimited {
                        page,
                        retry: retries,
                        delay,
                    });
                    tokio::time::sleep(delay).await;
                }
                Err(source) => return Err(FetchError::Source { page, source }),
            }
        }
    }
}
