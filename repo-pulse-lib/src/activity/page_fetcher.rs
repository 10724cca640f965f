use super::rate_limit::RateLimitGuard;
use super::transport::{ContinuationToken, Endpoint, Target, Transport};
use super::{ActivityError, FormatCause};
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "     fetch";

/// One batch of entities plus the pointer to the next batch, if any.
#[derive(Debug, Clone)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub next: Option<ContinuationToken>,
}

/// Decision of a page visitor on whether the pagination loop should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Fetches pages of one resource at a time, strictly in server order.
#[derive(Debug)]
pub struct PageFetcher<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> PageFetcher<'a, T> {
    pub const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch a single page of `endpoint`, either its first page or the one `token` points to.
    pub async fn fetch<E: DeserializeOwned>(&self, endpoint: &Endpoint, token: Option<&ContinuationToken>) -> Result<Page<E>, ActivityError> {
        let target = token.map_or(Target::Endpoint(endpoint), Target::Continuation);
        let response = self.transport.get(target).await?;

        let values: Vec<serde_json::Value> = match serde_json::from_slice(&response.body) {
            Ok(values) => values,
            Err(e) => return Err(self.diagnose_format_error(endpoint.path(), e.to_string()).await),
        };

        let items = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value)
                    .map_err(|e| ActivityError::MalformedEntity(format!("entry {index} of {}: {e}", endpoint.path())))
            })
            .collect::<Result<Vec<E>, _>>()?;

        Ok(Page { items, next: response.next })
    }

    /// Fetch a single non-paginated document.
    pub async fn fetch_document<D: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<D, ActivityError> {
        let response = self.transport.get(Target::Endpoint(endpoint)).await?;
        match serde_json::from_slice(&response.body) {
            Ok(doc) => Ok(doc),
            Err(e) => Err(self.diagnose_format_error(endpoint.path(), e.to_string()).await),
        }
    }

    /// Walk every page of `endpoint` in server order, handing each batch to `visit`.
    ///
    /// The loop ends when the server returns no continuation token or when `visit` returns
    /// [`Flow::Stop`]. Any failure aborts the walk; nothing is retried. Returns the number of
    /// requests issued.
    pub async fn for_each_page<E, F>(&self, endpoint: &Endpoint, mut visit: F) -> Result<u32, ActivityError>
    where
        E: DeserializeOwned,
        F: FnMut(Vec<E>) -> Result<Flow, ActivityError>,
    {
        let mut requests = 1;
        let mut page = self.fetch::<E>(endpoint, None).await?;

        loop {
            let Page { items, next } = page;
            log::debug!(target: LOG_TARGET, "Page {requests} of {} held {} item(s)", endpoint.path(), items.len());

            let flow = visit(items)?;
            let Some(token) = next else {
                break;
            };

            if flow == Flow::Stop {
                log::debug!(target: LOG_TARGET, "Stopping pagination of {} early after {requests} page(s)", endpoint.path());
                break;
            }

            requests += 1;
            page = self.fetch::<E>(endpoint, Some(&token)).await?;
        }

        Ok(requests)
    }

    /// Probe the quota to explain an unusable body.
    ///
    /// Costs one extra request. When the probe itself fails the quota state is unknown and
    /// the parser's message is reported unchanged.
    async fn diagnose_format_error(&self, resource: &str, detail: String) -> ActivityError {
        let cause = match RateLimitGuard::new(self.transport).remaining().await {
            Ok(0) => FormatCause::QuotaExhausted,
            Ok(_) => FormatCause::Invalid(detail),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Quota state unknown while diagnosing {resource}: {e}");
                FormatCause::Invalid(detail)
            }
        };

        log::warn!(target: LOG_TARGET, "Unusable response from {resource}: {cause}");
        ActivityError::ResponseFormat {
            resource: resource.to_string(),
            cause,
        }
    }
}
