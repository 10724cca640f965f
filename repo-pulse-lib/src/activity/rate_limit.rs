use super::transport::{Endpoint, Target, Transport};
use super::ActivityError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const LOG_TARGET: &str = " ratelimit";
const RATE_LIMIT_PATH: &str = "/rate_limit";

/// Remaining request quota as reported by the quota endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub remaining: u64,
    pub reset_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RateLimitDocument {
    rate: RateSection,
}

#[derive(Debug, Deserialize)]
struct RateSection {
    remaining: u64,
    #[serde(default)]
    reset: Option<i64>,
}

/// Queries the remaining request quota.
#[derive(Debug)]
pub struct RateLimitGuard<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> RateLimitGuard<'a, T> {
    pub const fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch the current quota.
    ///
    /// An unreadable quota document is a [`ActivityError::ServerError`]; callers should treat it as
    /// "quota unknown", never as zero.
    pub async fn quota(&self) -> Result<Quota, ActivityError> {
        let endpoint = Endpoint::new(RATE_LIMIT_PATH);
        let response = self.transport.get(Target::Endpoint(&endpoint)).await?;

        let doc: RateLimitDocument = serde_json::from_slice(&response.body).map_err(|e| ActivityError::ServerError {
            status: None,
            detail: format!("unreadable quota document from {RATE_LIMIT_PATH}: {e}"),
        })?;

        let quota = Quota {
            remaining: doc.rate.remaining,
            reset_at: doc.rate.reset.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        };

        log::debug!(target: LOG_TARGET, "{} request(s) remaining", quota.remaining);
        Ok(quota)
    }

    pub async fn remaining(&self) -> Result<u64, ActivityError> {
        self.quota().await.map(|q| q.remaining)
    }

    /// Fail with [`ActivityError::QuotaExhausted`] when no requests remain.
    ///
    /// When the quota cannot be determined the check passes: the run proceeds and any real
    /// exhaustion surfaces through the fetch path instead.
    pub async fn ensure_available(&self) -> Result<(), ActivityError> {
        match self.quota().await {
            Ok(Quota { remaining: 0, reset_at }) => {
                log::warn!(target: LOG_TARGET, "Request quota exhausted");
                Err(ActivityError::QuotaExhausted { reset_at })
            }
            Ok(_) => Ok(()),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not determine remaining request quota: {e}");
                Ok(())
            }
        }
    }
}
