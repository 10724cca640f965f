//! The seam between the aggregation engine and the HTTP layer.

use super::ActivityError;
use core::fmt::{Display, Formatter};

/// Opaque pointer to the next page of a paginated resource.
///
/// Produced by a [`Transport`] from response metadata and handed back to it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContinuationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resource path relative to the API root plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    query: Vec<(&'static str, String)>,
}

impl Endpoint {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.path)?;
        for (index, (name, value)) in self.query.iter().enumerate() {
            let sep = if index == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

/// What to request: the first page of an endpoint, or a page reached through a continuation token.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Endpoint(&'a Endpoint),
    Continuation(&'a ContinuationToken),
}

/// A successful response body together with the pointer to the following page, if any.
#[derive(Debug, Clone)]
pub struct Response {
    pub body: Vec<u8>,
    pub next: Option<ContinuationToken>,
}

/// Issues one GET request at a time.
///
/// Implementations map non-success statuses to [`ActivityError::ServerError`] so callers only
/// ever see bodies of successful responses.
pub trait Transport: Send + Sync {
    fn get(&self, target: Target<'_>) -> impl Future<Output = Result<Response, ActivityError>> + Send;
}
