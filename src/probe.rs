//! Route table for lookups the backend has exposed under more than one path.
//!
//! Party transactions have lived at several URLs across backend versions.
//! The known routes are listed in [`PartyTransactionRoute::PROBE_ORDER`] and
//! tried in that order: a 404 moves on to the next route, anything else
//! (success or a different error) ends the probe.

use std::future::Future;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyTransactionRoute {
    /// `/party/transaactions/{id}`, the misspelt route of the first release.
    LegacyMisspelt,
    /// `/parties/{id}/transactions`
    Nested,
    /// `/parties/transactions/{id}`
    PluralCollection,
    /// `/party/transactions/{id}`
    SingularCollection,
}

impl PartyTransactionRoute {
    pub const PROBE_ORDER: [PartyTransactionRoute; 4] = [
        PartyTransactionRoute::LegacyMisspelt,
        PartyTransactionRoute::Nested,
        PartyTransactionRoute::PluralCollection,
        PartyTransactionRoute::SingularCollection,
    ];

    pub fn path(self, party_id: u64) -> String {
        match self {
            PartyTransactionRoute::LegacyMisspelt => format!("/party/transaactions/{party_id}"),
            PartyTransactionRoute::Nested => format!("/parties/{party_id}/transactions"),
            PartyTransactionRoute::PluralCollection => {
                format!("/parties/transactions/{party_id}")
            }
            PartyTransactionRoute::SingularCollection => {
                format!("/party/transactions/{party_id}")
            }
        }
    }

    pub fn candidates(party_id: u64) -> Vec<String> {
        Self::PROBE_ORDER.iter().map(|r| r.path(party_id)).collect()
    }
}

/// Call `fetch` for each candidate in order until one does not 404.
///
/// Returns the first success, or the first non-404 error. When every
/// candidate 404s the last 404 is returned.
pub async fn probe_first<T, F, Fut>(candidates: &[String], mut fetch: F) -> ApiResult<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut last_not_found: Option<ApiError> = None;

    for candidate in candidates {
        debug!(path = %candidate, "probing route");
        match fetch(candidate.clone()).await {
            Ok(value) => {
                info!(path = %candidate, "route answered");
                return Ok(value);
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %candidate, "route not found, trying next");
                last_not_found = Some(e);
            }
            Err(e) => {
                warn!(path = %candidate, error = %e, "route failed with non-404 error");
                return Err(e);
            }
        }
    }

    Err(last_not_found
        .unwrap_or_else(|| ApiError::Config("no candidate routes to probe".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "Not Found".into(),
        }
    }

    #[test]
    fn candidate_paths_follow_probe_order() {
        assert_eq!(
            PartyTransactionRoute::candidates(12),
            vec![
                "/party/transaactions/12",
                "/parties/12/transactions",
                "/parties/transactions/12",
                "/party/transactions/12",
            ]
        );
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let candidates = PartyTransactionRoute::candidates(3);
        let tried = RefCell::new(Vec::new());

        let result = probe_first(&candidates, |path| {
            tried.borrow_mut().push(path.clone());
            let answer = if path == candidates[2] {
                Ok("third")
            } else {
                Err(not_found())
            };
            async move { answer }
        })
        .await;

        assert_eq!(result.expect("third answers"), "third");
        assert_eq!(tried.borrow().len(), 3);
        assert!(!tried.borrow().contains(&candidates[3]));
    }

    #[tokio::test]
    async fn non_404_error_ends_the_probe() {
        let candidates = PartyTransactionRoute::candidates(3);
        let mut calls = 0;

        let err = probe_first::<(), _, _>(&candidates, |_| {
            calls += 1;
            let answer = if calls == 2 {
                Err(ApiError::Status {
                    status: 500,
                    message: "boom".into(),
                })
            } else {
                Err(not_found())
            };
            async move { answer }
        })
        .await
        .expect_err("500 stops probing");

        assert_eq!(err.status(), Some(500));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn all_404_returns_not_found() {
        let candidates = PartyTransactionRoute::candidates(3);
        let err = probe_first::<(), _, _>(&candidates, |_| async { Err(not_found()) })
            .await
            .expect_err("nothing answers");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn empty_table_is_a_config_error() {
        let err = probe_first::<(), _, _>(&[], |_| async { Ok(()) })
            .await
            .expect_err("no routes");
        assert!(matches!(err, ApiError::Config(_)));
    }
}
