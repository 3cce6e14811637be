//! Result of a view-level fetch.
//!
//! Views never abort on a failed fetch. They take a [`Query`], render
//! `data` (the empty value on failure) and show `notice` if one is set.

use tracing::warn;

use crate::error::{ApiError, ApiResult};

#[derive(Debug)]
pub struct Query<T> {
    pub data: T,
    pub error: Option<ApiError>,
    /// User-facing line such as "Error getting sales: <reason>".
    pub notice: Option<String>,
}

impl<T: Default> Query<T> {
    /// Collapse a fetch result. `context` names what was being loaded and
    /// becomes the first half of the notice.
    pub fn settle(result: ApiResult<T>, context: &str) -> Self {
        match result {
            Ok(data) => Self {
                data,
                error: None,
                notice: None,
            },
            Err(e) => {
                warn!(context, error = %e, "fetch failed, rendering empty state");
                let notice = format!("{context}: {e}");
                Self {
                    data: T::default(),
                    error: Some(e),
                    notice: Some(notice),
                }
            }
        }
    }

    /// A query that was never issued (e.g. an incomplete custom date range).
    pub fn idle() -> Self {
        Self {
            data: T::default(),
            error: None,
            notice: None,
        }
    }
}

impl<T> Query<T> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_renders_empty_data_with_notice() {
        let q: Query<Vec<u32>> = Query::settle(
            Err(ApiError::Network("Cannot reach dashboard API at http://x".into())),
            "Error getting sales",
        );
        assert!(q.data.is_empty());
        assert!(q.is_error());
        assert_eq!(
            q.notice.as_deref(),
            Some("Error getting sales: Cannot reach dashboard API at http://x")
        );
    }

    #[test]
    fn success_has_no_notice() {
        let q = Query::settle(Ok(vec![1, 2]), "Error getting users");
        assert_eq!(q.data, vec![1, 2]);
        assert!(q.notice.is_none());
    }
}
