//! Server-side analytics report.

use super::keys;
use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::AnalyticsReport;
use crate::period::DateRange;

pub async fn analytics(client: &ApiClient, range: &DateRange) -> ApiResult<AnalyticsReport> {
    let key = range.query_key(keys::ANALYTICS);
    let params = range.query_params();
    client.get_data(key, "/reports/analytics", &params).await
}
