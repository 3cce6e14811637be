//! Sales (orders) and payment methods.

use serde_json::Value;

use super::keys;
use crate::api::{ApiClient, HttpMethod};
use crate::cache::QueryKey;
use crate::error::ApiResult;
use crate::models::{PaymentMethod, Sale};
use crate::period::DateRange;
use crate::validation::SalesUpdateForm;

pub async fn list_sales(client: &ApiClient) -> ApiResult<Vec<Sale>> {
    client.get_data(QueryKey::new(keys::SALES), "/sales", &[]).await
}

pub async fn get_sale(client: &ApiClient, id: u64) -> ApiResult<Sale> {
    client.get_one(&format!("/sales/{id}")).await
}

pub async fn update_sale(client: &ApiClient, id: u64, form: &SalesUpdateForm) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Put,
            &format!("/sales/{id}"),
            Some(serde_json::to_value(form)?),
            &[keys::SALES, keys::SALES_REPORT, keys::ANALYTICS, keys::DAYBOOK],
        )
        .await
}

pub async fn delete_sale(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client
        .mutate(
            HttpMethod::Delete,
            &format!("/sales/{id}"),
            None,
            &[keys::SALES, keys::SALES_REPORT, keys::ANALYTICS, keys::DAYBOOK],
        )
        .await
}

/// Sales inside `range`, as listed by `/reports/sales`.
pub async fn sales_in_range(client: &ApiClient, range: &DateRange) -> ApiResult<Vec<Sale>> {
    let key = range.query_key(keys::SALES_REPORT);
    let params = range.query_params();
    client.get_data(key, "/reports/sales", &params).await
}

pub async fn payment_methods(client: &ApiClient) -> ApiResult<Vec<PaymentMethod>> {
    client
        .get_data(QueryKey::new(keys::PAYMENT_METHODS), "/payment-methods", &[])
        .await
}
