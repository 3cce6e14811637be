//! Dining tables and the carts open on them.

use serde::Serialize;
use serde_json::Value;

use super::keys;
use crate::api::{decode_data, unwrap_envelope, ApiClient, HttpMethod};
use crate::cache::QueryKey;
use crate::error::ApiResult;
use crate::models::{Cart, Table, TableStatus};
use crate::validation::TableForm;

pub async fn list_tables(client: &ApiClient) -> ApiResult<Vec<Table>> {
    client
        .get_data(QueryKey::new(keys::TABLES), "/tables", &[])
        .await
}

pub async fn create_table(client: &ApiClient, form: &TableForm) -> ApiResult<Value> {
    form.validate_create()?;
    client
        .mutate(
            HttpMethod::Post,
            "/tables",
            Some(serde_json::to_value(form)?),
            &[keys::TABLES],
        )
        .await
}

pub async fn update_table(client: &ApiClient, id: u64, form: &TableForm) -> ApiResult<Value> {
    form.validate_update()?;
    client
        .mutate(
            HttpMethod::Put,
            &format!("/tables/{id}"),
            Some(serde_json::to_value(form)?),
            &[keys::TABLES],
        )
        .await
}

pub async fn delete_table(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client
        .mutate(
            HttpMethod::Delete,
            &format!("/tables/{id}"),
            None,
            &[keys::TABLES],
        )
        .await
}

/// Carts open on table `id`. Fetched fresh every time.
pub async fn table_orders(client: &ApiClient, id: u64) -> ApiResult<Vec<Cart>> {
    let body = client
        .request(HttpMethod::Get, &format!("/tables/{id}"), &[], None)
        .await?;
    decode_data(unwrap_envelope(body)?)
}

pub fn orders_total(carts: &[Cart]) -> f64 {
    carts.iter().map(Cart::total).sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStatusCounts {
    pub total: usize,
    pub available: usize,
    pub unavailable: usize,
    pub reserved: usize,
}

pub fn status_counts(tables: &[Table]) -> TableStatusCounts {
    let mut counts = TableStatusCounts {
        total: tables.len(),
        ..Default::default()
    };
    for table in tables {
        match table.status {
            TableStatus::Available => counts.available += 1,
            TableStatus::Unavailable => counts.unavailable += 1,
            TableStatus::Reserved => counts.reserved += 1,
            TableStatus::Other => {}
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, ok, ScriptedTransport};
    use crate::error::ApiError;
    use crate::session::Session;
    use serde_json::json;

    #[tokio::test]
    async fn counts_by_status() {
        let transport = ScriptedTransport::new();
        transport.on_get(
            "/tables",
            ok(json!([
                { "id": 1, "name": "T1", "status": "available" },
                { "id": 2, "name": "T2", "status": "reserved" },
                { "id": 3, "name": "T3", "status": "available" },
                { "id": 4, "name": "Patio", "status": "cleaning" },
            ])),
        );
        let client = client_with(transport, Session::for_user("1"));

        let tables = list_tables(&client).await.expect("tables");
        let counts = status_counts(&tables);

        assert_eq!(
            counts,
            TableStatusCounts {
                total: 4,
                available: 2,
                unavailable: 0,
                reserved: 1,
            }
        );
    }

    #[tokio::test]
    async fn table_orders_sum_cart_items() {
        let transport = ScriptedTransport::new();
        transport.on_get(
            "/tables/2",
            ok(json!([
                { "id": 7, "status": "open", "CartItems": [
                    { "id": 1, "itemName": "Chicken Momo", "quantity": 2, "totalPrice": 360 },
                    { "id": 2, "itemName": "Masala Tea", "quantity": 1, "totalPrice": 40 },
                ] },
                { "id": 8, "status": "pending", "CartItems": [] },
            ])),
        );
        let client = client_with(transport, Session::for_user("1"));

        let carts = table_orders(&client, 2).await.expect("orders");

        assert_eq!(carts[0].total(), 400.0);
        assert_eq!(carts[1].total(), 0.0);
        assert_eq!(orders_total(&carts), 400.0);
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let transport = ScriptedTransport::new();
        transport.on(HttpMethod::Put, "/tables/3", 200, ok(json!({ "id": 3 })));
        let client = client_with(transport.clone(), Session::for_user("1"));
        let form = TableForm {
            name: None,
            status: Some(TableStatus::Reserved),
        };

        update_table(&client, 3, &form).await.expect("update");

        let body = transport.calls()[0].body.clone().expect("body");
        assert_eq!(body, json!({ "status": "reserved" }));
    }

    #[tokio::test]
    async fn nameless_table_is_not_created() {
        let transport = ScriptedTransport::new();
        let client = client_with(transport.clone(), Session::for_user("1"));

        let err = create_table(&client, &TableForm::default())
            .await
            .expect_err("invalid");
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.calls().is_empty());
    }
}
