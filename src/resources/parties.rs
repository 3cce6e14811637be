//! Parties (customers and suppliers) and their ledgers.

use serde_json::Value;
use tracing::debug;

use super::keys;
use crate::api::{decode_data, unwrap_envelope, ApiClient, HttpMethod};
use crate::cache::QueryKey;
use crate::error::ApiResult;
use crate::models::{Party, PartyTransaction};
use crate::probe::{probe_first, PartyTransactionRoute};
use crate::validation::{PartyForm, PartyTransactionForm};

pub async fn list_parties(client: &ApiClient) -> ApiResult<Vec<Party>> {
    client
        .get_data(QueryKey::new(keys::PARTIES), "/parties", &[])
        .await
}

pub async fn create_party(client: &ApiClient, form: &PartyForm) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Post,
            "/parties",
            Some(serde_json::to_value(form)?),
            &[keys::PARTIES],
        )
        .await
}

/// Ledger of one party, found by probing the known transaction routes.
///
/// A zero id is "no party selected" and yields an empty ledger without any
/// request. The successful result is cached like any other read; which route
/// answered is not remembered.
pub async fn party_transactions(
    client: &ApiClient,
    party_id: u64,
) -> ApiResult<Vec<PartyTransaction>> {
    if party_id == 0 {
        return Ok(Vec::new());
    }

    let key = QueryKey::new(keys::PARTY_TRANSACTIONS).with("partyId", party_id);
    if let Some(hit) = client.cache().get(&key) {
        return decode_data(hit);
    }

    let candidates = PartyTransactionRoute::candidates(party_id);
    // Only the HTTP status steers the probe; an error envelope on a 2xx
    // answer ends it like any other answer.
    let body = probe_first(&candidates, |path| async move {
        client.request(HttpMethod::Get, &path, &[], None).await
    })
    .await?;
    let data = unwrap_envelope(body)?;

    debug!(party_id, "party ledger fetched");
    client.cache().put(key, data.clone());
    decode_data(data)
}

pub async fn add_party_transaction(
    client: &ApiClient,
    form: &PartyTransactionForm,
) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Post,
            "/parties/transactions",
            Some(serde_json::to_value(form)?),
            &[keys::PARTIES, keys::PARTY_TRANSACTIONS],
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, ok, ScriptedTransport};
    use crate::models::EntryType;
    use crate::report::ledger_summary;
    use crate::session::Session;
    use serde_json::json;

    fn ledger() -> Value {
        ok(json!([
            { "id": 1, "partyId": 8, "type": "credit", "amount": 100,
              "balanceBefore": 0, "balanceAfter": 100, "description": "Cash receipt" },
            { "id": 2, "partyId": 8, "type": "debit", "amount": 40,
              "balanceBefore": 100, "balanceAfter": 60, "description": "Cash paid" },
        ]))
    }

    #[tokio::test]
    async fn probe_uses_third_route_and_skips_fourth() {
        let transport = ScriptedTransport::new();
        transport.on_get("/parties/transactions/8", ledger());
        transport.on_get("/party/transactions/8", ok(json!([])));
        let client = client_with(transport.clone(), Session::for_user("1"));

        let entries = party_transactions(&client, 8).await.expect("ledger");

        assert_eq!(entries.len(), 2);
        assert_eq!(
            transport.paths(),
            vec![
                "/party/transaactions/8",
                "/parties/8/transactions",
                "/parties/transactions/8",
            ]
        );
        let summary = ledger_summary(&entries);
        assert_eq!(summary.net, 60.0);
    }

    #[tokio::test]
    async fn server_error_stops_probing() {
        let transport = ScriptedTransport::new();
        transport.on(
            HttpMethod::Get,
            "/parties/8/transactions",
            500,
            json!({ "message": "database down" }),
        );
        transport.on_get("/parties/transactions/8", ledger());
        let client = client_with(transport.clone(), Session::for_user("1"));

        let err = party_transactions(&client, 8).await.expect_err("500");
        assert_eq!(err.status(), Some(500));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn error_envelope_on_success_status_stops_at_that_route() {
        let transport = ScriptedTransport::new();
        transport.on_get(
            "/parties/8/transactions",
            json!({ "statusCode": 404, "status": false, "message": "Party has no ledger" }),
        );
        transport.on_get("/parties/transactions/8", ledger());
        let client = client_with(transport.clone(), Session::for_user("1"));

        let err = party_transactions(&client, 8).await.expect_err("envelope error");

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Party has no ledger (HTTP 404)");
        assert_eq!(
            transport.paths(),
            vec!["/party/transaactions/8", "/parties/8/transactions"]
        );
        assert!(client
            .cache()
            .get(&QueryKey::new(keys::PARTY_TRANSACTIONS).with("partyId", 8u64))
            .is_none());
    }

    #[tokio::test]
    async fn cached_ledger_skips_probing() {
        let transport = ScriptedTransport::new();
        transport.on_get("/parties/8/transactions", ledger());
        let client = client_with(transport.clone(), Session::for_user("1"));

        party_transactions(&client, 8).await.expect("first");
        party_transactions(&client, 8).await.expect("second");

        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn no_party_selected_makes_no_request() {
        let transport = ScriptedTransport::new();
        let client = client_with(transport.clone(), Session::for_user("1"));
        assert!(party_transactions(&client, 0).await.expect("empty").is_empty());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn adding_a_transaction_drops_cached_ledgers() {
        let transport = ScriptedTransport::new();
        transport.on_get("/parties/8/transactions", ledger());
        transport.on(
            HttpMethod::Post,
            "/parties/transactions",
            201,
            ok(json!({ "id": 3 })),
        );
        let client = client_with(transport.clone(), Session::for_user("1"));

        party_transactions(&client, 8).await.expect("prime");
        add_party_transaction(
            &client,
            &PartyTransactionForm {
                party_id: 8,
                entry_type: EntryType::Debit,
                amount: 25.0,
                reference: Some("CHQ-11".into()),
                description: "Cash paid".into(),
                created_by: Some(1),
            },
        )
        .await
        .expect("add");
        party_transactions(&client, 8).await.expect("refetch");

        let probes = transport
            .paths()
            .iter()
            .filter(|p| p.as_str() == "/party/transaactions/8")
            .count();
        assert_eq!(probes, 2);
    }
}
