//! Daily cash book.

use chrono::NaiveDate;
use serde_json::Value;

use super::keys;
use crate::api::{decode_data, ApiClient};
use crate::cache::QueryKey;
use crate::error::ApiResult;
use crate::models::{Daybook, DaybookSummary, DaybookToday, DaybookTransaction};

/// Daybook for `date`, or for today when `date` is `None` or equals `today`.
///
/// Today's summary comes with its transactions. Historical days only have a
/// summary, so their transaction list is empty.
pub async fn daybook(
    client: &ApiClient,
    date: Option<NaiveDate>,
    today: NaiveDate,
) -> ApiResult<Daybook> {
    match date.filter(|d| *d != today) {
        None => {
            let data = client
                .get_value(
                    QueryKey::new(keys::DAYBOOK).with("date", "today"),
                    "/daybook/today-summary",
                    &[],
                )
                .await?;
            decode_today(data)
        }
        Some(day) => {
            let day = day.format("%Y-%m-%d").to_string();
            let summary: DaybookSummary = client
                .get_data(
                    QueryKey::new(keys::DAYBOOK).with("date", &day),
                    &format!("/daybook/summary/{day}"),
                    &[],
                )
                .await?;
            Ok(Daybook {
                summary,
                transactions: Vec::new(),
            })
        }
    }
}

/// Today's payload nests the summary under `summary`; older backends put the
/// summary fields at the top level next to `transactions`.
fn decode_today(data: Value) -> ApiResult<Daybook> {
    if data.get("summary").is_some() {
        let today: DaybookToday = decode_data(data)?;
        return Ok(Daybook {
            summary: today.summary,
            transactions: today.transactions,
        });
    }
    let transactions: Vec<DaybookTransaction> = decode_data(
        data.get("transactions").cloned().unwrap_or(Value::Null),
    )?;
    let summary: DaybookSummary = decode_data(data)?;
    Ok(Daybook {
        summary,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, ok, ScriptedTransport};
    use crate::models::DaybookTransactionType;
    use crate::period::parse_date;
    use crate::session::Session;
    use serde_json::json;

    fn today() -> NaiveDate {
        parse_date("2026-10-16").expect("date")
    }

    #[tokio::test]
    async fn today_includes_transactions() {
        let transport = ScriptedTransport::new();
        transport.on_get(
            "/daybook/today-summary",
            ok(json!({
                "summary": {
                    "openingBalance": { "cash": 5000, "online": 0 },
                    "sales": { "cash": 3200, "online": 1800, "count": 14 },
                    "expenses": { "cash": 900, "online": 0, "count": 2 },
                    "netCash": 7300, "netOnline": 1800, "totalNet": 9100
                },
                "transactions": [
                    { "id": 1, "transactionType": "opening_balance", "amount": 5000 },
                    { "id": 2, "transactionType": "sale", "paymentMode": "cash", "amount": 450 }
                ]
            })),
        );
        let client = client_with(transport.clone(), Session::for_user("1"));

        let book = daybook(&client, Some(today()), today()).await.expect("daybook");

        assert_eq!(transport.paths(), vec!["/daybook/today-summary"]);
        assert_eq!(book.summary.sales.total(), 5000.0);
        assert_eq!(book.summary.sales.count, Some(14));
        assert_eq!(book.transactions.len(), 2);
        assert_eq!(
            book.transactions[0].transaction_type,
            DaybookTransactionType::OpeningBalance
        );
    }

    #[tokio::test]
    async fn historical_day_has_no_transactions() {
        let transport = ScriptedTransport::new();
        transport.on_get(
            "/daybook/summary/2026-10-12",
            ok(json!({
                "date": "2026-10-12",
                "openingBalance": { "cash": 4000, "online": 200 },
                "totalNet": 6100
            })),
        );
        let client = client_with(transport, Session::for_user("1"));

        let day = parse_date("2026-10-12").expect("date");
        let book = daybook(&client, Some(day), today()).await.expect("daybook");

        assert!(book.transactions.is_empty());
        assert_eq!(book.summary.opening_balance.total(), 4200.0);
        assert_eq!(book.summary.total_net, 6100.0);
    }

    #[test]
    fn flat_today_payload_is_accepted() {
        let book = decode_today(json!({
            "netCash": 100,
            "transactions": [{ "id": 3, "transactionType": "expense", "amount": 80 }]
        }))
        .expect("flat");
        assert_eq!(book.summary.net_cash, 100.0);
        assert_eq!(book.transactions[0].amount, 80.0);
    }
}
