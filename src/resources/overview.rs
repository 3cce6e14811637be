//! Dashboard landing page: server summary plus today's sales and expenses.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::{expenses, keys, sales};
use crate::api::ApiClient;
use crate::cache::QueryKey;
use crate::models::{Expense, Sale};
use crate::period::TimePeriod;
use crate::query::Query;
use crate::report::{summarize, Summary};

#[derive(Debug)]
pub struct Overview {
    /// `/summary` payload, shape left to the server.
    pub summary: Query<Value>,
    pub sales: Query<Vec<Sale>>,
    pub expenses: Query<Vec<Expense>>,
}

impl Overview {
    pub fn sales_totals(&self) -> Summary {
        summarize(&self.sales.data)
    }

    pub fn expense_totals(&self) -> Summary {
        summarize(&self.expenses.data)
    }

    pub fn notices(&self) -> impl Iterator<Item = &str> {
        [&self.summary.notice, &self.sales.notice, &self.expenses.notice]
            .into_iter()
            .filter_map(|n| n.as_deref())
    }
}

/// Issue the three lookups concurrently. Each settles on its own, so one
/// failing does not hide the others.
pub async fn overview(client: &ApiClient, today: NaiveDate) -> Overview {
    let range = TimePeriod::Today.range_ending(today);
    let (summary, sales, expenses) = tokio::join!(
        client.get_value(QueryKey::new(keys::SUMMARY), "/summary", &[]),
        sales::sales_in_range(client, &range),
        expenses::expenses_in_range(client, &range),
    );
    debug!("overview lookups settled");

    Overview {
        summary: Query::settle(summary, "Error getting summary"),
        sales: Query::settle(sales, "Error getting sales"),
        expenses: Query::settle(expenses, "Error getting expenses"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, ok, ScriptedTransport};
    use crate::period::parse_date;
    use crate::session::Session;
    use serde_json::json;

    #[tokio::test]
    async fn one_failure_leaves_the_rest_intact() {
        let transport = ScriptedTransport::new();
        transport.on_get("/summary", ok(json!({ "totalTables": 12 })));
        transport.on_get(
            "/reports/sales",
            ok(json!([
                { "id": 1, "invoiceNumber": "INV-1", "total": 300,
                  "paymentStatus": "paid", "orderStatus": "served", "orderType": "dine-in" },
                { "id": 2, "invoiceNumber": "INV-2", "total": 500,
                  "paymentStatus": "pending", "orderStatus": "pending", "orderType": "delivery" },
            ])),
        );
        let client = client_with(transport.clone(), Session::for_user("1"));

        let view = overview(&client, parse_date("2026-10-16").expect("date")).await;

        assert_eq!(view.summary.data["totalTables"], json!(12));
        assert_eq!(view.sales_totals().total, 800.0);
        assert!(view.expenses.is_error());
        assert_eq!(view.expense_totals().count, 0);
        assert_eq!(view.notices().count(), 1);
        assert_eq!(transport.calls().len(), 3);
    }
}
