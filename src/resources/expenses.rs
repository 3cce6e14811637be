//! Expenses and expense categories.

use serde_json::Value;

use super::keys;
use crate::api::{ApiClient, HttpMethod};
use crate::cache::QueryKey;
use crate::error::ApiResult;
use crate::models::{Expense, ExpenseCategory};
use crate::period::DateRange;
use crate::validation::ExpenseForm;

const EXPENSE_TOUCHES: &[&str] = &[
    keys::EXPENSES,
    keys::EXPENSE_REPORT,
    keys::ANALYTICS,
    keys::DAYBOOK,
    keys::PARTIES,
];

pub async fn list_expenses(client: &ApiClient) -> ApiResult<Vec<Expense>> {
    client
        .get_data(QueryKey::new(keys::EXPENSES), "/expenses", &[])
        .await
}

pub async fn create_expense(client: &ApiClient, form: &ExpenseForm) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Post,
            "/expenses",
            Some(serde_json::to_value(form)?),
            EXPENSE_TOUCHES,
        )
        .await
}

pub async fn delete_expense(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client
        .mutate(HttpMethod::Delete, &format!("/expenses/{id}"), None, EXPENSE_TOUCHES)
        .await
}

pub async fn expense_categories(client: &ApiClient) -> ApiResult<Vec<ExpenseCategory>> {
    client
        .get_data(
            QueryKey::new(keys::EXPENSE_CATEGORIES),
            "/expense-categories",
            &[],
        )
        .await
}

/// Expenses inside `range`, as listed by `/reports/expenses`.
pub async fn expenses_in_range(client: &ApiClient, range: &DateRange) -> ApiResult<Vec<Expense>> {
    let key = range.query_key(keys::EXPENSE_REPORT);
    let params = range.query_params();
    client.get_data(key, "/reports/expenses", &params).await
}
