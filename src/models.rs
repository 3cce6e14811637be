//! Wire types for the dashboard REST API.
//!
//! Field names follow the backend (camelCase, with capitalised names for
//! embedded relations such as `Table` or `SalesItems`). Status-like enums
//! decode unknown values into `Other` so one odd row never fails a list.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ApiError, ApiResult};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// `{ statusCode, data, message, status }` wrapper around every response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<bool>,
}

/// Parse a wire name (`paid`, `dine-in`, ...) typed by a user into one of the
/// status enums. Values that would only land in the `Other` catch-all are
/// rejected.
pub fn parse_wire<T: DeserializeOwned + Serialize>(raw: &str) -> ApiResult<T> {
    let wanted = raw.trim().to_ascii_lowercase();
    let value: T = serde_json::from_value(serde_json::Value::String(wanted.clone()))?;
    match serde_json::to_value(&value) {
        Ok(serde_json::Value::String(s)) if s == wanted && s != "other" => Ok(value),
        _ => Err(ApiError::Validation(format!("unknown value '{raw}'"))),
    }
}

// ---------------------------------------------------------------------------
// Shared references
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Partial,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
    #[serde(other)]
    Other,
}

impl OrderType {
    pub fn label(self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeaway => "takeaway",
            OrderType::Delivery => "delivery",
            OrderType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    #[serde(default)]
    pub id: Option<u64>,
    pub item_name: String,
    pub quantity: u32,
    pub rate: f64,
    pub total_price: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_item_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePayment {
    pub id: u64,
    pub amount: f64,
    #[serde(rename = "PaymentMethod", default)]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: u64,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub table_id: Option<u64>,
    #[serde(default)]
    pub party_id: Option<u64>,
    #[serde(default)]
    pub payment_method_id: Option<u64>,
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total: f64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub order_type: OrderType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<u64>,
    #[serde(rename = "Table", default)]
    pub table: Option<TableRef>,
    #[serde(rename = "Party", default)]
    pub party: Option<PartyRef>,
    #[serde(rename = "PaymentMethod", default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "User", default)]
    pub user: Option<UserRef>,
    #[serde(rename = "SalesItems", default)]
    pub items: Vec<SaleItem>,
    #[serde(rename = "Payments", default)]
    pub payments: Vec<SalePayment>,
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub party_id: Option<u64>,
    #[serde(default)]
    pub payment_method_id: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<u64>,
    #[serde(rename = "ExpenseCategory", default)]
    pub category: Option<ExpenseCategory>,
    #[serde(rename = "Party", default)]
    pub party: Option<PartyRef>,
    #[serde(rename = "PaymentMethod", default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "User", default)]
    pub user: Option<UserRef>,
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    Customer,
    Supplier,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default = "default_party_type")]
    pub party_type: PartyType,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_party_type() -> PartyType {
    PartyType::Customer
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Credit,
    Debit,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyTransaction {
    pub id: u64,
    #[serde(default)]
    pub party_id: Option<u64>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: f64,
    #[serde(default)]
    pub balance_before: Option<f64>,
    #[serde(default)]
    pub balance_after: Option<f64>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Tables and carts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Unavailable,
    Reserved,
    #[serde(other)]
    Other,
}

impl TableStatus {
    pub fn label(self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Unavailable => "unavailable",
            TableStatus::Reserved => "reserved",
            TableStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: u64,
    pub name: String,
    pub status: TableStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "CartItems", default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.total_price).sum()
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: u64,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rate: f64,
    pub category_id: u64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(rename = "MenuCategory", default)]
    pub category: Option<CategoryName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// One entry of the grouped `/menu` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuGroup {
    pub category: MenuCategory,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Waiter,
    Staff,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Daybook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSplit {
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub online: f64,
    #[serde(default)]
    pub count: Option<u32>,
}

impl CashSplit {
    pub fn total(&self) -> f64 {
        self.cash + self.online
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaybookSummary {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub opening_balance: CashSplit,
    #[serde(default)]
    pub sales: CashSplit,
    #[serde(default)]
    pub expenses: CashSplit,
    #[serde(default)]
    pub net_cash: f64,
    #[serde(default)]
    pub net_online: f64,
    #[serde(default)]
    pub total_net: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaybookTransactionType {
    Sale,
    Expense,
    OpeningBalance,
    #[serde(other)]
    Other,
}

impl DaybookTransactionType {
    pub fn label(self) -> &'static str {
        match self {
            DaybookTransactionType::Sale => "sale",
            DaybookTransactionType::Expense => "expense",
            DaybookTransactionType::OpeningBalance => "opening balance",
            DaybookTransactionType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaybookTransaction {
    pub id: u64,
    pub transaction_type: DaybookTransactionType,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `/daybook/today-summary` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaybookToday {
    pub summary: DaybookSummary,
    #[serde(default)]
    pub transactions: Vec<DaybookTransaction>,
}

/// Daybook for one day. Historical days carry no transaction list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Daybook {
    pub summary: DaybookSummary,
    pub transactions: Vec<DaybookTransaction>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub net_profit: f64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub average_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub item_name: String,
    #[serde(default)]
    pub total_quantity: f64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    #[serde(default)]
    pub summary: AnalyticsSummary,
    #[serde(default)]
    pub daily_sales: BTreeMap<String, f64>,
    #[serde(default)]
    pub top_items: Vec<TopItem>,
    #[serde(default)]
    pub order_type_stats: BTreeMap<String, u64>,
    #[serde(default)]
    pub payment_method_stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub order_status_stats: BTreeMap<String, u64>,
    #[serde(default)]
    pub expense_categories: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_parse_case_insensitively() {
        assert_eq!(parse_wire::<PaymentStatus>(" Paid ").expect("paid"), PaymentStatus::Paid);
        assert_eq!(parse_wire::<OrderType>("dine-in").expect("dine-in"), OrderType::DineIn);
        assert_eq!(parse_wire::<Role>("WAITER").expect("waiter"), Role::Waiter);
    }

    #[test]
    fn catch_all_values_are_rejected() {
        let err = parse_wire::<PaymentStatus>("refunded").expect_err("unknown");
        assert_eq!(err.to_string(), "unknown value 'refunded'");
        assert!(parse_wire::<TableStatus>("other").is_err());
    }

    #[test]
    fn sale_decodes_backend_shape() {
        let raw = json!({
            "id": 7,
            "invoiceNumber": "INV-0007",
            "tableId": 2,
            "partyId": 5,
            "paymentMethodId": 1,
            "subTotal": 900.0,
            "discount": 0,
            "tax": 117,
            "total": 1017,
            "paymentStatus": "partial",
            "orderStatus": "served",
            "orderType": "dine-in",
            "notes": null,
            "createdAt": "2026-10-16T09:12:00.000Z",
            "Table": { "id": 2, "name": "T2", "status": "unavailable" },
            "PaymentMethod": { "id": 1, "name": "Cash" },
            "SalesItems": [
                { "id": 1, "itemName": "Momo", "quantity": 3, "rate": 300, "totalPrice": 900, "notes": null }
            ],
            "Payments": [
                { "id": 1, "amount": 500, "PaymentMethod": { "id": 1, "name": "Cash" } }
            ]
        });
        let sale: Sale = serde_json::from_value(raw).expect("decode sale");
        assert_eq!(sale.payment_status, PaymentStatus::Partial);
        assert_eq!(sale.order_type, OrderType::DineIn);
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.payments[0].payment_method.as_ref().map(|m| m.name.as_str()), Some("Cash"));
        assert_eq!(sale.table.map(|t| t.name), Some("T2".to_string()));
    }

    #[test]
    fn unknown_statuses_do_not_fail_decoding() {
        let table: Table =
            serde_json::from_value(json!({ "id": 1, "name": "Patio", "status": "cleaning" }))
                .expect("decode table");
        assert_eq!(table.status, TableStatus::Other);

        let role: Role = serde_json::from_value(json!("owner")).expect("decode role");
        assert_eq!(role, Role::Other);
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let env: Envelope<Vec<Party>> = serde_json::from_value(json!({
            "statusCode": 200,
            "message": "ok",
            "status": true
        }))
        .expect("decode envelope");
        assert!(env.data.is_none());
        assert_eq!(env.status_code, Some(200));
    }

    #[test]
    fn cart_total_sums_items() {
        let cart: Cart = serde_json::from_value(json!({
            "id": 1,
            "status": "open",
            "CartItems": [ { "totalPrice": 120.5 }, { "totalPrice": 79.5 } ]
        }))
        .expect("decode cart");
        assert_eq!(cart.total(), 200.0);
    }
}
